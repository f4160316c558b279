// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use tokio::fs;

use crate::error::StepError;

/// Removes every entry inside `dir`, keeping `dir` itself.
///
/// A missing directory is created empty. Returns the number of top-level
/// entries removed.
///
/// # Errors
///
/// Returns `StepError::Clean` if the directory cannot be listed or an entry
/// cannot be removed.
pub async fn remove_dir_contents(dir: &Path) -> Result<usize, StepError> {
    let clean_error = |source| StepError::Clean {
        path: dir.to_path_buf(),
        source,
    };

    if !fs::try_exists(dir).await.map_err(clean_error)? {
        fs::create_dir_all(dir).await.map_err(clean_error)?;
        return Ok(0);
    }

    let mut entries = fs::read_dir(dir).await.map_err(clean_error)?;
    let mut removed = 0;

    while let Some(entry) = entries.next_entry().await.map_err(clean_error)? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(clean_error)?;

        let result = if file_type.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        result.map_err(|source| StepError::Clean { path, source })?;
        removed += 1;
    }

    Ok(removed)
}
