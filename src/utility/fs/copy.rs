// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::StepError;

/// Copies `files` (all located under `src_root`) into `dst`, keeping each
/// file's path relative to `src_root`.
///
/// Creates `dst` and any intermediate directories. Files outside `src_root`
/// are copied flat into `dst`. Returns the number of files copied.
///
/// # Example
/// ```no_run
/// use frontline::utility::fs::copy::copy_preserving_structure;
/// use std::path::{Path, PathBuf};
///
/// # async fn example() -> Result<(), frontline::error::StepError> {
/// let files = vec![PathBuf::from("src/img/icons/a.png")];
/// copy_preserving_structure(Path::new("src/img"), &files, Path::new("www/img")).await?;
/// // -> www/img/icons/a.png
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns `StepError::Copy` naming the source and destination of the first
/// file that fails.
pub async fn copy_preserving_structure(
    src_root: &Path,
    files: &[PathBuf],
    dst: &Path,
) -> Result<usize, StepError> {
    fs::create_dir_all(dst)
        .await
        .map_err(|source| StepError::Copy {
            from: src_root.to_path_buf(),
            to: dst.to_path_buf(),
            source,
        })?;

    for file in files {
        let relative = file
            .strip_prefix(src_root)
            .ok()
            .map(Path::to_path_buf)
            .or_else(|| file.file_name().map(PathBuf::from))
            .unwrap_or_else(|| file.clone());
        let target = dst.join(relative);

        let copy_error = |source| StepError::Copy {
            from: file.clone(),
            to: target.clone(),
            source,
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(copy_error)?;
        }
        fs::copy(file, &target).await.map_err(copy_error)?;
        tracing::trace!(from = %file.display(), to = %target.display(), "copied");
    }

    Ok(files.len())
}
