// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities with parallel traversal and async copy.
//!
//! ```text
//! walk:    find_files()      ignore::WalkParallel + wax glob
//!          compile_glob()    owned wax matcher
//!          WalkOptions       max_depth, hidden, gitignore, skip_dirs
//! copy:    copy_preserving_structure()  tokio::fs, relative layout kept
//! remove:  remove_dir_contents()        empty a directory, keep it
//! mod:     write_atomic()    temp file in target dir + rename
//!          normalize_path()  lexical `.`/`..` removal
//!          glob_base()       literal directory prefix of a glob
//! ```

pub mod copy;
pub mod remove;
pub mod walk;


use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Writes `content` to `path` by writing a sibling temp file and renaming it
/// into place. Readers see either the old file or the new one.
///
/// # Errors
///
/// Returns the underlying I/O error if the parent directory cannot be
/// created, or the temp file cannot be written or persisted.
pub fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Lexically removes `.` and `..` components without touching the disk.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Literal directory prefix of a glob: the leading components that contain
/// no glob metacharacters.
///
/// `src/css/**/*.less` -> `src/css`, `src/index.html` -> `src`.
#[must_use]
pub fn glob_base(pattern: &str) -> PathBuf {
    const META: &[char] = &['*', '?', '[', ']', '{', '}', '<', '>', '!'];

    let components: Vec<&str> = pattern.split('/').collect();
    let literal = components
        .iter()
        .take_while(|part| !part.contains(META))
        .count();

    // The last component is a file name even when literal
    let take = if literal == components.len() {
        literal.saturating_sub(1)
    } else {
        literal
    };
    components[..take].iter().collect()
}
