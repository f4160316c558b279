// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use bon::Builder;
use flume::unbounded;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wax::{Glob, Program};

use crate::error::StepError;

/// Options for parallel directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Maximum depth to traverse (None = unlimited)
    #[builder(setters(name = with_max_depth))]
    max_depth: Option<usize>,
    /// Follow symbolic links
    #[builder(setters(name = with_follow_links), default = false)]
    follow_links: bool,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = false)]
    include_hidden: bool,
    /// Respect .gitignore files
    #[builder(setters(name = with_respect_gitignore), default = true)]
    respect_gitignore: bool,
    /// Skip directories matching these names (exact match)
    #[builder(setters(name = with_skip_dirs), default)]
    skip_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[must_use]
    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    #[must_use]
    pub const fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }

    #[must_use]
    pub fn skip_dirs(&self) -> &[String] {
        &self.skip_dirs
    }

    /// Options for copying project assets.
    ///
    /// Asset trees are usually gitignored build inputs (vendored fonts,
    /// generated images), so ignore files are not consulted. Hidden files
    /// stay excluded.
    #[must_use]
    pub fn for_assets() -> Self {
        Self::builder()
            .with_respect_gitignore(false)
            .with_skip_dirs(vec![".git".to_string(), "node_modules".to_string()])
            .build()
    }
}

/// Builds a `WalkBuilder` with the given options, using `filter_entry` for directory skipping.
pub(super) fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    if let Some(depth) = options.max_depth() {
        builder.max_depth(Some(depth));
    }

    builder.follow_links(options.follow_links());
    builder.hidden(!options.include_hidden());

    builder.git_ignore(options.respect_gitignore());
    builder.git_global(options.respect_gitignore());
    builder.git_exclude(options.respect_gitignore());
    builder.ignore(options.respect_gitignore());
    builder.parents(options.respect_gitignore());

    // Evaluated before descending
    if !options.skip_dirs().is_empty() {
        let skip_dirs: Arc<Vec<String>> = Arc::new(options.skip_dirs().to_vec());
        builder.filter_entry(move |entry| {
            !(entry.file_type().is_some_and(|ft| ft.is_dir())
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skip_dirs.iter().any(|skip| skip == name)))
        });
    }

    builder
}

/// Compiles a glob pattern into an owned matcher.
///
/// # Errors
///
/// Returns `StepError::Glob` if the pattern is not a valid glob.
pub fn compile_glob(pattern: &str) -> Result<Glob<'static>, StepError> {
    Glob::new(pattern)
        .map(Glob::into_owned)
        .map_err(|e| StepError::Glob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Finds files under `root` whose root-relative path matches `pattern`.
///
/// Uses the `wax` crate for glob matching combined with
/// `ignore::WalkParallel`. Results are sorted so callers see a stable order.
/// A missing root yields no files.
///
/// # Errors
///
/// Returns `StepError::Glob` if the glob pattern is invalid.
///
/// # Example
/// ```no_run
/// use frontline::utility::fs::walk::{find_files, WalkOptions};
///
/// let images = find_files("src/img", "**/*.png", &WalkOptions::for_assets())?;
/// for file in images {
///     println!("{}", file.display());
/// }
/// # Ok::<(), frontline::error::StepError>(())
/// ```
pub fn find_files<P: AsRef<Path>>(
    root: P,
    pattern: &str,
    options: &WalkOptions,
) -> Result<Vec<PathBuf>, StepError> {
    let root = root.as_ref();
    let glob = Arc::new(compile_glob(pattern)?);

    if !root.exists() {
        return Ok(Vec::new());
    }

    // Drained only after the walk completes, so the channel must not block
    let (tx, rx) = unbounded::<PathBuf>();
    let root_path = root.to_path_buf();

    let parallel = build_walker(root, options).build_parallel();

    parallel.run(|| {
        let tx = tx.clone();
        let glob = Arc::clone(&glob);
        let root_path = root_path.clone();

        Box::new(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file())
                        && let Ok(rel_path) = entry.path().strip_prefix(&root_path)
                        && glob.is_match(rel_path)
                    {
                        let _ = tx.send(entry.path().to_path_buf());
                    }
                }
                Err(e) => tracing::warn!(error = %e, "walk error"),
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let mut files: Vec<PathBuf> = rx.iter().collect();
    files.sort();
    Ok(files)
}
