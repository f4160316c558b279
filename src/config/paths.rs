// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! root/
//!   src/   (source)
//!   www/   (output)
//! ```
//!
//! `source` and `output` are resolved against `root` when relative.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utility::fs::normalize_path;

/// Project layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Project root. Every other relative path hangs off this.
    pub root: PathBuf,
    /// Source tree (default: root/src).
    pub source: PathBuf,
    /// Output tree (default: root/www).
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            source: PathBuf::from("src"),
            output: PathBuf::from("www"),
        }
    }
}

impl PathsConfig {
    /// Resolve `source` and `output` against `root`.
    ///
    /// The root itself is made absolute against the current directory when
    /// possible; a failure to read the current directory leaves it relative.
    pub fn resolve(&mut self) {
        if self.root.is_relative()
            && let Ok(cwd) = std::env::current_dir()
        {
            self.root = normalize_path(&cwd.join(&self.root));
        }
        if self.source.is_relative() {
            self.source = self.root.join(&self.source);
        }
        if self.output.is_relative() {
            self.output = self.root.join(&self.output);
        }
    }

    /// Join a project-relative path onto the root; absolute paths pass through.
    #[must_use]
    pub fn under_root(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
