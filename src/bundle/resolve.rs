// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Specifier resolution.
//!
//! ```text
//! "./util"      from src/js/app.js
//!   src/js/util, src/js/util.js, src/js/util.jsx, ...,
//!   src/js/util/index.js, ...
//! "/src/lib"    same candidates, anchored at the project root
//! "xmlhttprequest"  configured external  --> ModuleId::External
//! "lodash"      src/js/node_modules/lodash, src/node_modules/lodash, ...
//!               up to <root>/node_modules: package.json "main", else index
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::BundleOptions;
use super::graph::ModuleId;
use crate::utility::fs::normalize_path;

#[derive(Deserialize)]
struct PackageManifest {
    main: Option<String>,
}

/// Resolves `require`/`import` specifiers to modules.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    options: &'a BundleOptions,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub const fn new(options: &'a BundleOptions) -> Self {
        Self { options }
    }

    /// Resolves `specifier` as referenced from the module at `from`.
    ///
    /// Returns `None` when nothing matches.
    #[must_use]
    pub fn resolve(&self, from: &Path, specifier: &str) -> Option<ModuleId> {
        let dir = from.parent().unwrap_or_else(|| Path::new("."));

        if specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." {
            return self.resolve_path(&dir.join(specifier)).map(ModuleId::File);
        }

        if let Some(rooted) = specifier.strip_prefix('/') {
            return self
                .resolve_path(&self.options.root().join(rooted))
                .map(ModuleId::File);
        }

        if self.options.externals().contains_key(specifier) {
            return Some(ModuleId::External(specifier.to_string()));
        }

        self.resolve_package(dir, specifier).map(ModuleId::File)
    }

    /// Tries `base` as a file, then with each extension appended, then as a
    /// directory with an index file.
    fn resolve_path(&self, base: &Path) -> Option<PathBuf> {
        let base = normalize_path(base);
        self.resolve_file(&base).or_else(|| self.resolve_index(&base))
    }

    fn resolve_file(&self, base: &Path) -> Option<PathBuf> {
        if base.is_file() {
            return Some(base.to_path_buf());
        }
        self.options.extensions().iter().find_map(|ext| {
            let mut candidate = base.as_os_str().to_os_string();
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            candidate.is_file().then_some(candidate)
        })
    }

    fn resolve_index(&self, dir: &Path) -> Option<PathBuf> {
        if !dir.is_dir() {
            return None;
        }
        self.resolve_file(&dir.join("index"))
    }

    /// Walks up from `dir` to the project root looking in `node_modules`.
    fn resolve_package(&self, dir: &Path, specifier: &str) -> Option<PathBuf> {
        let root = self.options.root();
        let mut current = Some(dir);

        while let Some(dir) = current {
            let package = dir.join("node_modules").join(specifier);
            if let Some(found) = self.resolve_package_dir(&package) {
                return Some(found);
            }
            if dir == root || !dir.starts_with(root) {
                break;
            }
            current = dir.parent();
        }
        None
    }

    fn resolve_package_dir(&self, package: &Path) -> Option<PathBuf> {
        if let Some(found) = self.resolve_file(package) {
            return Some(found);
        }
        if !package.is_dir() {
            return None;
        }

        let main = std::fs::read_to_string(package.join("package.json"))
            .ok()
            .and_then(|text| serde_json::from_str::<PackageManifest>(&text).ok())
            .and_then(|manifest| manifest.main);

        if let Some(main) = main
            && let Some(found) = self.resolve_path(&package.join(main))
        {
            return Some(found);
        }

        let index = package.join("index.js");
        index.is_file().then_some(index)
    }
}
