// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Script bundler.
//!
//! # Architecture
//!
//! ```text
//! BundleBuilder::build(entry)
//!      |
//!      v
//!  build_graph   worklist from the entry
//!      |           load_module: read -> fingerprint -> transform
//!      |                        -> scan require() -> Resolver
//!      v
//!  ModuleGraph   ModuleId -> Module { kind, deps, code, fingerprint }
//!      |
//!      v
//!  emit          loader shim + records (dependencies first, entry last)
//!      |
//!      v
//!  write_atomic  temp file + rename  --> BundleArtifact
//! ```
//!
//! Any error aborts the build before the output is touched.
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`BundleOptions`] | Root, entry, output, extensions, externals |
//! | [`BundleBuilder`] | Graph construction, emission, atomic write |
//! | [`graph::ModuleGraph`] | Modules reachable from the entry |
//! | [`resolve::Resolver`] | Specifier to file or external |
//! | [`BundleArtifact`] | Output path, size, module count, duration |

pub mod emit;
pub mod graph;
pub mod mask;
pub mod resolve;
pub mod transform;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use bon::Builder;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::BundleError;
use crate::utility::fs::{normalize_path, write_atomic};

use graph::{Fingerprint, Module, ModuleGraph, ModuleId, ModuleKind, relative_display};
use resolve::Resolver;

fn default_extensions() -> Vec<String> {
    [".js", ".jsx", ".json"].map(String::from).to_vec()
}

fn default_text_extensions() -> Vec<String> {
    [".html", ".txt"].map(String::from).to_vec()
}

/// Bundler settings.
#[derive(Debug, Clone, Builder)]
pub struct BundleOptions {
    /// Project root: anchors `/` specifiers, bounds the `node_modules`
    /// search and relativizes record names.
    #[builder(setters(name = with_root), into)]
    root: PathBuf,
    /// Entry module (relative paths hang off `root`).
    #[builder(setters(name = with_entry), into)]
    entry: PathBuf,
    /// Output file (relative paths hang off `root`).
    #[builder(setters(name = with_output), into)]
    output: PathBuf,
    #[builder(setters(name = with_extensions), default = default_extensions())]
    extensions: Vec<String>,
    #[builder(setters(name = with_text_extensions), default = default_text_extensions())]
    text_extensions: Vec<String>,
    /// Specifier -> global expression.
    #[builder(setters(name = with_externals), default)]
    externals: BTreeMap<String, String>,
}

impl BundleOptions {
    /// Bundler settings from the `[bundle]` and `[paths]` sections.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::builder()
            .with_root(config.paths.root.clone())
            .with_entry(config.bundle.entry.clone())
            .with_output(config.bundle.output.clone())
            .with_extensions(config.bundle.extensions.clone())
            .with_text_extensions(config.bundle.text_extensions.clone())
            .with_externals(config.bundle.externals.clone())
            .build()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entry module, anchored at the root.
    #[must_use]
    pub fn entry(&self) -> PathBuf {
        normalize_path(&self.root.join(&self.entry))
    }

    /// Output file, anchored at the root.
    #[must_use]
    pub fn output(&self) -> PathBuf {
        normalize_path(&self.root.join(&self.output))
    }

    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    #[must_use]
    pub fn text_extensions(&self) -> &[String] {
        &self.text_extensions
    }

    #[must_use]
    pub const fn externals(&self) -> &BTreeMap<String, String> {
        &self.externals
    }

    /// `path` relative to the root, `/`-separated.
    #[must_use]
    pub fn relative(&self, path: &Path) -> String {
        relative_display(path, &self.root)
    }
}

/// A bundle written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Number of module records.
    pub modules: usize,
    /// Wall-clock time of the build.
    pub duration: Duration,
}

impl fmt::Display for BundleArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        write!(f, "{name} built in {:.2}s", self.duration.as_secs_f64())
    }
}

/// Builds script bundles.
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    options: BundleOptions,
}

impl BundleBuilder {
    #[must_use]
    pub const fn new(options: BundleOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Bundles `entry` and everything it references into the output file.
    ///
    /// # Errors
    ///
    /// Returns the first `BundleError` met while reading, transforming or
    /// resolving a module, or writing the artifact. The output file is left
    /// as it was.
    pub fn build(&self, entry: &Path) -> Result<BundleArtifact, BundleError> {
        let started = Instant::now();
        let graph = self.build_graph(entry)?;
        self.write(&graph, started)
    }

    /// Resolves the full module graph of `entry`.
    ///
    /// # Errors
    ///
    /// See [`BundleBuilder::build`].
    pub fn build_graph(&self, entry: &Path) -> Result<ModuleGraph, BundleError> {
        let entry = normalize_path(entry);
        let mut graph = ModuleGraph::new(entry.clone());
        self.extend_graph(&mut graph, [ModuleId::File(entry)])?;
        Ok(graph)
    }

    /// Loads `pending` modules and, transitively, every dependency not
    /// already in the graph. Returns how many modules were loaded.
    ///
    /// # Errors
    ///
    /// See [`BundleBuilder::build`].
    pub fn extend_graph(
        &self,
        graph: &mut ModuleGraph,
        pending: impl IntoIterator<Item = ModuleId>,
    ) -> Result<usize, BundleError> {
        let mut worklist: Vec<ModuleId> = pending.into_iter().collect();
        let mut loaded = 0;

        while let Some(id) = worklist.pop() {
            if graph.contains(&id) {
                continue;
            }
            let module = self.load_module(&id)?;
            worklist.extend(
                module
                    .deps
                    .iter()
                    .map(|(_, target)| target.clone())
                    .filter(|target| !graph.contains(target)),
            );
            graph.insert(module);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Reads, fingerprints and transforms one module and resolves its
    /// references.
    ///
    /// # Errors
    ///
    /// See [`BundleBuilder::build`].
    pub fn load_module(&self, id: &ModuleId) -> Result<Module, BundleError> {
        match id {
            ModuleId::External(name) => Ok(self.external_module(name)),
            ModuleId::File(path) => self.file_module(path),
        }
    }

    fn external_module(&self, name: &str) -> Module {
        let expression = self
            .options
            .externals()
            .get(name)
            .map_or("undefined", String::as_str);

        Module {
            id: ModuleId::External(name.to_string()),
            kind: ModuleKind::External,
            deps: Vec::new(),
            code: format!("module.exports = {expression};"),
            fingerprint: Fingerprint::of(expression),
        }
    }

    fn file_module(&self, path: &Path) -> Result<Module, BundleError> {
        let bytes = std::fs::read(path).map_err(|source| BundleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let fingerprint = Fingerprint::of(&bytes);

        let transform_error = |message: String| BundleError::Transform {
            path: path.to_path_buf(),
            message,
        };

        let source = String::from_utf8(bytes)
            .map_err(|_| transform_error("module is not valid UTF-8".to_string()))?;
        let kind = ModuleKind::detect(path, self.options.text_extensions());
        let code = transform::transform(kind, &source).map_err(transform_error)?;

        let mut deps = Vec::new();
        if kind == ModuleKind::Script {
            let resolver = Resolver::new(&self.options);
            for specifier in transform::scan_requires(&code).map_err(transform_error)? {
                let target = resolver.resolve(path, &specifier).ok_or_else(|| {
                    BundleError::Unresolved {
                        path: path.to_path_buf(),
                        specifier: specifier.clone(),
                    }
                })?;
                trace!(module = %self.options.relative(path), %specifier, target = %target, "resolved");
                deps.push((specifier, target));
            }
        }

        debug!(module = %self.options.relative(path), ?kind, deps = deps.len(), "loaded module");

        Ok(Module {
            id: ModuleId::File(path.to_path_buf()),
            kind,
            deps,
            code,
            fingerprint,
        })
    }

    /// Renders the bundle text for `graph`.
    #[must_use]
    pub fn emit(&self, graph: &ModuleGraph) -> String {
        emit::emit(graph, self.options.root())
    }

    /// Emits `graph` and writes it atomically to the output file.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::Write` if the output cannot be written.
    pub fn write(&self, graph: &ModuleGraph, started: Instant) -> Result<BundleArtifact, BundleError> {
        let output = self.options.output();
        let text = self.emit(graph);

        write_atomic(&output, text.as_bytes()).map_err(|source| BundleError::Write {
            path: output.clone(),
            source,
        })?;

        Ok(BundleArtifact {
            path: output,
            size: text.len() as u64,
            modules: graph.order().len(),
            duration: started.elapsed(),
        })
    }
}
