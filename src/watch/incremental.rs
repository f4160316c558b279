// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Incremental rebuilds over a retained module graph.
//!
//! ```text
//! changed paths
//!   trigger file, removed module, or no graph yet  --> full build
//!   otherwise, per changed module in the graph:
//!     fingerprint unchanged  --> dropped
//!     fingerprint changed    --> reload (read, transform, resolve)
//!   newly referenced modules  --> extend_graph
//!   prune unreachable nodes   --> emit + write
//! ```
//!
//! Work happens on a copy of the graph; the copy replaces the retained graph
//! only when the artifact was written. A failed batch is retried together
//! with the next one.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use futures_util::future::BoxFuture;
use tracing::debug;

use super::{ChangeSet, Rebuild, WatchTargets};
use crate::bundle::graph::{Fingerprint, ModuleGraph, ModuleId};
use crate::bundle::{BundleArtifact, BundleBuilder};
use crate::error::BundleError;
use crate::utility::fs::normalize_path;

/// Why a batch needs a build from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullBuildReason {
    NoGraph,
    Trigger(PathBuf),
    Removed(PathBuf),
}

/// What a rebuild of a retained graph did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildPlan {
    /// Modules re-read because their content changed.
    pub reloaded: Vec<PathBuf>,
    /// Changed modules whose fingerprint was unchanged.
    pub unchanged: Vec<PathBuf>,
}

/// Watch backend around a [`BundleBuilder`].
#[derive(Debug)]
pub struct IncrementalBundler {
    builder: BundleBuilder,
    triggers: BTreeSet<PathBuf>,
    graph: Option<ModuleGraph>,
    retry: BTreeSet<PathBuf>,
}

impl IncrementalBundler {
    /// `triggers` are files whose change forces a full build (relative
    /// paths hang off the bundle root).
    #[must_use]
    pub fn new<I, P>(builder: BundleBuilder, triggers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let root = builder.options().root().to_path_buf();
        let triggers = triggers
            .into_iter()
            .map(|t| normalize_path(&root.join(t.as_ref())))
            .collect();

        Self {
            builder,
            triggers,
            graph: None,
            retry: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn graph(&self) -> Option<&ModuleGraph> {
        self.graph.as_ref()
    }

    #[must_use]
    pub fn entry(&self) -> PathBuf {
        self.builder.options().entry()
    }

    /// Whether the last batch failed and is waiting to be retried.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.graph.is_none() || !self.retry.is_empty()
    }

    fn has_bundle_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = format!(".{}", ext.to_string_lossy());
        let options = self.builder.options();
        ext == ".mjs" || options.extensions().contains(&ext) || options.text_extensions().contains(&ext)
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T, BundleError>
    where
        T: Send + 'static,
        F: FnOnce(BundleBuilder) -> Result<T, BundleError> + Send + 'static,
    {
        let builder = self.builder.clone();
        let entry = self.entry();
        tokio::task::spawn_blocking(move || f(builder))
            .await
            .map_err(|e| BundleError::Aborted {
                path: entry,
                message: e.to_string(),
            })?
    }
}

/// Decides whether `changed` can be applied to `graph` incrementally.
#[must_use]
pub fn full_build_reason(
    graph: Option<&ModuleGraph>,
    changed: &BTreeSet<PathBuf>,
    triggers: &BTreeSet<PathBuf>,
) -> Option<FullBuildReason> {
    let Some(graph) = graph else {
        return Some(FullBuildReason::NoGraph);
    };

    if let Some(trigger) = changed.iter().find(|p| triggers.contains(*p)) {
        return Some(FullBuildReason::Trigger(trigger.clone()));
    }
    changed
        .iter()
        .find(|p| graph.contains_file(p) && !p.exists())
        .map(|p| FullBuildReason::Removed(p.clone()))
}

/// Applies `changed` to `graph` in place and writes the bundle if any module
/// changed. Returns `None` when every changed module kept its fingerprint.
///
/// # Errors
///
/// Returns the first `BundleError`; `graph` may then be partially updated
/// and should be discarded.
pub fn apply_changes(
    builder: &BundleBuilder,
    graph: &mut ModuleGraph,
    changed: &BTreeSet<PathBuf>,
) -> Result<(RebuildPlan, Option<BundleArtifact>), BundleError> {
    let started = Instant::now();
    let mut plan = RebuildPlan {
        reloaded: Vec::new(),
        unchanged: Vec::new(),
    };
    let mut fresh = Vec::new();

    for path in changed {
        let id = ModuleId::File(path.clone());
        let Some(current) = graph.get(&id) else {
            continue;
        };

        let fingerprint = Fingerprint::of_file(path).map_err(|source| BundleError::Read {
            path: path.clone(),
            source,
        })?;
        if fingerprint == current.fingerprint {
            plan.unchanged.push(path.clone());
            continue;
        }

        let module = builder.load_module(&id)?;
        fresh.extend(
            module
                .deps
                .iter()
                .map(|(_, target)| target.clone())
                .filter(|target| !graph.contains(target)),
        );
        graph.insert(module);
        plan.reloaded.push(path.clone());
    }

    if plan.reloaded.is_empty() {
        return Ok((plan, None));
    }

    let loaded = builder.extend_graph(graph, fresh)?;
    let pruned = graph.prune();
    debug!(
        reloaded = plan.reloaded.len(),
        loaded,
        pruned = pruned.len(),
        "graph updated"
    );

    let artifact = builder.write(graph, started)?;
    Ok((plan, Some(artifact)))
}

impl Rebuild for IncrementalBundler {
    fn initial_build(&mut self) -> BoxFuture<'_, Result<BundleArtifact, BundleError>> {
        Box::pin(async move {
            let entry = self.entry();
            let (graph, artifact) = self
                .run_blocking(move |builder| {
                    let started = Instant::now();
                    let graph = builder.build_graph(&entry)?;
                    let artifact = builder.write(&graph, started)?;
                    Ok((graph, artifact))
                })
                .await?;

            self.graph = Some(graph);
            self.retry.clear();
            Ok(artifact)
        })
    }

    fn rebuild<'a>(
        &'a mut self,
        changes: &'a ChangeSet,
    ) -> BoxFuture<'a, Result<Option<BundleArtifact>, BundleError>> {
        Box::pin(async move {
            let mut changed: BTreeSet<PathBuf> = changes.paths().map(Path::to_path_buf).collect();
            changed.extend(self.retry.iter().cloned());

            if let Some(reason) = full_build_reason(self.graph.as_ref(), &changed, &self.triggers) {
                debug!(?reason, "full rebuild");
                return match self.initial_build().await {
                    Ok(artifact) => Ok(Some(artifact)),
                    Err(e) => {
                        self.retry = changed;
                        Err(e)
                    }
                };
            }

            let Some(graph) = self.graph.clone() else {
                return Ok(None);
            };
            let batch = changed.clone();
            let result = self
                .run_blocking(move |builder| {
                    let mut graph = graph;
                    let (plan, artifact) = apply_changes(&builder, &mut graph, &batch)?;
                    Ok((graph, plan, artifact))
                })
                .await;

            match result {
                Ok((graph, plan, artifact)) => {
                    if !plan.unchanged.is_empty() {
                        debug!(unchanged = ?plan.unchanged, "fingerprints unchanged");
                    }
                    if artifact.is_some() {
                        self.graph = Some(graph);
                    }
                    self.retry.clear();
                    Ok(artifact)
                }
                Err(e) => {
                    self.retry = changed;
                    Err(e)
                }
            }
        })
    }

    fn is_tracked(&self, path: &Path) -> bool {
        if self.triggers.contains(path) || self.entry().as_path() == path {
            return true;
        }
        if let Some(graph) = &self.graph
            && graph.contains_file(path)
        {
            return true;
        }
        // After a failure, new files under the graph may be what fixes it
        self.is_stale()
            && self.has_bundle_extension(path)
            && self
                .watch_scope()
                .recursive
                .iter()
                .any(|dir| path.starts_with(dir))
    }

    fn watch_scope(&self) -> WatchTargets {
        let recursive = self.graph.as_ref().map_or_else(
            || self.entry().parent().map(Path::to_path_buf).into_iter().collect(),
            ModuleGraph::watch_dirs,
        );
        let shallow = self
            .triggers
            .iter()
            .filter_map(|t| t.parent().map(Path::to_path_buf))
            .collect();
        WatchTargets { recursive, shallow }
    }

    fn retry_paths(&self) -> BTreeSet<PathBuf> {
        self.retry.clone()
    }
}
