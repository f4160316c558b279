// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Asset rules: glob -> step task.
//!
//! ```text
//! src/css/**/*.less  --> less     (lessc)
//! src/index.html     --> html     (copy)
//! src/img/**/*.*     --> images   (copy)
//! ```
//!
//! Each matching task runs once per batch, in rule order. Failures are
//! logged and never end the watch loop.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info};
use wax::{Glob, Program};

use super::ChangeSet;
use crate::error::StepError;
use crate::step::{Step, StepExecutor};
use crate::utility::fs::glob_base;
use crate::utility::fs::walk::compile_glob;

struct Rule {
    pattern: String,
    glob: Glob<'static>,
    task: String,
}

/// Re-runs step tasks when asset files change.
pub struct AssetHook {
    root: PathBuf,
    rules: Vec<Rule>,
    steps: BTreeMap<String, Step>,
    executor: StepExecutor,
}

impl fmt::Debug for AssetHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHook")
            .field("root", &self.root)
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|rule| (rule.pattern.as_str(), rule.task.as_str()))
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl AssetHook {
    /// Patterns are relative to `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, executor: StepExecutor) -> Self {
        Self {
            root: root.into(),
            rules: Vec::new(),
            steps: BTreeMap::new(),
            executor,
        }
    }

    /// Adds a rule running `step` when a path matching `pattern` changes.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Glob` if `pattern` is not a valid glob.
    pub fn add_rule(&mut self, pattern: &str, step: Step) -> Result<(), StepError> {
        let glob = compile_glob(pattern)?;
        let task = step.name().to_string();
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            glob,
            task: task.clone(),
        });
        self.steps.insert(task, step);
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule matches `path`.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        self.relative(path)
            .is_some_and(|rel| self.rules.iter().any(|rule| rule.glob.is_match(rel)))
    }

    fn relative<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        if path.is_absolute() {
            path.strip_prefix(&self.root).ok()
        } else {
            Some(path)
        }
    }

    /// Tasks whose rules match any of `changes`, in rule order, each once.
    #[must_use]
    pub fn tasks_for(&self, changes: &ChangeSet) -> Vec<&str> {
        let mut tasks: Vec<&str> = Vec::new();
        for rule in &self.rules {
            let hit = changes
                .paths()
                .filter_map(|path| self.relative(path))
                .any(|rel| rule.glob.is_match(rel));
            if hit && !tasks.contains(&rule.task.as_str()) {
                tasks.push(&rule.task);
            }
        }
        tasks
    }

    /// Static directories of every pattern.
    #[must_use]
    pub fn watch_roots(&self) -> BTreeSet<PathBuf> {
        self.rules
            .iter()
            .map(|rule| self.root.join(glob_base(&rule.pattern)))
            .collect()
    }

    /// Runs the tasks matching `changes`, logging each outcome.
    pub async fn run_for(&self, changes: &ChangeSet) {
        for task in self.tasks_for(changes) {
            let Some(step) = self.steps.get(task) else {
                continue;
            };

            let changed = changes.relative_to(&self.root);
            info!(task = %task, changed = ?changed, "Starting '{task}'...");
            let started = Instant::now();

            match self.executor.run(step).await {
                Ok(_) => info!(
                    task = %task,
                    "Finished '{task}' after {} ms",
                    started.elapsed().as_millis()
                ),
                Err(e) => error!(task = %task, error = %e, "'{task}' failed"),
            }
        }
    }
}
