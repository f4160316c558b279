// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task registry: named tasks, dependency planning and execution.
//!
//! ```text
//! register("build", [html, less, scripts], action?)
//!
//! plan("build")
//!   visit(build)  stack [build]
//!     visit(html)     --> order [html]
//!     visit(less)     --> order [html, less]
//!     visit(scripts)  --> order [html, less, scripts]
//!   --> order [html, less, scripts, build]
//!
//!   revisit while on stack  --> CycleError [a -> b -> a]
//!   missing name            --> ConfigError::UnknownTask { required_by }
//! ```
//!
//! The registry is an explicit value built once by the pipeline and handed to
//! the command handlers.

use std::collections::{BTreeMap, BTreeSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{Action, Outcome, TaskContext};
use crate::error::{ConfigError, CycleError, TaskError};

struct TaskEntry {
    deps: Vec<String>,
    /// `None` for dependency-only group tasks.
    action: Option<Arc<dyn Action>>,
}

/// Registry of named tasks.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, TaskEntry>,
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.tasks.iter().map(|(name, entry)| (name, &entry.deps)))
            .finish()
    }
}

impl TaskRegistry {
    /// Creates an empty `TaskRegistry`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
        }
    }

    /// Registers a task with an action.
    ///
    /// Dependencies are not checked here; unknown names surface when the
    /// task is planned.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateTask` if `name` is already registered.
    pub fn register<I, S, A>(&mut self, name: &str, deps: I, action: A) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        A: Action + 'static,
    {
        self.insert(name, deps, Some(Arc::new(action)))
    }

    /// Registers a task that only runs its dependencies.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateTask` if `name` is already registered.
    pub fn register_group<I, S>(&mut self, name: &str, deps: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, deps, None)
    }

    fn insert<I, S>(
        &mut self,
        name: &str,
        deps: I,
        action: Option<Arc<dyn Action>>,
    ) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.tasks.contains_key(name) {
            return Err(ConfigError::DuplicateTask(name.to_string()));
        }
        let deps = deps.into_iter().map(Into::into).collect();
        self.tasks.insert(name.to_string(), TaskEntry { deps, action });
        Ok(())
    }

    /// Returns all registered task names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Returns the declared dependencies of a task.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.tasks.get(name).map(|entry| entry.deps.as_slice())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Whether the task only groups its dependencies.
    #[must_use]
    pub fn is_group(&self, name: &str) -> bool {
        self.tasks
            .get(name)
            .is_some_and(|entry| entry.action.is_none())
    }

    /// Resolves the execution order for `name`.
    ///
    /// Depth-first over declared dependencies in order; every task in the
    /// transitive closure appears exactly once, after all of its
    /// dependencies. The order is deterministic.
    ///
    /// # Errors
    ///
    /// - `TaskError::Config` with `ConfigError::UnknownTask` if the target or
    ///   any dependency is not registered.
    /// - `TaskError::Cycle` if a task is reached again while it is still
    ///   being resolved.
    pub fn plan(&self, name: &str) -> Result<Vec<String>, TaskError> {
        let mut planner = Planner::default();
        self.visit(name, None, &mut planner)?;
        Ok(planner.order)
    }

    fn visit(
        &self,
        name: &str,
        required_by: Option<&str>,
        planner: &mut Planner,
    ) -> Result<(), TaskError> {
        if planner.done.contains(name) {
            return Ok(());
        }

        if let Some(pos) = planner.stack.iter().position(|n| n == name) {
            let mut cycle = planner.stack[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(CycleError { cycle }.into());
        }

        let entry = self
            .tasks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTask {
                name: name.to_string(),
                required_by: required_by.map(String::from),
            })?;

        planner.stack.push(name.to_string());
        for dep in &entry.deps {
            self.visit(dep, Some(name), planner)?;
        }
        planner.stack.pop();

        planner.done.insert(name.to_string());
        planner.order.push(name.to_string());
        Ok(())
    }

    /// Runs `name` and its dependencies.
    ///
    /// The plan is resolved first, so structural errors surface before any
    /// action runs. Actions then run one at a time in plan order; the first
    /// failure aborts the run. Detached jobs are collected and awaited once
    /// every action has run; the first failing job aborts the others.
    ///
    /// # Errors
    ///
    /// - Planning errors (see [`TaskRegistry::plan`]).
    /// - `TaskError::Failed` naming the task whose action or job failed.
    /// - `TaskError::Interrupted` if `ctx` is cancelled before a task starts.
    pub async fn run(&self, name: &str, ctx: &TaskContext) -> Result<(), TaskError> {
        let order = self.plan(name)?;
        debug!(target_task = %name, plan = ?order, "resolved task plan");

        let mut jobs = JoinSet::new();

        for task in &order {
            if ctx.is_cancelled() {
                return Err(TaskError::Interrupted(task.clone()));
            }

            let Some(action) = self.tasks.get(task).and_then(|e| e.action.clone()) else {
                debug!(task = %task, "group task, nothing to run");
                continue;
            };

            info!(task = %task, "Starting '{task}'...");
            let started = Instant::now();

            match action.call(ctx.clone()).await {
                Ok(Outcome::Finished) => {
                    info!(
                        task = %task,
                        "Finished '{task}' after {} ms",
                        started.elapsed().as_millis()
                    );
                }
                Ok(Outcome::Detached(job)) => {
                    info!(task = %task, "'{task}' is running in the background");
                    let owner = task.clone();
                    jobs.spawn(async move {
                        let result = AssertUnwindSafe(job)
                            .catch_unwind()
                            .await
                            .unwrap_or_else(|_| Err(anyhow::anyhow!("job panicked")));
                        (owner, result)
                    });
                }
                Err(source) => {
                    return Err(TaskError::Failed {
                        name: task.clone(),
                        source,
                    });
                }
            }
        }

        let started = Instant::now();
        while let Some(joined) = jobs.join_next().await {
            let Ok((task, result)) = joined else {
                continue;
            };

            if let Err(source) = result {
                if !jobs.is_empty() {
                    warn!(task = %task, remaining = jobs.len(), "aborting remaining jobs");
                }
                jobs.abort_all();
                return Err(TaskError::Failed { name: task, source });
            }
            info!(
                task = %task,
                "Finished '{task}' after {} ms",
                started.elapsed().as_millis()
            );
        }

        Ok(())
    }
}

#[derive(Default)]
struct Planner {
    stack: Vec<String>,
    done: BTreeSet<String>,
    order: Vec<String>,
}

#[cfg(test)]
mod tests;
