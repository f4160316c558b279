// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task execution system.
//!
//! # Architecture
//!
//! ```text
//! TaskRegistry  (name -> deps + optional Action)
//!      |
//!      | plan(target)   DFS, dependency-first, each task once
//!      v
//!   [clean, html, less, scripts, ...]
//!      |
//!      | run(target, ctx)
//!      v
//!   Action::call(TaskContext) --> Outcome
//!                                  |-- Finished
//!                                  '-- Detached(job)  watch loop, preview server
//!                                            |
//!                                            v
//!                                  JoinSet, awaited after the plan
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`registry::TaskRegistry`] | Named tasks, planning and execution |
//! | [`Action`] | Unit of work returning a future |
//! | [`Outcome`] | Finished now, or a detached long-running job |
//! | [`TaskContext`] | Configuration, cancellation token and dry-run flag |
//!
//! Any `Fn(TaskContext) -> impl Future<Output = Result<Outcome>>` closure is
//! an [`Action`], so steps that finish synchronously and steps that hand back
//! a job are awaited the same way.

pub mod registry;

use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::Result;

/// A long-running unit of work handed back by a task action.
pub type Job = BoxFuture<'static, Result<()>>;

/// What a task action produced.
pub enum Outcome {
    /// The action is complete.
    Finished,
    /// The action started a job that keeps running after the plan
    /// completes. The registry awaits it at the end of the run.
    Detached(Job),
}

impl Outcome {
    /// Wraps a future as a detached job.
    pub fn detached<F>(job: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self::Detached(Box::pin(job))
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finished => f.write_str("Finished"),
            Self::Detached(_) => f.write_str("Detached(..)"),
        }
    }
}

/// A task action.
///
/// The returned future owns everything it needs (`'static`) so detached
/// jobs can outlive the call.
pub trait Action: Send + Sync {
    fn call(&self, ctx: TaskContext) -> BoxFuture<'static, Result<Outcome>>;
}

impl<F, Fut> Action for F
where
    F: Fn(TaskContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Outcome>> + Send + 'static,
{
    fn call(&self, ctx: TaskContext) -> BoxFuture<'static, Result<Outcome>> {
        Box::pin(self(ctx))
    }
}

/// Context provided to tasks during execution.
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Reference to the configuration.
    config: Arc<Config>,

    /// Cancellation token for cooperative cancellation.
    cancel_token: CancellationToken,

    /// Whether this is a dry-run execution.
    dry_run: bool,
}

impl TaskContext {
    /// Creates a new `TaskContext`.
    #[must_use]
    pub const fn new(config: Arc<Config>, cancel_token: CancellationToken) -> Self {
        Self {
            config,
            cancel_token,
            dry_run: false,
        }
    }

    /// Gets a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Gets a reference to the cancellation token.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Returns whether this is a dry-run execution.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Checks if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
