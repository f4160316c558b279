// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task-running commands.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::build_registry;
use crate::task::TaskContext;

/// Runs `task` and its dependencies.
///
/// Ctrl+C cancels the run: pending tasks do not start and running processes
/// and watch loops are stopped.
///
/// # Errors
///
/// Returns an error if the registry cannot be assembled, the plan is invalid,
/// or a task fails.
pub async fn run_task_command(task: &str, config: Config) -> Result<()> {
    let dry_run = config.global.dry;
    let registry = build_registry(&config)?;

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, interrupting tasks...");
            ctrl_c_token.cancel();
        }
    });

    let ctx = TaskContext::new(Arc::new(config), cancel_token).with_dry_run(dry_run);
    let started = Instant::now();
    registry.run(task, &ctx).await?;

    info!(
        task = %task,
        "'{task}' completed in {:.2}s",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
