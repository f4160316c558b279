// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Registry assembly from configuration.
//!
//! ```text
//! Config::task_specs()
//!     |
//!     v
//! TaskSpec.kind
//!   group                  register_group
//!   copy, command, clean   Step         --> StepExecutor::run
//!   bundle                 BundleBuilder (blocking thread)
//!   watch                  initial build --> Detached(WatchCoordinator::run)
//!   serve                  Step command  --> Detached(server process)
//! ```
//!
//! Placeholders in task fields:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{root}`    | `paths.root` |
//! | `{source}`  | `paths.source` |
//! | `{output}`  | `paths.output` |
//! | `{port}`    | `serve.port` |


use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::info;

use crate::bundle::{BundleBuilder, BundleOptions};
use crate::config::Config;
use crate::config::tasks::{TaskKind, TaskSpec};
use crate::error::{ConfigError, Result, StepError};
use crate::step::{Step, StepExecutor};
use crate::task::registry::TaskRegistry;
use crate::task::{Outcome, TaskContext};
use crate::utility::fs::walk::compile_glob;
use crate::watch::WatchCoordinator;
use crate::watch::assets::AssetHook;
use crate::watch::fs::FsWatcher;
use crate::watch::incremental::IncrementalBundler;

/// Values substituted into task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    root: PathBuf,
    source: PathBuf,
    output: PathBuf,
    port: u16,
}

impl Placeholders {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.paths.root.clone(),
            source: config.paths.source.clone(),
            output: config.paths.output.clone(),
            port: config.serve.port,
        }
    }

    /// Replaces every known placeholder in `text`.
    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        text.replace("{root}", &self.root.to_string_lossy())
            .replace("{source}", &self.source.to_string_lossy())
            .replace("{output}", &self.output.to_string_lossy())
            .replace("{port}", &self.port.to_string())
    }

    /// Substitutes `text` and anchors a relative result at the root.
    #[must_use]
    pub fn path(&self, text: &str) -> PathBuf {
        let path = PathBuf::from(self.substitute(text));
        if path.is_absolute() {
            path
        } else {
            self.root.join(path)
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn missing_field(name: &str, kind: TaskKind, key: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: format!("tasks.{name}"),
        key: key.to_string(),
        message: format!("required for '{kind}' tasks"),
    }
}

/// The step a copy, command or clean task runs. Other kinds have none.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a field the kind needs is missing.
pub fn step_for(
    name: &str,
    spec: &TaskSpec,
    placeholders: &Placeholders,
) -> std::result::Result<Option<Step>, ConfigError> {
    let field = |value: Option<&String>, key: &str| {
        value
            .map(|v| placeholders.path(v))
            .ok_or_else(|| missing_field(name, spec.kind, key))
    };

    let step = match spec.kind {
        TaskKind::Copy => Step::copy(
            name,
            field(spec.source.as_ref(), "source")?,
            spec.pattern.as_deref().unwrap_or("**/*"),
            field(spec.dest.as_ref(), "dest")?,
        ),
        TaskKind::Clean => Step::clean(name, field(spec.dest.as_ref(), "dest")?),
        TaskKind::Command => {
            let program = spec
                .program
                .as_deref()
                .ok_or_else(|| missing_field(name, spec.kind, "program"))?;
            command_step(name, program, &spec.args, spec, placeholders)
        }
        TaskKind::Bundle | TaskKind::Watch | TaskKind::Serve | TaskKind::Group => {
            return Ok(None);
        }
    };
    Ok(Some(step))
}

fn command_step(
    name: &str,
    program: &str,
    args: &[String],
    spec: &TaskSpec,
    placeholders: &Placeholders,
) -> Step {
    let mut step = Step::command(
        name,
        placeholders.substitute(program),
        args.iter().map(|arg| placeholders.substitute(arg)),
    )
    .with_cwd(
        spec.cwd
            .as_deref()
            .map_or_else(|| placeholders.root().to_path_buf(), |cwd| placeholders.path(cwd)),
    );
    if let Some(dest) = &spec.dest {
        step = step.with_dest(placeholders.path(dest));
    }
    step
}

/// The preview server command: the task's own `program`/`args` when set,
/// otherwise the `[serve]` section.
#[must_use]
pub fn serve_step(name: &str, spec: &TaskSpec, config: &Config) -> Step {
    let placeholders = Placeholders::from_config(config);
    match &spec.program {
        Some(program) => command_step(name, program, &spec.args, spec, &placeholders),
        None => command_step(name, &config.serve.program, &config.serve.args, spec, &placeholders),
    }
}

/// Asset rules resolved to the steps they re-run.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a rule names an unknown task, a
/// task without a step, or has an invalid pattern.
pub fn asset_steps(config: &Config) -> std::result::Result<Vec<(String, Step)>, ConfigError> {
    let specs = config.task_specs();
    let placeholders = Placeholders::from_config(config);

    config
        .watch
        .assets
        .iter()
        .map(|rule| {
            let invalid = |message: String| ConfigError::InvalidValue {
                section: "watch".to_string(),
                key: "assets".to_string(),
                message,
            };

            let spec = specs.get(&rule.task).ok_or_else(|| {
                invalid(format!("rule '{}' names unknown task '{}'", rule.pattern, rule.task))
            })?;
            let step = step_for(&rule.task, spec, &placeholders)?.ok_or_else(|| {
                invalid(format!(
                    "task '{}' is a '{}' task; asset rules need copy, command or clean tasks",
                    rule.task, spec.kind
                ))
            })?;
            compile_glob(&rule.pattern).map_err(|e| invalid(e.to_string()))?;
            Ok((rule.pattern.clone(), step))
        })
        .collect()
}

/// Builds the task registry for `config`.
///
/// # Errors
///
/// Returns `ConfigError` for task entries missing required fields and for
/// invalid asset rules.
pub fn build_registry(config: &Config) -> std::result::Result<TaskRegistry, ConfigError> {
    let placeholders = Placeholders::from_config(config);
    let mut registry = TaskRegistry::new();

    for (name, spec) in config.task_specs() {
        let deps = spec.deps.clone();
        match spec.kind {
            TaskKind::Group => registry.register_group(&name, deps)?,
            TaskKind::Copy | TaskKind::Command | TaskKind::Clean => {
                let Some(step) = step_for(&name, &spec, &placeholders)? else {
                    continue;
                };
                registry.register(&name, deps, move |ctx: TaskContext| {
                    run_step(step.clone(), ctx)
                })?;
            }
            TaskKind::Bundle => registry.register(&name, deps, run_bundle)?,
            TaskKind::Watch => {
                let assets = asset_steps(config)?;
                registry.register(&name, deps, move |ctx: TaskContext| {
                    run_watch(assets.clone(), ctx)
                })?;
            }
            TaskKind::Serve => {
                let step = serve_step(&name, &spec, config);
                registry.register(&name, deps, move |ctx: TaskContext| {
                    run_serve(step.clone(), ctx)
                })?;
            }
        }
    }
    Ok(registry)
}

fn executor(ctx: &TaskContext) -> StepExecutor {
    StepExecutor::new(ctx.is_dry_run(), ctx.cancel_token().clone())
}

async fn run_step(step: Step, ctx: TaskContext) -> Result<Outcome> {
    executor(&ctx).run(&step).await?;
    Ok(Outcome::Finished)
}

async fn run_bundle(ctx: TaskContext) -> Result<Outcome> {
    let builder = BundleBuilder::new(BundleOptions::from_config(ctx.config()));
    let entry = builder.options().entry();
    let output = builder.options().output();

    if ctx.is_dry_run() {
        info!(
            entry = %entry.display(),
            output = %output.display(),
            "[dry-run] Would bundle scripts"
        );
        return Ok(Outcome::Finished);
    }

    let artifact = tokio::task::spawn_blocking(move || builder.build(&entry))
        .await
        .context("bundler thread stopped")??;
    info!(modules = artifact.modules, size = artifact.size, "{artifact}");
    Ok(Outcome::Finished)
}

async fn run_watch(assets: Vec<(String, Step)>, ctx: TaskContext) -> Result<Outcome> {
    let config = ctx.config();
    let options = BundleOptions::from_config(config);

    if ctx.is_dry_run() {
        info!(
            entry = %options.entry().display(),
            output = %options.output().display(),
            "[dry-run] Would bundle scripts and watch for changes"
        );
        return Ok(Outcome::Finished);
    }

    let backend = IncrementalBundler::new(BundleBuilder::new(options), &config.watch.triggers);

    let mut hook = AssetHook::new(&config.paths.root, executor(&ctx));
    for (pattern, step) in assets {
        hook.add_rule(&pattern, step)?;
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let watcher = FsWatcher::new(Duration::from_millis(config.watch.debounce_ms), tx)?;

    let mut coordinator = WatchCoordinator::new(backend, &config.paths.root)
        .with_assets(hook)
        .with_scope(watcher);
    coordinator.start().await;

    let cancel = ctx.cancel_token().clone();
    Ok(Outcome::detached(async move {
        coordinator.run(&mut rx, cancel).await?;
        Ok(())
    }))
}

async fn run_serve(step: Step, ctx: TaskContext) -> Result<Outcome> {
    let executor = executor(&ctx);
    if executor.is_dry_run() {
        executor.run(&step).await?;
        return Ok(Outcome::Finished);
    }

    let config = ctx.config();
    info!(
        port = config.serve.port,
        "Serving {} at http://localhost:{}",
        config.paths.output.display(),
        config.serve.port
    );

    Ok(Outcome::detached(async move {
        match executor.run(&step).await {
            Ok(_) | Err(StepError::Interrupted { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }))
}
