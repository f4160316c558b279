// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build steps: copy, clean and external commands.
//!
//! ```text
//! Step { name, kind, source, dest }
//!   Copy { pattern }     find_files(source, pattern) -> copy into dest
//!   Clean                remove everything inside dest
//!   Command { .. }       which(program) -> spawn in cwd -> exit code
//!        |
//!        v
//! StepExecutor::run  --> StepReport { name, count, dry_run, duration }
//! ```
//!
//! In dry-run mode steps only log what they would do. Nothing is written,
//! removed or spawned.

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::process::builder::ProcessBuilder;
use crate::error::StepError;
use crate::utility::fs::copy::copy_preserving_structure;
use crate::utility::fs::remove::remove_dir_contents;
use crate::utility::fs::walk::{WalkOptions, find_files};

/// What a step does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Copy files matching `pattern` (relative to the step source).
    Copy { pattern: String },
    /// Run an external program.
    Command {
        program: String,
        args: Vec<String>,
        cwd: Option<PathBuf>,
    },
    /// Empty the destination directory.
    Clean,
}

/// A single build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    name: String,
    kind: StepKind,
    source: Option<PathBuf>,
    dest: Option<PathBuf>,
}

impl Step {
    #[must_use]
    pub fn copy(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        pattern: impl Into<String>,
        dest: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: StepKind::Copy {
                pattern: pattern.into(),
            },
            source: Some(source.into()),
            dest: Some(dest.into()),
        }
    }

    #[must_use]
    pub fn command<I, S>(name: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: StepKind::Command {
                program: program.into(),
                args: args.into_iter().map(Into::into).collect(),
                cwd: None,
            },
            source: None,
            dest: None,
        }
    }

    #[must_use]
    pub fn clean(name: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind: StepKind::Clean,
            source: None,
            dest: Some(dest.into()),
        }
    }

    /// Working directory of a command step. Ignored by other kinds.
    #[must_use]
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        if let StepKind::Command { cwd, .. } = &mut self.kind {
            *cwd = Some(dir.into());
        }
        self
    }

    /// Directory created before a command step runs.
    #[must_use]
    pub fn with_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &StepKind {
        &self.kind
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn dest(&self) -> Option<&Path> {
        self.dest.as_deref()
    }
}

/// Result of a successful step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub name: String,
    /// Files copied, entries removed, or zero for commands.
    pub count: usize,
    pub dry_run: bool,
    pub duration: Duration,
}

/// Runs steps, honoring dry-run mode and cancellation.
#[derive(Debug, Clone, Default)]
pub struct StepExecutor {
    dry_run: bool,
    cancel_token: CancellationToken,
}

impl StepExecutor {
    #[must_use]
    pub const fn new(dry_run: bool, cancel_token: CancellationToken) -> Self {
        Self {
            dry_run,
            cancel_token,
        }
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Runs one step to completion.
    ///
    /// # Errors
    ///
    /// Returns `StepError` when the copy or clean fails, the program cannot
    /// be found or spawned, it exits with a non-zero code, or the step is
    /// cancelled.
    pub async fn run(&self, step: &Step) -> Result<StepReport, StepError> {
        if self.cancel_token.is_cancelled() {
            return Err(StepError::Interrupted {
                command: step.name.clone(),
            });
        }

        let started = Instant::now();
        let count = match &step.kind {
            StepKind::Copy { pattern } => self.copy(step, pattern).await?,
            StepKind::Clean => self.clean(step).await?,
            StepKind::Command { program, args, cwd } => {
                self.command(step, program, args, cwd.as_deref()).await?;
                0
            }
        };

        let report = StepReport {
            name: step.name.clone(),
            count,
            dry_run: self.dry_run,
            duration: started.elapsed(),
        };
        debug!(step = %report.name, count, ms = report.duration.as_millis(), "step done");
        Ok(report)
    }

    async fn copy(&self, step: &Step, pattern: &str) -> Result<usize, StepError> {
        let source = step.source.as_deref().unwrap_or_else(|| Path::new("."));
        let dest = step.dest.as_deref().unwrap_or_else(|| Path::new("."));

        let files = find_files(source, pattern, &WalkOptions::for_assets())?;

        if self.dry_run {
            info!(
                step = %step.name,
                files = files.len(),
                from = %source.display(),
                to = %dest.display(),
                "[dry-run] Would copy {pattern}"
            );
            return Ok(files.len());
        }

        let copied = copy_preserving_structure(source, &files, dest).await?;
        info!(step = %step.name, files = copied, to = %dest.display(), "copied");
        Ok(copied)
    }

    async fn clean(&self, step: &Step) -> Result<usize, StepError> {
        let Some(dest) = step.dest.as_deref() else {
            return Ok(0);
        };

        if self.dry_run {
            info!(step = %step.name, dir = %dest.display(), "[dry-run] Would clean");
            return Ok(0);
        }

        let removed = remove_dir_contents(dest).await?;
        info!(step = %step.name, dir = %dest.display(), removed, "cleaned");
        Ok(removed)
    }

    async fn command(
        &self,
        step: &Step,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
    ) -> Result<(), StepError> {
        if self.dry_run {
            let preview = ProcessBuilder::new(program).args(args).command_line();
            match cwd {
                Some(dir) => info!(step = %step.name, cwd = %dir.display(), "[dry-run] Would run: {preview}"),
                None => info!(step = %step.name, "[dry-run] Would run: {preview}"),
            }
            return Ok(());
        }

        if let Some(dest) = step.dest.as_deref() {
            tokio::fs::create_dir_all(dest)
                .await
                .map_err(|source| StepError::Spawn {
                    command: program.to_string(),
                    message: format!("cannot create '{}': {source}", dest.display()),
                })?;
        }

        let mut builder = ProcessBuilder::which(program)?.args(args).capture_stderr();
        if let Some(dir) = cwd {
            builder = builder.cwd(dir);
        }
        let command = builder.command_line();

        let output = builder
            .run_with_cancellation(self.cancel_token.child_token())
            .await?;

        if output.is_interrupted() {
            return Err(StepError::Interrupted { command });
        }
        Ok(())
    }
}
