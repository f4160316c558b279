// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, cwd, piped stdio
//!              |
//!              v
//!          spawn()  --> StepError::Spawn
//!              |
//!              v
//!         run_child
//!              |
//!              v
//!    validate exit_code  --> StepError::NonZeroExit
//!    (skip if interrupted)
//!              |
//!              v
//!       ProcessOutput
//!    { exit_code, stderr, interrupted }
//! ```

use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessOutput};
use crate::error::StepError;

impl ProcessBuilder {
    /// Returns the display name for this process.
    pub(super) fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string, quoting arguments with spaces.
    #[must_use]
    pub fn command_line(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = self.display_name();
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// When the token is cancelled the child is killed and the output comes
    /// back with `interrupted = true`; the exit code is not validated in
    /// that case.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `StepError::Spawn` if spawning or waiting on the child fails.
    /// - `StepError::NonZeroExit` if the process exits with a non-zero code.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tokio_util::sync::CancellationToken;
    /// use frontline::core::process::builder::ProcessBuilder;
    ///
    /// # async fn example() -> Result<(), frontline::error::StepError> {
    /// let token = CancellationToken::new();
    /// let output = ProcessBuilder::new("python3")
    ///     .args(["-m", "http.server", "8000"])
    ///     .run_with_cancellation(token.child_token())
    ///     .await?;
    /// assert!(output.is_interrupted() || output.success());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_with_cancellation(
        self,
        token: CancellationToken,
    ) -> Result<ProcessOutput, StepError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_cancelled() {
            return Ok(ProcessOutput::new(-1, String::new(), true));
        }

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|e| StepError::Spawn {
                command: cmd_line.clone(),
                message: e.to_string(),
            })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self
            .run_child(&name, &mut child, token)
            .await
            .map_err(|e| StepError::Spawn {
                command: cmd_line.clone(),
                message: e.to_string(),
            })?;

        if !output.is_interrupted() && !output.success() {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(StepError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
            });
        }

        trace!(
            process = %name,
            exit_code = output.exit_code(),
            interrupted = output.is_interrupted(),
            "completed"
        );
        Ok(output)
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        // A dropped future (e.g. an aborted detached job) must not leak the child
        command.kill_on_drop(true);

        command
    }
}
