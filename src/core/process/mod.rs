// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::which("lessc")
//!   .args() .cwd() .capture_stderr()
//!   .run_with_cancellation(token)
//!       --> tokio::process::Command (kill_on_drop)
//!           stream stdout/stderr to the log
//!       --> ProcessOutput { exit_code, stderr, interrupted }
//! ```

pub mod builder;
mod io;
mod runner;
