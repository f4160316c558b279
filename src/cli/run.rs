// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the task-running commands.

use clap::Args;

/// Arguments for `run` and `plan`.
#[derive(Debug, Clone, Args)]
pub struct TaskArgs {
    /// Registered task name (see `frontline list`).
    #[arg(value_name = "TASK")]
    pub task: String,
}

/// Arguments for `serve` and `dev`.
#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Preview server port, overriding `serve.port`.
    #[arg(short = 'p', long, env = "PORT", value_name = "N")]
    pub port: Option<u16>,
}

/// Arguments for `package`.
#[derive(Debug, Clone, Args)]
pub struct PackageArgs {
    /// Mobile packaging task to run.
    #[arg(value_name = "TARGET", default_value = "prepare")]
    pub target: String,
}
