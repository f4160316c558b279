// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! frontline [global options] <command>
//! run <TASK>
//! clean | build | watch
//! serve [--port N] | dev [--port N]
//! package [TARGET]
//! list | plan <TASK>
//! options | version
//! ```

pub mod global;
pub mod run;


use crate::cli::global::GlobalOptions;
use crate::cli::run::{PackageArgs, ServeArgs, TaskArgs};
use clap::{Parser, Subcommand};

/// Front-end build pipeline.
#[derive(Debug, Parser)]
#[command(
    name = "frontline",
    author,
    version,
    about = "Front-end Build Pipeline",
    long_about = "frontline Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Copies assets, compiles stylesheets and bundles scripts for a\n\
                  single-page web app, with an incremental watch mode and a\n\
                  preview server. `frontline build` produces the output tree,\n\
                  `frontline dev` keeps it up to date while serving it.",
    after_help = "CONFIGURATION:\n\n\
                  frontline reads `frontline.toml` from the current directory if it\n\
                  exists, then every --config file in order, then FRONTLINE_*\n\
                  environment variables (nested keys use `__`, as in\n\
                  FRONTLINE_SERVE__PORT), then --set overrides. `[tasks.<name>]`\n\
                  entries replace the builtin task of the same name."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs a registered task and its dependencies.
    Run(TaskArgs),

    /// Empties the output directory.
    Clean,

    /// Builds the output tree once.
    Build,

    /// Builds, then rebuilds on change until interrupted.
    Watch,

    /// Serves the output directory.
    Serve(ServeArgs),

    /// Watch mode plus the preview server.
    Dev(ServeArgs),

    /// Runs a mobile packaging task.
    Package(PackageArgs),

    /// Lists tasks with their dependencies.
    List,

    /// Prints the resolved execution order of a task.
    Plan(TaskArgs),

    /// Lists all options and their effective values.
    Options,

    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,
}

impl Command {
    /// The task a task-running command executes.
    #[must_use]
    pub fn task_name(&self) -> Option<&str> {
        match self {
            Self::Run(args) => Some(&args.task),
            Self::Clean => Some("clean"),
            Self::Build => Some("build"),
            Self::Watch => Some("watch"),
            Self::Serve(_) => Some("serve"),
            Self::Dev(_) => Some("dev"),
            Self::Package(args) => Some(&args.target),
            Self::List | Self::Plan(_) | Self::Options | Self::Version => None,
        }
    }

    /// Port given on the command line (or `PORT`) for serving commands.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        match self {
            Self::Serve(args) | Self::Dev(args) => args.port,
            _ => None,
        }
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
