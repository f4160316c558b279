// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use clap::Parser;
use frontline::cli::global::GlobalOptions;
use frontline::cli::{Cli, Command};
use frontline::config::loader::ConfigLoader;

// =============================================================================
// Version Command
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["frontline", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

// =============================================================================
// Task Commands
// =============================================================================

#[test]
fn cli_run_requires_task() {
    assert!(Cli::try_parse_from(["frontline", "run"]).is_err());
    assert!(Cli::try_parse_from(["frontline", "plan"]).is_err());
}

#[test]
fn cli_run_task() {
    let cli = Cli::try_parse_from(["frontline", "run", "watch-scripts"]).unwrap();
    let command = cli.command.unwrap();
    assert_eq!(command.task_name(), Some("watch-scripts"));
    assert_eq!(command.port(), None);
}

#[test]
fn cli_shortcuts_map_to_builtin_tasks() {
    let tasks: Vec<_> = ["clean", "build", "watch", "serve", "dev", "package"]
        .into_iter()
        .map(|cmd| {
            let cli = Cli::try_parse_from(["frontline", cmd]).unwrap();
            cli.command.unwrap().task_name().unwrap().to_string()
        })
        .collect();
    insta::assert_yaml_snapshot!(tasks, @r"
    - clean
    - build
    - watch
    - serve
    - dev
    - prepare
    ");
}

#[test]
fn cli_port_only_on_serving_commands() {
    assert!(Cli::try_parse_from(["frontline", "build", "--port", "9000"]).is_err());
    let cli = Cli::try_parse_from(["frontline", "dev", "--port", "9000"]).unwrap();
    assert_eq!(cli.command.unwrap().port(), Some(9000));
}

// =============================================================================
// Global Options
// =============================================================================

#[test]
fn cli_global_options_multiple_configs() {
    let cli = Cli::try_parse_from([
        "frontline",
        "-c",
        "base.toml",
        "--config",
        "ci.toml",
        "list",
    ])
    .unwrap();
    assert_eq!(
        cli.global.configs,
        [std::path::PathBuf::from("base.toml"), "ci.toml".into()]
    );
}

#[test]
fn cli_invalid_log_level() {
    let result = Cli::try_parse_from(["frontline", "-l", "7", "build"]);
    assert!(result.is_err());
}

#[test]
fn cli_file_log_level_independent() {
    let global = GlobalOptions {
        log_level: Some(2),
        file_log_level: Some(5),
        ..GlobalOptions::default()
    };
    assert_eq!(
        global.to_config_overrides(),
        ["global.output_log_level=2", "global.file_log_level=5"]
    );
}

#[test]
fn cli_overrides_apply_to_config() {
    let cli = Cli::try_parse_from([
        "frontline",
        "--dry",
        "-l",
        "4",
        "-s",
        "serve.port=9100",
        "-s",
        "bundle.entry=src/main.js",
        "options",
    ])
    .unwrap();

    let mut loader = ConfigLoader::new();
    for pair in cli.global.to_config_overrides() {
        loader = loader.set_pair(&pair).unwrap();
    }
    let config = loader.build().unwrap();

    assert!(config.global.dry);
    assert_eq!(config.global.output_log_level.as_u8(), 4);
    assert_eq!(config.global.file_log_level.as_u8(), 4);
    assert_eq!(config.serve.port, 9100);
    assert_eq!(config.bundle.entry, std::path::PathBuf::from("src/main.js"));
}
