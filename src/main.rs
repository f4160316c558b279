// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> ConfigLoader --> Logging --> Command Dispatch
//!   Run/Clean/Build/Watch/Serve/Dev/Package | List | Plan | Options | Version
//! ```

use std::process::ExitCode;

use frontline::cli::global::GlobalOptions;
use frontline::cli::{self, Command};
use frontline::cmd::config::run_options_command;
use frontline::cmd::list::{run_list_command, run_plan_command};
use frontline::cmd::run::run_task_command;
use frontline::config::loader::ConfigLoader;
use frontline::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use frontline::error::BundleError;
use frontline::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::FAILURE;
    };
    if matches!(command, Command::Version) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let loader = match build_config_loader(&cli.global, command) {
        Ok(loader) => loader,
        Err(e) => return report_failure(&e),
    };
    let loaded_files = loader.format_loaded_files();
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config");
            return report_failure(&e);
        }
    };

    let _log_guard = match init_logging_from(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(files = ?loaded_files, "configuration loaded");

    let result = match command {
        Command::List => run_list_command(&config),
        Command::Plan(args) => run_plan_command(&config, &args.task),
        Command::Options => {
            run_options_command(&config, &loaded_files);
            Ok(())
        }
        other => match other.task_name() {
            Some(task) => run_task_command(task, config).await,
            None => Ok(()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e),
    }
}

fn build_config_loader(
    global: &GlobalOptions,
    command: &Command,
) -> frontline::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    for pair in global.to_config_overrides() {
        loader = loader.set_pair(&pair)?;
    }
    if let Some(port) = command.port() {
        loader = loader.set("serve.port", i64::from(port))?;
    }
    Ok(loader)
}

fn init_logging_from(config: &Config) -> frontline::error::Result<LogGuard> {
    let global = &config.global;
    let log_config = LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_file_format(global.log_format)
        .build();
    init_logging(&log_config)
}

fn report_failure(e: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {e:#}");
    if let Some(module) = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<BundleError>())
        .map(BundleError::module)
    {
        eprintln!("  in module: {}", module.display());
    }
    ExitCode::FAILURE
}
