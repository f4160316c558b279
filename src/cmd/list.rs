// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `list` and `plan` commands.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::build_registry;

/// One line per task: name, kind and dependencies, aligned.
#[must_use]
pub fn format_task_list(config: &Config) -> Vec<String> {
    let specs = config.task_specs();
    let width = specs.keys().map(String::len).max().unwrap_or(0);

    specs
        .iter()
        .map(|(name, spec)| {
            let line = format!("{name:<width$}  {:<7}  {}", spec.kind, spec.deps.join(", "));
            line.trim_end().to_string()
        })
        .collect()
}

/// Numbered execution order of `task`.
///
/// # Errors
///
/// Returns an error if the registry cannot be assembled or the plan is
/// invalid (unknown task, cycle).
pub fn format_plan(config: &Config, task: &str) -> Result<Vec<String>> {
    let order = build_registry(config)?.plan(task)?;
    Ok(order
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {name}", i + 1))
        .collect())
}

/// Main handler for the list command.
///
/// # Errors
///
/// Returns an error if a task entry is invalid.
pub fn run_list_command(config: &Config) -> Result<()> {
    build_registry(config)?;
    for line in format_task_list(config) {
        println!("{line}");
    }
    Ok(())
}

/// Main handler for the plan command.
///
/// # Errors
///
/// See [`format_plan`].
pub fn run_plan_command(config: &Config, task: &str) -> Result<()> {
    for line in format_plan(config, task)? {
        println!("{line}");
    }
    Ok(())
}
