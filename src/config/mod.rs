// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for frontline.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults (including builtin tasks)
//! 2. frontline.toml (cwd, optional)
//! 3. --config files
//! 4. FRONTLINE_* env vars
//! 5. --set KEY=VALUE and dedicated CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! FRONTLINE_GLOBAL__DRY=true         -> global.dry = true
//! FRONTLINE_SERVE__PORT=9000         -> serve.port = 9000
//! FRONTLINE_WATCH__DEBOUNCE_MS=100   -> watch.debounce_ms = 100
//! ```
//!
//! # Task Entries
//!
//! ```toml
//! [tasks.lint]
//! kind = "command"
//! program = "eslint"
//! args = ["{source}/js"]
//!
//! [tasks.build]          # replaces the builtin group
//! kind = "group"
//! deps = ["lint", "html", "less", "scripts"]
//! ```

pub mod loader;
pub mod paths;
pub mod tasks;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use paths::PathsConfig;
use tasks::{TaskKind, TaskSpec};
use types::{BundleConfig, GlobalConfig, ServeConfig, WatchConfig};

/// Name of the project configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "frontline.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "FRONTLINE";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Project layout.
    pub paths: PathsConfig,
    /// Script bundle.
    pub bundle: BundleConfig,
    /// Watch mode.
    pub watch: WatchConfig,
    /// Preview server.
    pub serve: ServeConfig,
    /// User task entries, overlaid on the builtin pipeline.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tasks: BTreeMap<String, TaskSpec>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use frontline::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("ci.toml")
    ///     .add_toml_file_optional("frontline.toml")
    ///     .with_env_prefix("FRONTLINE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Effective task table: builtin definitions overlaid with `[tasks.*]`.
    #[must_use]
    pub fn task_specs(&self) -> BTreeMap<String, TaskSpec> {
        tasks::merge_task_specs(tasks::builtin_task_specs(), &self.tasks)
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a task entry lacks a field its
    /// kind needs, or a watch setting is out of range.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.paths.resolve();

        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                section: "watch".to_string(),
                key: "debounce_ms".to_string(),
                message: "must be greater than zero".to_string(),
            }
            .into());
        }

        for (name, spec) in &self.tasks {
            validate_task_spec(name, spec)?;
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap` and aligned on `=`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_bundle_options(&mut options);
        self.format_watch_options(&mut options);
        self.format_serve_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file".into(), log_file.display().to_string());
        }
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("paths.root".into(), self.paths.root.display().to_string());
        options.insert(
            "paths.source".into(),
            self.paths.source.display().to_string(),
        );
        options.insert(
            "paths.output".into(),
            self.paths.output.display().to_string(),
        );
    }

    fn format_bundle_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "bundle.entry".into(),
            self.bundle.entry.display().to_string(),
        );
        options.insert(
            "bundle.output".into(),
            self.bundle.output.display().to_string(),
        );
        options.insert(
            "bundle.extensions".into(),
            self.bundle.extensions.join(", "),
        );
        options.insert(
            "bundle.text_extensions".into(),
            self.bundle.text_extensions.join(", "),
        );
        for (specifier, expression) in &self.bundle.externals {
            options.insert(format!("bundle.externals.{specifier}"), expression.clone());
        }
    }

    fn format_watch_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "watch.debounce_ms".into(),
            self.watch.debounce_ms.to_string(),
        );
        options.insert(
            "watch.triggers".into(),
            self.watch
                .triggers
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );
        for rule in &self.watch.assets {
            options.insert(format!("watch.assets.{}", rule.task), rule.pattern.clone());
        }
    }

    fn format_serve_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("serve.port".into(), self.serve.port.to_string());
        options.insert("serve.program".into(), self.serve.program.clone());
        options.insert("serve.args".into(), self.serve.args.join(" "));
    }
}

fn validate_task_spec(name: &str, spec: &TaskSpec) -> std::result::Result<(), ConfigError> {
    let missing = |key: &str| ConfigError::InvalidValue {
        section: format!("tasks.{name}"),
        key: key.to_string(),
        message: format!("required for '{}' tasks", spec.kind),
    };

    match spec.kind {
        TaskKind::Copy => {
            if spec.source.is_none() {
                return Err(missing("source"));
            }
            if spec.dest.is_none() {
                return Err(missing("dest"));
            }
        }
        TaskKind::Command if spec.program.is_none() => return Err(missing("program")),
        TaskKind::Clean if spec.dest.is_none() => return Err(missing("dest")),
        _ => {}
    }
    Ok(())
}
