// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, PathsConfig, BundleConfig, WatchConfig, ServeConfig
//! tasks:  task name -> TaskSpec (merged over builtin definitions)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::logging::{LogFormat, LogLevel};

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log actions without touching the filesystem or spawning processes.
    pub dry: bool,
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file layer when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Format of the log file.
    pub log_format: LogFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_format: LogFormat::Text,
        }
    }
}

/// Script bundle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Entry module, relative to the project root.
    pub entry: PathBuf,
    /// Bundle output file, relative to the project root.
    pub output: PathBuf,
    /// Extensions tried when resolving extensionless specifiers.
    pub extensions: Vec<String>,
    /// Extensions bundled as plain string exports.
    pub text_extensions: Vec<String>,
    /// Bare specifiers mapped to a global expression instead of a file.
    pub externals: BTreeMap<String, String>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        let mut externals = BTreeMap::new();
        externals.insert(
            "xmlhttprequest".to_string(),
            "{XMLHttpRequest:XMLHttpRequest}".to_string(),
        );

        Self {
            entry: PathBuf::from("src/js/app.js"),
            output: PathBuf::from("www/js/app.js"),
            extensions: vec![".js".to_string(), ".jsx".to_string(), ".json".to_string()],
            text_extensions: vec![".html".to_string(), ".txt".to_string()],
            externals,
        }
    }
}

/// A glob whose matching changes re-run a step task in watch mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetRule {
    /// Glob relative to the project root (e.g. `src/css/**/*.less`).
    pub pattern: String,
    /// Task to run when a matching path changes.
    pub task: String,
}

impl AssetRule {
    #[must_use]
    pub fn new(pattern: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            task: task.into(),
        }
    }
}

/// Watch mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Debounce window for filesystem notifications.
    pub debounce_ms: u64,
    /// Files whose change forces a full bundle rebuild.
    pub triggers: Vec<PathBuf>,
    /// Asset rules re-running step tasks.
    pub assets: Vec<AssetRule>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            triggers: vec![PathBuf::from("frontline.toml"), PathBuf::from("package.json")],
            assets: vec![
                AssetRule::new("src/index.html", "html"),
                AssetRule::new("src/css/**/*.less", "less"),
                AssetRule::new("src/img/**/*.*", "images"),
                AssetRule::new("src/fonts/**/*.*", "fonts"),
            ],
        }
    }
}

/// Preview server configuration. The server itself is an external program.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Port substituted for `{port}`.
    pub port: u16,
    /// Server executable.
    pub program: String,
    /// Server arguments (placeholders allowed).
    pub args: Vec<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            program: "python3".to_string(),
            args: ["-m", "http.server", "{port}", "--directory", "{output}"]
                .map(String::from)
                .to_vec(),
        }
    }
}
