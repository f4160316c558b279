// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            FrontlineError (~24 bytes)
//!                     |
//!   +-------+------+------+------+------+------+
//!   |       |      |      |      |      |      |
//!   v       v      v      v      v      v      v
//! Config  Task  Bundle  Step  Watch    Io   Other
//!   Box    Box    Box    Box    Box    Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config  ParseError, InvalidValue, DuplicateTask, UnknownTask
//!   Task    Config, Cycle, Failed, Interrupted
//!   Bundle  Read, Transform, Unresolved, Write, Aborted
//!   Step    Copy, Glob, Clean, ExecutableNotFound, Spawn, NonZeroExit, Interrupted
//!   Watch   Notify, ChannelClosed
//!
//! All variants boxed => FrontlineError fits in 24 bytes.
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`FrontlineError`].
pub type FrontlineResult<T> = std::result::Result<T, FrontlineError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum FrontlineError {
    /// Configuration error (including duplicate/unknown task names).
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Task execution error.
    #[error("task error: {0}")]
    Task(#[from] Box<TaskError>),

    /// Script bundling error.
    #[error("bundle error: {0}")]
    Bundle(#[from] Box<BundleError>),

    /// Build step error.
    #[error("step error: {0}")]
    Step(#[from] Box<StepError>),

    /// Watch mode error.
    #[error("watch error: {0}")]
    Watch(#[from] Box<WatchError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for FrontlineError {
                fn from(err: $error) -> Self {
                    FrontlineError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    TaskError => Task,
    BundleError => Bundle,
    StepError => Step,
    WatchError => Watch,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
///
/// Duplicate and unknown task names are configuration errors: they are
/// structural and always fatal before any task runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// A task with this name is already registered.
    #[error("task '{0}' is already registered")]
    DuplicateTask(String),

    /// A task name that was never registered.
    #[error("{}", unknown_task_message(.name, .required_by.as_deref()))]
    UnknownTask {
        name: String,
        required_by: Option<String>,
    },
}

fn unknown_task_message(name: &str, required_by: Option<&str>) -> String {
    match required_by {
        Some(parent) => format!("task '{name}' (required by '{parent}') is not registered"),
        None => format!("task '{name}' is not registered"),
    }
}

// --- Cycle Errors ---

/// A dependency cycle found while resolving a task.
///
/// `cycle` starts and ends with the same task name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle detected: {}", .cycle.join(" -> "))]
pub struct CycleError {
    pub cycle: Vec<String>,
}

// --- Task Errors ---

/// Task execution errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Structural configuration problem (duplicate or unknown name).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dependency cycle.
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// A task action failed.
    #[error("task '{name}' failed: {source:#}")]
    Failed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Run was cancelled before the task started.
    #[error("task '{0}' was interrupted")]
    Interrupted(String),
}

impl TaskError {
    /// Name of the task that failed, if the error belongs to one task.
    #[must_use]
    pub fn task_name(&self) -> Option<&str> {
        match self {
            Self::Failed { name, .. } | Self::Interrupted(name) => Some(name),
            Self::Config(ConfigError::DuplicateTask(name)) => Some(name),
            Self::Config(ConfigError::UnknownTask { name, .. }) => Some(name),
            Self::Config(_) | Self::Cycle(_) => None,
        }
    }
}

// --- Bundle Errors ---

/// Script bundling errors. Every variant names the offending module.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Module could not be read.
    #[error("failed to read module '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source transform rejected the module.
    #[error("failed to transform module '{}': {message}", .path.display())]
    Transform { path: PathBuf, message: String },

    /// A `require`/`import` reference could not be resolved.
    #[error("cannot resolve '{specifier}' from module '{}'", .path.display())]
    Unresolved { path: PathBuf, specifier: String },

    /// The artifact could not be written.
    #[error("failed to write bundle '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build thread for `path` (the entry) stopped before finishing.
    #[error("bundling '{}' stopped: {message}", .path.display())]
    Aborted { path: PathBuf, message: String },
}

impl BundleError {
    /// The module (or output file) this error originates from.
    #[must_use]
    pub fn module(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Transform { path, .. }
            | Self::Unresolved { path, .. }
            | Self::Write { path, .. }
            | Self::Aborted { path, .. } => path,
        }
    }
}

// --- Step Errors ---

/// Build step errors.
#[derive(Debug, Error)]
pub enum StepError {
    /// Invalid glob selector.
    #[error("invalid glob '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    /// Copying a file failed.
    #[error("failed to copy '{}' to '{}': {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cleaning a directory failed.
    #[error("failed to clean '{}': {source}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to run '{command}': {message}")]
    Spawn { command: String, message: String },

    /// Process exited with non-zero status.
    #[error("'{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// The step was cancelled.
    #[error("'{command}' was interrupted")]
    Interrupted { command: String },
}

// --- Watch Errors ---

/// Watch mode errors.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The filesystem watcher could not be created or updated.
    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The event channel closed unexpectedly.
    #[error("change event channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests;
