// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task specifications.
//!
//! ```text
//! builtin_task_specs()          [tasks.*] from config
//!         |                             |
//!         +------- merge by name -------+
//!                       |
//!                       v
//!          BTreeMap<String, TaskSpec> --> pipeline::build_registry
//! ```
//!
//! A user entry replaces the builtin entry of the same name wholesale.
//! String fields may contain `{root}`, `{source}`, `{output}` and `{port}`
//! placeholders, substituted when the pipeline is assembled.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a task does when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Copy files matching `pattern` from `source` into `dest`.
    Copy,
    /// Run `program` with `args` in `cwd`.
    Command,
    /// Empty `dest`, keeping the directory itself.
    Clean,
    /// One-shot script bundle.
    Bundle,
    /// Initial bundle, then the incremental watch loop (long-running).
    Watch,
    /// Preview server from the `[serve]` section (long-running).
    Serve,
    /// Dependencies only.
    Group,
}

impl TaskKind {
    /// Whether this kind hands back a long-running job.
    #[must_use]
    pub const fn is_long_running(self) -> bool {
        matches!(self, Self::Watch | Self::Serve)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Command => "command",
            Self::Clean => "clean",
            Self::Bundle => "bundle",
            Self::Watch => "watch",
            Self::Serve => "serve",
            Self::Group => "group",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `[tasks.<name>]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    pub kind: TaskKind,
    /// Tasks that must finish first, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,
    /// Glob relative to `source` (copy tasks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

impl TaskSpec {
    /// A spec of the given kind with every optional field empty.
    #[must_use]
    pub const fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            deps: Vec::new(),
            source: None,
            dest: None,
            pattern: None,
            program: None,
            args: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn group<I, S>(deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(TaskKind::Group).with_deps(deps)
    }

    #[must_use]
    pub fn copy(source: &str, pattern: &str, dest: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            pattern: Some(pattern.to_string()),
            dest: Some(dest.to_string()),
            ..Self::new(TaskKind::Copy)
        }
    }

    #[must_use]
    pub fn command(program: &str, args: &[&str]) -> Self {
        Self {
            program: Some(program.to_string()),
            args: args.iter().map(|&arg| arg.to_string()).collect(),
            ..Self::new(TaskKind::Command)
        }
    }

    #[must_use]
    pub fn with_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_dest(mut self, dest: &str) -> Self {
        self.dest = Some(dest.to_string());
        self
    }

    #[must_use]
    pub fn with_cwd(mut self, cwd: &str) -> Self {
        self.cwd = Some(cwd.to_string());
        self
    }
}

const ASSET_TASKS: [&str; 4] = ["html", "images", "fonts", "less"];

/// The default pipeline.
///
/// ```text
/// clean           clean {output}
/// serve           preview server (long-running)
/// less            lessc src/css/app.less -> www/css/app.css
/// html            copy src/index.html -> www
/// images, fonts   copy src/{img,fonts}/** -> www/{img,fonts}
/// scripts         bundle
/// watch-scripts   bundle + watch loop (long-running)
/// build           html images fonts less scripts
/// watch           html images fonts less watch-scripts
/// dev             watch serve
/// prepare         cordova prepare   (after build steps)
/// android         cordova run android (after prepare)
/// ```
#[must_use]
pub fn builtin_task_specs() -> BTreeMap<String, TaskSpec> {
    let with_assets = |last: &str| {
        ASSET_TASKS
            .iter()
            .copied()
            .chain(std::iter::once(last))
            .map(String::from)
            .collect::<Vec<_>>()
    };

    let specs = [
        ("clean", TaskSpec::new(TaskKind::Clean).with_dest("{output}")),
        ("serve", TaskSpec::new(TaskKind::Serve)),
        (
            "less",
            TaskSpec::command("lessc", &["{source}/css/app.less", "{output}/css/app.css"])
                .with_dest("{output}/css")
                .with_cwd("{root}"),
        ),
        ("html", TaskSpec::copy("{source}", "index.html", "{output}")),
        ("images", TaskSpec::copy("{source}/img", "**/*", "{output}/img")),
        ("fonts", TaskSpec::copy("{source}/fonts", "**/*", "{output}/fonts")),
        ("scripts", TaskSpec::new(TaskKind::Bundle)),
        ("watch-scripts", TaskSpec::new(TaskKind::Watch)),
        ("build", TaskSpec::group(with_assets("scripts"))),
        ("watch", TaskSpec::group(with_assets("watch-scripts"))),
        ("dev", TaskSpec::group(["watch", "serve"])),
        (
            "prepare",
            TaskSpec::command("cordova", &["prepare"])
                .with_cwd("{root}")
                .with_deps(with_assets("scripts")),
        ),
        (
            "android",
            TaskSpec::command("cordova", &["run", "android"])
                .with_cwd("{root}")
                .with_deps(["prepare"]),
        ),
    ];

    specs
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect()
}

/// Overlay user task entries on the builtin set by name.
#[must_use]
pub fn merge_task_specs(
    mut base: BTreeMap<String, TaskSpec>,
    user: &BTreeMap<String, TaskSpec>,
) -> BTreeMap<String, TaskSpec> {
    for (name, spec) in user {
        base.insert(name.clone(), spec.clone());
    }
    base
}
