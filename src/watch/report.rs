// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build reports and change summaries.
//!
//! ```text
//! js/util.js updated, rebuilding...
//!
//! 2 scripts updated:
//! * js/app.js
//! * js/util.js
//!
//! app.js built in 0.12s
//! build failed in `js/util.js` after 0.03s: cannot resolve './missing' ...
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::bundle::BundleArtifact;
use crate::bundle::graph::relative_display;
use crate::error::BundleError;

/// Summary line(s) for a batch of changed paths, already made relative to
/// the watch root.
///
/// Returns `None` for an empty batch.
#[must_use]
pub fn change_summary(paths: &[String]) -> Option<String> {
    match paths {
        [] => None,
        [single] => Some(format!("{single} updated, rebuilding...")),
        many => {
            let mut out = format!("{} scripts updated:", many.len());
            for path in many {
                out.push_str("\n* ");
                out.push_str(path);
            }
            Some(out)
        }
    }
}

/// Outcome of one build cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// A new artifact was written.
    Built(BundleArtifact),
    /// Every changed module had the same fingerprint; nothing was written.
    UpToDate,
    /// The build failed and the previous artifact was kept.
    Failed { module: PathBuf, message: String },
}

/// What happened during the most recent build cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Changed paths relative to the watch root, sorted.
    pub changed: Vec<String>,
    pub status: BuildStatus,
    pub duration: Duration,
    pub finished_at: SystemTime,
}

impl BuildReport {
    /// Report for a finished build. `root` relativizes the failing module.
    #[must_use]
    pub fn new(
        changed: Vec<String>,
        result: Result<Option<BundleArtifact>, &BundleError>,
        duration: Duration,
        root: &Path,
    ) -> Self {
        let status = match result {
            Ok(Some(artifact)) => BuildStatus::Built(artifact),
            Ok(None) => BuildStatus::UpToDate,
            Err(error) => BuildStatus::Failed {
                module: PathBuf::from(relative_display(error.module(), root)),
                message: error.to_string(),
            },
        };

        Self {
            changed,
            status,
            duration,
            finished_at: SystemTime::now(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self.status, BuildStatus::Failed { .. })
    }

    #[must_use]
    pub const fn artifact(&self) -> Option<&BundleArtifact> {
        match &self.status {
            BuildStatus::Built(artifact) => Some(artifact),
            _ => None,
        }
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            BuildStatus::Built(artifact) => write!(f, "{artifact}"),
            BuildStatus::UpToDate => write!(
                f,
                "no content changes, bundle up to date ({:.2}s)",
                self.duration.as_secs_f64()
            ),
            BuildStatus::Failed { module, message } => write!(
                f,
                "build failed in `{}` after {:.2}s: {message}",
                module.display(),
                self.duration.as_secs_f64()
            ),
        }
    }
}
