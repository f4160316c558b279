// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem notifications.
//!
//! `notify-debouncer-full` runs on its own thread; each debounced batch of
//! create/modify/remove events becomes one [`ChangeEvent`] on a tokio
//! channel.
//!
//! Bundle directories are watched recursively. Directories holding trigger
//! files are watched for their direct entries only, so a trigger at the
//! project root does not pull in `node_modules/` or the output tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{DebounceEventResult, Debouncer, RecommendedCache, new_debouncer};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::{ChangeEvent, WatchScope, WatchTargets};
use crate::error::WatchError;

/// Debounced watcher feeding a change event channel.
pub struct FsWatcher {
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    watched: BTreeMap<PathBuf, RecursiveMode>,
}

impl fmt::Debug for FsWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsWatcher")
            .field("watched", &self.watched)
            .finish_non_exhaustive()
    }
}

impl FsWatcher {
    /// Starts the watcher thread. Nothing is watched until
    /// [`WatchScope::update`] is called.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::Notify` if the platform watcher cannot start.
    pub fn new(debounce: Duration, events: UnboundedSender<ChangeEvent>) -> Result<Self, WatchError> {
        let debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(batch) => {
                    let paths: Vec<PathBuf> = batch
                        .iter()
                        .filter(|de| {
                            matches!(
                                de.event.kind,
                                EventKind::Create(..) | EventKind::Modify(..) | EventKind::Remove(..)
                            )
                        })
                        .flat_map(|de| de.event.paths.iter().cloned())
                        .collect();
                    if !paths.is_empty() && events.send(ChangeEvent::new(paths)).is_err() {
                        debug!("change event receiver dropped");
                    }
                }
                Err(errors) => {
                    for e in errors {
                        warn!(error = %e, "watch error");
                    }
                }
            }
        })?;

        Ok(Self {
            debouncer,
            watched: BTreeMap::new(),
        })
    }

    /// Directories currently watched, with their mode.
    #[must_use]
    pub const fn watched(&self) -> &BTreeMap<PathBuf, RecursiveMode> {
        &self.watched
    }
}

/// Reduces `dirs` to existing roots that are not inside another root.
#[must_use]
pub fn collapse_watch_dirs(dirs: &BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
    let mut collapsed: BTreeSet<PathBuf> = BTreeSet::new();
    for dir in dirs.iter().filter(|d| d.is_dir()) {
        if collapsed.iter().any(|root| dir.starts_with(root)) {
            continue;
        }
        collapsed.insert(dir.clone());
    }
    collapsed
}

/// Watch registrations for `targets`: collapsed recursive roots, plus
/// shallow directories not already covered by one of them.
#[must_use]
pub fn plan_watches(targets: &WatchTargets) -> BTreeMap<PathBuf, RecursiveMode> {
    let recursive = collapse_watch_dirs(&targets.recursive);
    let shallow: Vec<PathBuf> = targets
        .shallow
        .iter()
        .filter(|dir| dir.is_dir() && !recursive.iter().any(|root| dir.starts_with(root)))
        .cloned()
        .collect();

    recursive
        .into_iter()
        .map(|dir| (dir, RecursiveMode::Recursive))
        .chain(shallow.into_iter().map(|dir| (dir, RecursiveMode::NonRecursive)))
        .collect()
}

impl WatchScope for FsWatcher {
    fn update(&mut self, targets: &WatchTargets) -> Result<(), WatchError> {
        let wanted = plan_watches(targets);

        let stale: Vec<PathBuf> = self
            .watched
            .iter()
            .filter(|(dir, mode)| wanted.get(*dir) != Some(*mode))
            .map(|(dir, _)| dir.clone())
            .collect();
        for dir in stale {
            if let Err(e) = self.debouncer.unwatch(&dir) {
                debug!(dir = %dir.display(), error = %e, "unwatch failed");
            }
            self.watched.remove(&dir);
        }

        for (dir, mode) in wanted {
            if self.watched.contains_key(&dir) {
                continue;
            }
            self.debouncer.watch(&dir, mode)?;
            debug!(dir = %dir.display(), recursive = (mode == RecursiveMode::Recursive), "watching");
            self.watched.insert(dir, mode);
        }
        Ok(())
    }
}
