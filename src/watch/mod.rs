// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Incremental watch mode.
//!
//! # Architecture
//!
//! ```text
//! FsWatcher (notify-debouncer-full thread)
//!      |  ChangeEvent { paths, timestamp }
//!      v
//! mpsc channel
//!      |
//!      v
//! WatchCoordinator::run
//!   recv one event            (nothing is read while a build runs)
//!   drain pending events      try_recv until empty
//!   enqueue: filter + merge   ChangeSet (path union)
//!   flush:
//!     asset paths  --> AssetHook --> StepExecutor (errors logged)
//!     bundle paths --> Idle -> Building -> Idle
//!                      Rebuild::rebuild(&ChangeSet)
//!                      BuildReport (kept until the next build)
//!                      WatchScope::update after every build
//! ```
//!
//! # State Machine
//!
//! ```text
//!            flush (bundle paths)
//!   Idle  ----------------------->  Building
//!    ^                                 |
//!    +------- success or failure ------+
//! ```
//!
//! Builds are awaited inline by the loop, so at most one is in flight and
//! events that arrive meanwhile are merged into exactly one next build.

pub mod assets;
pub mod fs;
pub mod incremental;
pub mod report;


use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use futures_util::future::BoxFuture;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::bundle::BundleArtifact;
use crate::bundle::graph::relative_display;
use crate::error::{BundleError, WatchError};
use crate::utility::fs::normalize_path;

use assets::AssetHook;
use report::{BuildReport, change_summary};

/// Paths that changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub paths: Vec<PathBuf>,
    pub timestamp: SystemTime,
}

impl ChangeEvent {
    /// An event stamped with the current time.
    #[must_use]
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            timestamp: SystemTime::now(),
        }
    }
}

/// Queued changes, merged by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<PathBuf>,
    first_seen: Option<SystemTime>,
    last_seen: Option<SystemTime>,
}

impl ChangeSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            paths: BTreeSet::new(),
            first_seen: None,
            last_seen: None,
        }
    }

    /// Adds one path seen at `at`. Returns whether the path was new.
    pub fn insert(&mut self, path: PathBuf, at: SystemTime) -> bool {
        self.first_seen = Some(self.first_seen.map_or(at, |first| first.min(at)));
        self.last_seen = Some(self.last_seen.map_or(at, |last| last.max(at)));
        self.paths.insert(path)
    }

    /// Merges every path of `event`.
    pub fn merge(&mut self, event: ChangeEvent) {
        for path in event.paths {
            self.insert(path, event.timestamp);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    #[must_use]
    pub const fn first_seen(&self) -> Option<SystemTime> {
        self.first_seen
    }

    #[must_use]
    pub const fn last_seen(&self) -> Option<SystemTime> {
        self.last_seen
    }

    /// The paths matching `pred`, with the same timestamps.
    #[must_use]
    pub fn filtered(&self, pred: impl Fn(&Path) -> bool) -> Self {
        Self {
            paths: self.paths.iter().filter(|p| pred(p)).cloned().collect(),
            first_seen: self.first_seen,
            last_seen: self.last_seen,
        }
    }

    /// Paths relative to `root`, `/`-separated and sorted.
    #[must_use]
    pub fn relative_to(&self, root: &Path) -> Vec<String> {
        self.paths.iter().map(|p| relative_display(p, root)).collect()
    }
}

impl FromIterator<PathBuf> for ChangeSet {
    fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
        let mut set = Self::new();
        set.merge(ChangeEvent::new(iter));
        set
    }
}

/// A bundler the coordinator can drive.
pub trait Rebuild: Send {
    /// Builds everything from scratch.
    fn initial_build(&mut self) -> BoxFuture<'_, Result<BundleArtifact, BundleError>>;

    /// Rebuilds after `changes`. `Ok(None)` means nothing needed writing.
    fn rebuild<'a>(
        &'a mut self,
        changes: &'a ChangeSet,
    ) -> BoxFuture<'a, Result<Option<BundleArtifact>, BundleError>>;

    /// Whether a change to `path` concerns the bundle.
    fn is_tracked(&self, path: &Path) -> bool;

    /// Directories to watch for the bundle.
    fn watch_scope(&self) -> WatchTargets;

    /// Paths of a failed batch that the next rebuild applies again.
    fn retry_paths(&self) -> BTreeSet<PathBuf> {
        BTreeSet::new()
    }
}

/// Directories a watcher should follow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchTargets {
    /// Followed with every subdirectory.
    pub recursive: BTreeSet<PathBuf>,
    /// Followed for their direct entries only (trigger files).
    pub shallow: BTreeSet<PathBuf>,
}

/// Something that can follow a set of directories.
pub trait WatchScope: Send {
    /// Replaces the watched set with `targets`.
    ///
    /// # Errors
    ///
    /// Returns `WatchError` if the underlying watcher rejects a directory.
    /// Directories handled before the failure stay watched.
    fn update(&mut self, targets: &WatchTargets) -> Result<(), WatchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Building,
}

/// Serializes bundle rebuilds in response to change events.
pub struct WatchCoordinator<R> {
    backend: R,
    root: PathBuf,
    assets: Option<AssetHook>,
    scope: Option<Box<dyn WatchScope>>,
    state: CoordinatorState,
    pending: ChangeSet,
    last_report: Option<BuildReport>,
    builds: usize,
    started: bool,
}

impl<R> fmt::Debug for WatchCoordinator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchCoordinator")
            .field("root", &self.root)
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .field("builds", &self.builds)
            .finish_non_exhaustive()
    }
}

impl<R: Rebuild> WatchCoordinator<R> {
    /// `root` relativizes paths in reports.
    #[must_use]
    pub fn new(backend: R, root: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            root: root.into(),
            assets: None,
            scope: None,
            state: CoordinatorState::Idle,
            pending: ChangeSet::new(),
            last_report: None,
            builds: 0,
            started: false,
        }
    }

    #[must_use]
    pub fn with_assets(mut self, assets: AssetHook) -> Self {
        self.assets = Some(assets);
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl WatchScope + 'static) -> Self {
        self.scope = Some(Box::new(scope));
        self
    }

    #[must_use]
    pub const fn state(&self) -> CoordinatorState {
        self.state
    }

    #[must_use]
    pub const fn last_report(&self) -> Option<&BuildReport> {
        self.last_report.as_ref()
    }

    #[must_use]
    pub const fn pending(&self) -> &ChangeSet {
        &self.pending
    }

    /// Number of bundle builds run so far, the initial one included.
    #[must_use]
    pub const fn builds(&self) -> usize {
        self.builds
    }

    #[must_use]
    pub const fn backend(&self) -> &R {
        &self.backend
    }

    /// Runs the initial full build and starts watching.
    ///
    /// A failed initial build is logged and reported; the coordinator still
    /// becomes ready for changes.
    pub async fn start(&mut self) -> &BuildReport {
        self.started = true;
        self.state = CoordinatorState::Building;
        let started = Instant::now();
        let result = self.backend.initial_build().await;
        self.state = CoordinatorState::Idle;
        self.builds += 1;

        let report = BuildReport::new(
            Vec::new(),
            result.as_ref().map(|artifact| Some(artifact.clone())),
            started.elapsed(),
            &self.root,
        );
        self.finish(report)
    }

    /// Queues the relevant paths of `event`. Returns how many paths were
    /// not already queued.
    ///
    /// A path is relevant if the bundle tracks it or an asset rule matches.
    pub fn enqueue(&mut self, event: ChangeEvent) -> usize {
        let mut added = 0;
        for path in event.paths {
            let path = normalize_path(&path);
            let tracked = self.backend.is_tracked(&path)
                || self.assets.as_ref().is_some_and(|hook| hook.matches(&path));
            if tracked {
                if self.pending.insert(path, event.timestamp) {
                    added += 1;
                }
            } else {
                debug!(path = %path.display(), "ignoring change outside the bundle");
            }
        }
        added
    }

    /// Processes everything queued: asset tasks first, then at most one
    /// bundle build. Returns the build report if a build ran.
    pub async fn flush(&mut self) -> Option<&BuildReport> {
        if self.pending.is_empty() {
            return None;
        }
        let pending = std::mem::take(&mut self.pending);

        if let Some(hook) = &self.assets {
            let asset_paths = pending.filtered(|path| hook.matches(path));
            hook.run_for(&asset_paths).await;
        }

        let changes = pending.filtered(|path| self.backend.is_tracked(path));
        if changes.is_empty() {
            return None;
        }

        let mut effective: BTreeSet<PathBuf> = changes.paths().map(Path::to_path_buf).collect();
        effective.extend(self.backend.retry_paths());
        let changed: Vec<String> = effective
            .iter()
            .map(|path| relative_display(path, &self.root))
            .collect();
        if let Some(summary) = change_summary(&changed) {
            info!("{summary}");
        }

        self.state = CoordinatorState::Building;
        let started = Instant::now();
        let result = self.backend.rebuild(&changes).await;
        self.state = CoordinatorState::Idle;
        self.builds += 1;

        let report = BuildReport::new(
            changed,
            result.as_ref().cloned(),
            started.elapsed(),
            &self.root,
        );
        Some(self.finish(report))
    }

    fn finish(&mut self, report: BuildReport) -> &BuildReport {
        if report.is_success() {
            info!("{report}");
        } else {
            error!("{report}");
        }
        self.refresh_scope();
        self.last_report.insert(report)
    }

    fn refresh_scope(&mut self) {
        let Some(scope) = self.scope.as_mut() else {
            return;
        };
        let mut targets = self.backend.watch_scope();
        if let Some(hook) = &self.assets {
            targets.recursive.extend(hook.watch_roots());
        }
        if let Err(e) = scope.update(&targets) {
            error!(error = %e, "failed to update watched directories");
        }
    }

    /// Event loop: initial build (unless [`start`](Self::start) already
    /// ran), then one build per batch of events until `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::ChannelClosed` if every sender is dropped.
    pub async fn run(
        &mut self,
        events: &mut UnboundedReceiver<ChangeEvent>,
        cancel: CancellationToken,
    ) -> Result<(), WatchError> {
        if !self.started {
            self.start().await;
        }
        info!("watching for changes...");

        loop {
            let event = tokio::select! {
                () = cancel.cancelled() => {
                    info!("watch stopped");
                    return Ok(());
                }
                event = events.recv() => event,
            };
            let Some(event) = event else {
                return Err(WatchError::ChannelClosed);
            };
            self.enqueue(event);

            loop {
                match events.try_recv() {
                    Ok(event) => {
                        self.enqueue(event);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.flush().await;
                        return Err(WatchError::ChannelClosed);
                    }
                }
            }

            self.flush().await;
        }
    }
}
