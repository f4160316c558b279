// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Module graph.
//!
//! ```text
//! ModuleGraph { entry, modules: ModuleId -> Module }
//!
//! Module { id, kind, deps: [(specifier, ModuleId)], code, fingerprint }
//!
//! order()   post-order DFS from the entry: dependencies first, entry last
//! prune()   drop nodes no longer reachable from the entry
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Content hash of a module's source bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    #[must_use]
    pub fn of(bytes: impl AsRef<[u8]>) -> Self {
        Self(blake3::hash(bytes.as_ref()))
    }

    /// Hashes the current contents of a file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn of_file(path: &Path) -> std::io::Result<Self> {
        let mut hasher = blake3::Hasher::new();
        hasher.update_reader(std::fs::File::open(path)?)?;
        Ok(Self(hasher.finalize()))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.0.to_hex()[..16])
    }
}

/// Identity of a module in the graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleId {
    /// A file on disk (absolute, normalized).
    File(PathBuf),
    /// A configured external, keyed by its specifier.
    External(String),
}

impl ModuleId {
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::External(_) => None,
        }
    }

    /// Name written into the bundle record: files relative to `root` with
    /// forward slashes, externals as `external:<specifier>`.
    #[must_use]
    pub fn record_name(&self, root: &Path) -> String {
        match self {
            Self::File(path) => relative_display(path, root),
            Self::External(name) => format!("external:{name}"),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::External(name) => write!(f, "external:{name}"),
        }
    }
}

/// `path` relative to `root`, `/`-separated. Paths outside `root` are
/// returned whole.
#[must_use]
pub fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// How a module's source becomes code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// JavaScript, with ES module syntax lowered.
    Script,
    /// JSON document exported as a value.
    Json,
    /// Text file exported as a string.
    Text,
    /// Global expression standing in for a package.
    External,
}

/// One node of the graph.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub kind: ModuleKind,
    /// Resolved direct dependencies, in order of first reference.
    pub deps: Vec<(String, ModuleId)>,
    /// Transformed module body.
    pub code: String,
    pub fingerprint: Fingerprint,
}

/// All modules reachable from one entry.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    entry: ModuleId,
    modules: BTreeMap<ModuleId, Module>,
}

impl ModuleGraph {
    #[must_use]
    pub const fn new(entry: PathBuf) -> Self {
        Self {
            entry: ModuleId::File(entry),
            modules: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn entry(&self) -> &ModuleId {
        &self.entry
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.contains_key(id)
    }

    /// Whether a file on disk is a module of this graph.
    #[must_use]
    pub fn contains_file(&self, path: &Path) -> bool {
        self.modules.contains_key(&ModuleId::File(path.to_path_buf()))
    }

    /// Inserts or replaces a node, returning the previous one.
    pub fn insert(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.id.clone(), module)
    }

    pub fn remove(&mut self, id: &ModuleId) -> Option<Module> {
        self.modules.remove(id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Files on disk that belong to the graph.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.modules.keys().filter_map(ModuleId::as_path)
    }

    /// Modules in emission order: every dependency before its dependents,
    /// the entry last. Circular references are broken at the back edge.
    #[must_use]
    pub fn order(&self) -> Vec<&ModuleId> {
        let mut visited = BTreeSet::new();
        let mut order = Vec::with_capacity(self.modules.len());
        // Iterative post-order: (node, next dependency index)
        let mut stack: Vec<(&ModuleId, usize)> = Vec::new();

        if self.modules.contains_key(&self.entry) {
            visited.insert(&self.entry);
            stack.push((&self.entry, 0));
        }

        while let Some((id, next)) = stack.pop() {
            let deps = self.modules.get(id).map_or(&[][..], |m| m.deps.as_slice());
            if let Some((_, dep)) = deps.get(next) {
                stack.push((id, next + 1));
                if self.modules.contains_key(dep) && visited.insert(dep) {
                    stack.push((dep, 0));
                }
            } else {
                order.push(id);
            }
        }
        order
    }

    /// Drops nodes that are no longer reachable from the entry and returns
    /// their ids.
    pub fn prune(&mut self) -> Vec<ModuleId> {
        let reachable: BTreeSet<ModuleId> = self.order().into_iter().cloned().collect();
        let unreachable: Vec<ModuleId> = self
            .modules
            .keys()
            .filter(|id| !reachable.contains(*id))
            .cloned()
            .collect();
        for id in &unreachable {
            self.modules.remove(id);
        }
        unreachable
    }

    /// Directories containing the graph's files, plus the entry's directory.
    #[must_use]
    pub fn watch_dirs(&self) -> BTreeSet<PathBuf> {
        self.files()
            .chain(self.entry.as_path())
            .filter_map(Path::parent)
            .map(Path::to_path_buf)
            .collect()
    }
}
