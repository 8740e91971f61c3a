//! Sweep configuration and process-wide defaults.

use crate::age::AgeSource;
use std::collections::HashSet;
use std::env;
use std::path::{Component, Path, PathBuf};

/// Documentation file left alone in every sweep
pub const DOC_FILENAME: &str = "README.md";

/// Default age threshold in days
pub const DEFAULT_DAYS: u64 = 30;

/// Runtime flags controlling a sweep
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    pub dry_run: bool,
    pub verbose: bool,
    pub recursive: bool,
    pub include_hidden: bool,
}

/// Everything one sweep needs. Immutable once the sweep starts.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub root: PathBuf,
    pub days: u64,
    pub age_source: AgeSource,
    /// File names relative to `root` that are never removed
    pub exclude: Vec<String>,
    pub options: SweepOptions,
}

impl SweepConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SweepConfig {
            root: root.into(),
            days: DEFAULT_DAYS,
            age_source: AgeSource::default(),
            exclude: Vec::new(),
            options: SweepOptions::default(),
        }
    }

    /// Excluded names resolved against the root.
    ///
    /// Matching is root-relative: `notes.txt` protects `root/notes.txt` only,
    /// not a `notes.txt` deeper in the tree.
    pub fn excluded_paths(&self) -> HashSet<PathBuf> {
        self.exclude
            .iter()
            .map(|name| normalize_path(&self.root.join(name)))
            .collect()
    }
}

/// Exclusions every sweep starts with: the tool itself and [`DOC_FILENAME`]
pub fn default_excludes(self_name: Option<&str>) -> Vec<String> {
    self_name
        .into_iter()
        .chain([DOC_FILENAME])
        .map(str::to_string)
        .collect()
}

/// File name of the running executable
pub fn self_name() -> Option<String> {
    env::current_exe()
        .ok()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Directory containing the running executable, or `.` if unknown
pub fn default_root() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Lexically normalize a path: drop `.` components and fold `..` into
/// the preceding normal component. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}
