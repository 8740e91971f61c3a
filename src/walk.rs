//! Candidate file enumeration.

use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Returns true if any segment of `path` below `root` starts with a dot.
///
/// The root's own name never counts, so sweeping `~/.cache` still works.
pub fn is_hidden(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Lazily enumerate the regular files under `root`.
///
/// Without `recursive` only direct children are listed. Unless
/// `include_hidden` is set, dot-named entries are dropped as they are
/// discovered, so hidden directories (`.git` and friends) are never entered.
/// A symlink is yielded when its target is a regular file; symlinked
/// directories are never entered. Order is whatever the filesystem returns.
pub fn enumerate_files(
    root: &Path,
    recursive: bool,
    include_hidden: bool,
) -> impl Iterator<Item = PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        // Hidden filtering is ours: ignore's version would also apply to the root
        .hidden(false)
        // The sweep looks at the raw tree, not what git would show
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .max_depth(if recursive { None } else { Some(1) })
        .filter_entry(move |entry| include_hidden || !is_hidden_entry(entry));

    let root_display = root.display().to_string();
    builder.build().filter_map(move |result| {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(root = root_display.as_str(), error = %err, "Failed to access entry");
                return None;
            }
        };

        if is_file_entry(&entry) {
            Some(entry.into_path())
        } else {
            None
        }
    })
}

fn is_file_entry(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_symlink() => fs::metadata(entry.path()).is_ok_and(|m| m.is_file()),
        Some(ft) => ft.is_file(),
        None => false,
    }
}

/// Every entry below the root passes through here before its children are
/// read, so rejecting a name prunes its whole subtree.
fn is_hidden_entry(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}
