//! Last-commit lookups through the `git` command-line tool.

use crate::time::from_unix_seconds;
use std::path::Path;
use std::process::Command;
use std::time::SystemTime;

/// Outcome of asking version control for a file's last commit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsLookup {
    /// Commit time of the most recent commit touching the path
    Found(SystemTime),
    /// No usable answer; callers fall back to a filesystem timestamp
    Fallback(String),
}

impl VcsLookup {
    pub fn found(self) -> Option<SystemTime> {
        match self {
            VcsLookup::Found(time) => Some(time),
            VcsLookup::Fallback(_) => None,
        }
    }
}

/// Ask git for the commit time of the last commit touching `path`.
///
/// Runs `git log -1 --format=%ct -- <name>` from the file's parent directory,
/// so the lookup works regardless of the process working directory.
/// Never fails: a missing git binary, a non-zero exit, empty output or
/// unparsable output all yield [`VcsLookup::Fallback`].
pub fn last_commit_time(path: &Path) -> VcsLookup {
    let lookup = query_git(path);
    match &lookup {
        VcsLookup::Found(time) => {
            tracing::debug!(path = %path.display(), commit_time = ?time, "git commit time found");
        }
        VcsLookup::Fallback(reason) => {
            tracing::debug!(path = %path.display(), reason = reason.as_str(), "git lookup fell back");
        }
    }
    lookup
}

fn query_git(path: &Path) -> VcsLookup {
    let Some(name) = path.file_name() else {
        return VcsLookup::Fallback("path has no file name".to_string());
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    // `--` keeps names starting with '-' from being read as options
    let output = Command::new("git")
        .arg("log")
        .arg("-1")
        .arg("--format=%ct")
        .arg("--")
        .arg(name)
        .current_dir(dir)
        .output();

    let output = match output {
        Ok(output) => output,
        Err(err) => return VcsLookup::Fallback(format!("failed to run git: {}", err)),
    };

    if !output.status.success() {
        return VcsLookup::Fallback(format!("git exited with {}", output.status));
    }

    parse_commit_time(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the `%ct` output of `git log`
fn parse_commit_time(stdout: &str) -> VcsLookup {
    let value = stdout.trim();
    if value.is_empty() {
        return VcsLookup::Fallback("no commits touch this path".to_string());
    }

    match value.parse::<i64>() {
        Ok(secs) => VcsLookup::Found(from_unix_seconds(secs)),
        Err(_) => VcsLookup::Fallback(format!("unexpected git output: {}", value)),
    }
}
