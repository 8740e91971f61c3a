//! Resolving a file's effective age from one of several timestamp sources.

use crate::vcs::last_commit_time;
use clap::ValueEnum;
use std::fmt;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Which timestamp decides how old a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum AgeSource {
    /// Last content modification
    #[default]
    #[value(alias = "modification")]
    Mtime,
    /// Last access
    #[value(alias = "access")]
    Atime,
    /// Inode status change (creation time on platforms without one)
    #[value(alias = "status-change")]
    Ctime,
    /// Last git commit touching the file, falling back to mtime
    #[value(alias = "version-control")]
    Git,
}

impl AgeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeSource::Mtime => "mtime",
            AgeSource::Atime => "atime",
            AgeSource::Ctime => "ctime",
            AgeSource::Git => "git",
        }
    }
}

impl fmt::Display for AgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the timestamp of `path` according to `source`.
///
/// Only reading the file's metadata can fail, most notably with
/// [`io::ErrorKind::NotFound`] when the file vanished after enumeration.
/// Git lookups that produce no answer fall back to the modification time.
pub fn resolve_timestamp(path: &Path, source: AgeSource) -> io::Result<SystemTime> {
    match source {
        AgeSource::Mtime => fs::metadata(path)?.modified(),
        AgeSource::Atime => fs::metadata(path)?.accessed(),
        AgeSource::Ctime => status_change_time(&fs::metadata(path)?),
        AgeSource::Git => match last_commit_time(path).found() {
            Some(time) => Ok(time),
            None => fs::metadata(path)?.modified(),
        },
    }
}

#[cfg(unix)]
fn status_change_time(metadata: &Metadata) -> io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    let base = crate::time::from_unix_seconds(metadata.ctime());
    Ok(base + std::time::Duration::new(0, nanos))
}

#[cfg(not(unix))]
fn status_change_time(metadata: &Metadata) -> io::Result<SystemTime> {
    metadata.created()
}
