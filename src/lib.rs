//! agesweep - Remove Files Past a Given Age
//!
//! agesweep deletes files in a directory whose age exceeds a threshold in days.
//! Age is taken from the modification, access or status-change time, or from
//! the last git commit touching the file (falling back to the modification time
//! for untracked files).
//!
//! ## Pipeline
//!
//! - `walk` lists candidate files, optionally recursing, pruning hidden
//!   directories before they are entered
//! - `config` resolves excluded names against the target root
//! - `age` resolves each candidate's timestamp, `vcs` answers git lookups
//! - `sweep` compares against the cutoff and removes (or reports, in a dry run)

pub mod age;
pub mod config;
pub mod sweep;
pub mod time;
pub mod vcs;
pub mod walk;

// Re-export commonly used items
pub use age::{resolve_timestamp, AgeSource};
pub use config::{
    default_excludes, default_root, normalize_path, self_name, SweepConfig, SweepOptions,
    DEFAULT_DAYS, DOC_FILENAME,
};
pub use sweep::{summary_line, sweep, sweep_at, sweep_paths, SweepReport};
pub use time::{format_timestamp, Cutoff};
pub use vcs::{last_commit_time, VcsLookup};
pub use walk::{enumerate_files, is_hidden};
