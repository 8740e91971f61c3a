//! The sweep: enumerate, filter, age-check and remove.

use crate::age::resolve_timestamp;
use crate::config::{normalize_path, SweepConfig};
use crate::time::{format_timestamp, Cutoff};
use crate::walk::enumerate_files;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use humansize::{format_size, BINARY};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Counters accumulated over one sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Every candidate the enumerator produced
    pub considered: usize,
    /// Files removed, or that would be removed in a dry run
    pub removed: usize,
    /// Candidates skipped because they were excluded
    pub excluded: usize,
    /// Candidates that disappeared before their timestamp was read
    pub missing: usize,
    /// Removals that failed
    pub failed: usize,
    /// Total size of the removed (or would-remove) files
    pub bytes_removed: u64,
}

/// Sweep `config.root` using the current time.
pub fn sweep(config: &SweepConfig) -> Result<SweepReport> {
    sweep_at(config, SystemTime::now())
}

/// Sweep `config.root` as if the current time were `now`.
///
/// Fails only if the root is missing or not a directory. Per-file problems
/// (vanished files, failed removals) are reported and skipped.
pub fn sweep_at(config: &SweepConfig, now: SystemTime) -> Result<SweepReport> {
    let root = &config.root;
    let metadata = fs::metadata(root)
        .with_context(|| format!("Cannot access target directory {}", root.display()))?;
    if !metadata.is_dir() {
        bail!("Target {} is not a directory", root.display());
    }

    tracing::debug!(
        root = %root.display(),
        days = config.days,
        source = %config.age_source,
        recursive = config.options.recursive,
        dry_run = config.options.dry_run,
        "Starting sweep"
    );

    let options = config.options;
    let candidates = enumerate_files(root, options.recursive, options.include_hidden);
    let report = sweep_paths(config, now, candidates);

    print_summary(config, &report);
    Ok(report)
}

/// Age-check and remove each of `candidates`, which are expected to lie under
/// `config.root`. No summary is printed.
pub fn sweep_paths(
    config: &SweepConfig,
    now: SystemTime,
    candidates: impl IntoIterator<Item = PathBuf>,
) -> SweepReport {
    let options = config.options;
    let cutoff = Cutoff::days_before(now, config.days);
    let excluded = config.excluded_paths();
    let mut report = SweepReport::default();

    for path in candidates {
        report.considered += 1;

        if excluded.contains(&normalize_path(&path)) {
            report.excluded += 1;
            if options.verbose {
                println!("Skip excluded: {}", path.display());
            }
            continue;
        }

        let timestamp = match resolve_timestamp(&path, config.age_source) {
            Ok(ts) => ts,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                // Removed by someone else since it was listed
                report.missing += 1;
                if options.verbose {
                    println!("Missing (skipped): {}", path.display());
                }
                continue;
            }
            Err(err) => {
                eprintln!(
                    "Warning: Could not read timestamp of {}: {}",
                    path.display(),
                    err
                );
                continue;
            }
        };

        if options.verbose {
            println!(
                "Check: {} | ts={} | cutoff={} | source={}",
                path.display(),
                format_timestamp(timestamp),
                cutoff.describe(),
                config.age_source
            );
        }

        if cutoff.is_older(timestamp) {
            remove_candidate(&path, options.dry_run, &mut report);
        }
    }

    report
}

fn remove_candidate(path: &Path, dry_run: bool, report: &mut SweepReport) {
    let size = fs::symlink_metadata(path).map(|m| m.len()).unwrap_or(0);

    if dry_run {
        println!("{}", format!("Would remove: {}", path.display()).yellow());
        report.removed += 1;
        report.bytes_removed += size;
        return;
    }

    match fs::remove_file(path) {
        Ok(()) => {
            println!("{}", format!("Removed: {}", path.display()).red());
            report.removed += 1;
            report.bytes_removed += size;
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Removal failed");
            eprintln!("Could not remove {}: {}", path.display(), err);
            report.failed += 1;
        }
    }
}

/// The one-line summary printed at the end of a sweep
pub fn summary_line(config: &SweepConfig, report: &SweepReport) -> String {
    let removed_label = if config.options.dry_run {
        "Removed (or would remove)"
    } else {
        "Removed"
    };
    format!(
        "Done. Considered={}, {}={}, Excluded={}, Source={}, Days={}, Recursive={}",
        report.considered,
        removed_label,
        report.removed,
        report.excluded,
        config.age_source,
        config.days,
        config.options.recursive
    )
}

fn print_summary(config: &SweepConfig, report: &SweepReport) {
    println!("{}", summary_line(config, report).bold());

    let size = format_size(report.bytes_removed, BINARY);
    if config.options.dry_run {
        println!("Would reclaim: {}", size.green());
    } else {
        println!("Reclaimed: {}", size.green());
    }
    if report.failed > 0 {
        eprintln!(
            "{}",
            format!("{} file(s) could not be removed", report.failed).red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::AgeSource;
    use filetime::{set_file_mtime, FileTime};
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    const DAY: u64 = 24 * 60 * 60;
    const NOW: u64 = 1_700_000_000;

    fn now() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(NOW)
    }

    fn write_aged(path: &Path, days_old: u64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "content").unwrap();
        set_file_mtime(path, FileTime::from_unix_time((NOW - days_old * DAY) as i64, 0)).unwrap();
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let config = SweepConfig::new(dir.path().join("nope"));
        let err = sweep_at(&config, now()).unwrap_err();
        assert!(err.to_string().contains("Cannot access target directory"));
    }

    #[test]
    fn test_file_root_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let err = sweep_at(&SweepConfig::new(&file), now()).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn test_removes_only_old_files() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join("old.txt"), 40);
        write_aged(&dir.path().join("new.txt"), 5);

        let report = sweep_at(&SweepConfig::new(dir.path()), now()).unwrap();

        assert_eq!(report.considered, 2);
        assert_eq!(report.removed, 1);
        assert_eq!(report.bytes_removed, "content".len() as u64);
        assert!(!dir.path().join("old.txt").exists());
        assert!(dir.path().join("new.txt").exists());
    }

    #[test]
    fn test_exactly_at_cutoff_is_kept() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join("edge.txt"), 30);

        let report = sweep_at(&SweepConfig::new(dir.path()), now()).unwrap();
        assert_eq!(report.removed, 0);
        assert!(dir.path().join("edge.txt").exists());
    }

    #[test]
    fn test_dry_run_keeps_everything() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join("old.txt"), 40);

        let mut config = SweepConfig::new(dir.path());
        config.options.dry_run = true;

        let first = sweep_at(&config, now()).unwrap();
        let second = sweep_at(&config, now()).unwrap();

        assert_eq!(first.removed, 1);
        assert_eq!(first, second);
        assert!(dir.path().join("old.txt").exists());
    }

    #[test]
    fn test_exclusions_are_root_relative() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join("keep.txt"), 90);
        write_aged(&dir.path().join("sub/keep.txt"), 90);

        let mut config = SweepConfig::new(dir.path());
        config.exclude = vec!["keep.txt".to_string()];
        config.options.recursive = true;

        let report = sweep_at(&config, now()).unwrap();

        assert_eq!(report.considered, 2);
        assert_eq!(report.excluded, 1);
        assert_eq!(report.removed, 1);
        assert!(dir.path().join("keep.txt").exists());
        assert!(!dir.path().join("sub/keep.txt").exists());
    }

    #[test]
    fn test_non_recursive_ignores_subdirectories() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join("sub/old.txt"), 90);

        let report = sweep_at(&SweepConfig::new(dir.path()), now()).unwrap();

        assert_eq!(report.considered, 0);
        assert!(dir.path().join("sub/old.txt").exists());
    }

    #[test]
    fn test_recursive_skips_hidden_directories() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join("sub/.hidden/old.txt"), 90);
        write_aged(&dir.path().join("sub/old2.txt"), 90);

        let mut config = SweepConfig::new(dir.path());
        config.options.recursive = true;

        let report = sweep_at(&config, now()).unwrap();

        assert_eq!(report.considered, 1);
        assert_eq!(report.removed, 1);
        assert!(dir.path().join("sub/.hidden/old.txt").exists());
        assert!(!dir.path().join("sub/old2.txt").exists());
    }

    #[test]
    fn test_include_hidden_reaches_dot_directories() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join(".cache/old.txt"), 90);

        let mut config = SweepConfig::new(dir.path());
        config.options.recursive = true;
        config.options.include_hidden = true;

        let report = sweep_at(&config, now()).unwrap();
        assert_eq!(report.removed, 1);
        assert!(!dir.path().join(".cache/old.txt").exists());
    }

    #[test]
    fn test_git_source_on_untracked_file_uses_mtime() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join("old.txt"), 40);
        write_aged(&dir.path().join("new.txt"), 1);

        let mut config = SweepConfig::new(dir.path());
        config.age_source = AgeSource::Git;

        let report = sweep_at(&config, now()).unwrap();
        assert_eq!(report.removed, 1);
        assert!(!dir.path().join("old.txt").exists());
        assert!(dir.path().join("new.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_removal_is_counted_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        write_aged(&locked.join("old.txt"), 90);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users ignore directory permissions
        let canary = locked.join("canary");
        if fs::write(&canary, "").is_ok() {
            eprintln!("directory permissions not enforced for this user, skipping");
            let _ = fs::remove_file(&canary);
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = sweep_at(&SweepConfig::new(&locked), now()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.considered, 1);
        assert_eq!(report.removed, 0);
        assert_eq!(report.failed, 1);
        assert!(locked.join("old.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_old_file_is_removed() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let target = outside.path().join("target.txt");
        write_aged(&target, 90);
        std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

        let report = sweep_at(&SweepConfig::new(dir.path()), now()).unwrap();

        assert_eq!(report.considered, 1);
        assert_eq!(report.removed, 1);
        assert!(fs::symlink_metadata(dir.path().join("link.txt")).is_err());
        assert!(target.exists());
    }

    #[test]
    fn test_vanished_candidate_is_skipped() {
        let dir = tempdir().unwrap();
        write_aged(&dir.path().join("gone.txt"), 90);
        write_aged(&dir.path().join("old.txt"), 90);

        let candidates: Vec<PathBuf> = enumerate_files(dir.path(), false, false).collect();
        assert_eq!(candidates.len(), 2);
        fs::remove_file(dir.path().join("gone.txt")).unwrap();

        let report = sweep_paths(&SweepConfig::new(dir.path()), now(), candidates);

        assert_eq!(report.considered, 2);
        assert_eq!(report.missing, 1);
        assert_eq!(report.removed, 1);
        assert_eq!(report.failed, 0);
        assert!(!dir.path().join("old.txt").exists());
    }

    #[test]
    fn test_vanished_candidate_is_never_counted_removed() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("gone.txt");
        write_aged(&gone, 90);

        let candidates: Vec<PathBuf> = enumerate_files(dir.path(), false, false).collect();
        fs::remove_file(&gone).unwrap();

        let mut config = SweepConfig::new(dir.path());
        config.options.dry_run = true;
        let report = sweep_paths(&config, now(), candidates);

        assert_eq!(report.considered, 1);
        assert_eq!(report.missing, 1);
        assert_eq!(report.removed, 0);
    }

    #[test]
    fn test_removal_error_leaves_candidate_in_place() {
        let dir = tempdir().unwrap();
        let stuck = dir.path().join("stuck");
        fs::create_dir(&stuck).unwrap();
        set_file_mtime(&stuck, FileTime::from_unix_time((NOW - 90 * DAY) as i64, 0)).unwrap();

        // remove_file refuses directories regardless of privileges
        let report = sweep_paths(&SweepConfig::new(dir.path()), now(), vec![stuck.clone()]);

        assert_eq!(report.considered, 1);
        assert_eq!(report.removed, 0);
        assert_eq!(report.failed, 1);
        assert!(stuck.is_dir());
    }

    #[test]
    fn test_pre_epoch_file_newer_than_cutoff_is_kept() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("1960.txt");
        fs::write(&file, "content").unwrap();
        set_file_mtime(&file, FileTime::from_unix_time(-300_000_000, 0)).unwrap();

        // About 1955
        let mut config = SweepConfig::new(dir.path());
        config.days = 25_000;

        let report = sweep_at(&config, now()).unwrap();
        assert_eq!(report.considered, 1);
        assert_eq!(report.removed, 0);
        assert!(file.exists());
    }

    #[test]
    fn test_summary_line() {
        let mut config = SweepConfig::new("/data");
        config.options.dry_run = true;
        let report = SweepReport {
            considered: 4,
            removed: 1,
            excluded: 2,
            ..Default::default()
        };

        assert_eq!(
            summary_line(&config, &report),
            "Done. Considered=4, Removed (or would remove)=1, Excluded=2, Source=mtime, Days=30, Recursive=false"
        );
    }
}
