//! Cutoff computation and timestamp rendering.

use chrono::{DateTime, Local};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// The instant a file's timestamp must precede to be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    /// `None` when the cutoff lies before the earliest representable time
    instant: Option<SystemTime>,
}

impl Cutoff {
    /// Cutoff `days` whole days before `now`, which may be before 1970.
    pub fn days_before(now: SystemTime, days: u64) -> Self {
        let instant = days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|secs| now.checked_sub(Duration::from_secs(secs)));

        Cutoff { instant }
    }

    /// Returns true if `timestamp` is strictly before the cutoff.
    /// Nothing is older than an unrepresentable cutoff.
    pub fn is_older(&self, timestamp: SystemTime) -> bool {
        self.instant.is_some_and(|cutoff| timestamp < cutoff)
    }

    pub fn instant(&self) -> Option<SystemTime> {
        self.instant
    }

    /// Human-readable form for reports
    pub fn describe(&self) -> String {
        match self.instant {
            Some(instant) => format_timestamp(instant),
            None => "beyond representable time".to_string(),
        }
    }
}

/// Render a timestamp in local time as `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Convert seconds since the UNIX epoch, negative for earlier instants
pub fn from_unix_seconds(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    }
}
