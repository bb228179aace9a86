//! Internal utilities.

use chrono::{DateTime, TimeZone, Utc};
use std::io;

/// Checks whether the process runs with an effective UID of 0.
#[must_use]
pub fn is_root() -> bool {
    // SAFETY: `geteuid` has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Current UTC time as a fixed-width, lexicographically sortable stamp.
///
/// `20261018-142501.038211`
#[must_use]
pub fn timestamp() -> String {
    stamp(&Utc::now())
}

/// Formats `at` in UTC, so the stamp only depends on the instant and never
/// on `TZ` or daylight saving.
pub(crate) fn stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Utc)
        .format("%Y%m%d-%H%M%S%.6f")
        .to_string()
}

/// Unwraps the error of an `atomicwrites` write whose closure fails with
/// `io::Error`.
pub(crate) fn atomic_error(e: atomicwrites::Error<io::Error>) -> io::Error {
    match e {
        atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDateTime, TimeDelta};

    #[test]
    fn root_matches_euid() {
        // SAFETY: see `is_root`.
        let euid = unsafe { libc::geteuid() };
        assert_eq!(is_root(), euid == 0);
    }

    #[test]
    fn timestamp_is_fixed_width() {
        let a = timestamp();
        let b = timestamp();
        assert_eq!(a.len(), "20261018-142501.038211".len());
        assert!(a <= b);
    }

    #[test]
    fn timestamp_is_utc() {
        let before = Utc::now().naive_utc() - TimeDelta::seconds(1);
        let stamp = timestamp();
        let after = Utc::now().naive_utc();

        let parsed = NaiveDateTime::parse_from_str(&stamp, "%Y%m%d-%H%M%S%.f").unwrap();
        assert!(before <= parsed && parsed <= after, "{stamp}");
    }

    #[test]
    fn stamp_ignores_time_zone() {
        // One instant seen from UTC+14 (Kiritimati) and UTC-11 (Pago Pago).
        let east = FixedOffset::east_opt(14 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, 4, 25, 1)
            .unwrap();
        let west = FixedOffset::west_opt(11 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 18, 3, 25, 1)
            .unwrap();

        assert_eq!(stamp(&east), "20261018-142501.000000");
        assert_eq!(stamp(&east), stamp(&west));
    }

    #[test]
    fn later_instant_sorts_later_across_zones() {
        let first = FixedOffset::east_opt(14 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, 4, 25, 1)
            .unwrap();
        let second = FixedOffset::west_opt(11 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 18, 3, 25, 2)
            .unwrap();

        assert!(stamp(&first) < stamp(&second));
    }
}
