// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render the elapsed time since `created_at` as a compact label,
/// e.g. "5m ago" or "2w ago".
///
/// The largest non-zero unit wins; all divisions truncate. Months are
/// 30 days and years 365 days.
pub fn relative_time_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(created_at).num_seconds().max(0);

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;
    let months = days / 30;
    let years = days / 365;

    if years > 0 {
        format!("{}y ago", years)
    } else if months > 0 {
        format!("{}mo ago", months)
    } else if weeks > 0 {
        format!("{}w ago", weeks)
    } else if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        format!("{}s ago", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_754_000_000, 0).unwrap()
    }

    #[test]
    fn test_seconds_before_first_minute() {
        let t = now() - Duration::seconds(59);
        assert_eq!(relative_time_label(t, now()), "59s ago");
    }

    #[test]
    fn test_ninety_seconds_is_one_minute() {
        let t = now() - Duration::seconds(90);
        assert_eq!(relative_time_label(t, now()), "1m ago");
    }

    #[test]
    fn test_three_days() {
        let t = now() - Duration::days(3);
        assert_eq!(relative_time_label(t, now()), "3d ago");
    }

    #[test]
    fn test_weeks_beat_days() {
        let t = now() - Duration::days(13);
        assert_eq!(relative_time_label(t, now()), "1w ago");
    }

    #[test]
    fn test_thirty_day_months() {
        let t = now() - Duration::days(45);
        assert_eq!(relative_time_label(t, now()), "1mo ago");
    }

    #[test]
    fn test_four_hundred_days_is_one_year() {
        let t = now() - Duration::days(400);
        assert_eq!(relative_time_label(t, now()), "1y ago");
    }

    #[test]
    fn test_future_timestamp_clamps_to_zero() {
        let t = now() + Duration::seconds(30);
        assert_eq!(relative_time_label(t, now()), "0s ago");
    }
}
