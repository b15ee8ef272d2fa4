use std::time::Duration;

use chrono::{DateTime, Utc};

/// "3m ago" style label for device cards, truncated to whole minutes.
pub fn last_seen_label(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - last_seen).num_seconds();
    if seconds < 60 {
        return "just now".to_owned();
    }
    let minutes = seconds as u64 / 60;
    format!(
        "{} ago",
        humantime::format_duration(Duration::from_secs(minutes * 60))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn recent_timestamps_read_as_just_now() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 6, 0, 0).unwrap();
        assert_eq!(last_seen_label(now, now), "just now");
        let skewed = now + chrono::Duration::seconds(30); // device clock ahead
        assert_eq!(last_seen_label(skewed, now), "just now");
    }

    #[test]
    fn older_timestamps_truncate_to_minutes() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 6, 0, 0).unwrap();
        let earlier = now - chrono::Duration::seconds(200 * 60 + 42);
        assert_eq!(last_seen_label(earlier, now), "3h 20m ago");
    }
}
