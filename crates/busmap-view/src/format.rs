//! Update-time labels.

use chrono::{DateTime, Duration, Utc};

/// Human-readable "last updated" label, empty until the first update.
///
/// Example: `Updated: 06.08.2026 14:03:21 (12 seconds ago)`.
pub fn update_time(time: Option<DateTime<Utc>>) -> String {
    let Some(time) = time else {
        return String::new();
    };
    format!(
        "Updated: {} ({})",
        time.format("%d.%m.%Y %H:%M:%S"),
        distance_in_words(Utc::now() - time),
    )
}

/// Humanize a duration since an update, seconds granularity.
pub fn distance_in_words(since: Duration) -> String {
    let seconds = since.num_seconds().max(0);
    let minutes = since.num_minutes();
    let hours = since.num_hours();
    let days = since.num_days();

    if seconds < 5 {
        "less than 5 seconds ago".to_string()
    } else if seconds < 60 {
        format!("{seconds} seconds ago")
    } else if minutes == 1 {
        "a minute ago".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours == 1 {
        "about an hour ago".to_string()
    } else if hours < 24 {
        format!("about {hours} hours ago")
    } else if days == 1 {
        "a day ago".to_string()
    } else {
        format!("{days} days ago")
    }
}
