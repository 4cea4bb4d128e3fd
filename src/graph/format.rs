//! Pure per-commit text formatting.

use chrono::{DateTime, Local, Utc};
use std::fmt::Write;
use regex::Regex;
use std::sync::LazyLock;

static TICKET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^#?(\d+)\s+(.*)$").expect("ticket pattern is valid"));

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Move a leading ticket number to the end: `"123 Fix bug"` becomes
/// `"Fix bug (#123)"`. Anything else is returned untouched.
pub fn displayed_summary(summary: &str) -> String {
    let Some(captures) = TICKET_PREFIX.captures(summary.trim()) else {
        return summary.to_string();
    };
    let rest = captures[2].trim();
    if rest.is_empty() {
        return summary.to_string();
    }
    format!("{} (#{})", rest, &captures[1])
}

/// Human friendly age of `when` relative to `now`.
///
/// Timestamps at the epoch are treated as unknown and render empty. Ages past
/// a week fall back to `date_format` in local time.
pub fn relative_time(when: DateTime<Utc>, now: DateTime<Utc>, date_format: &str) -> String {
    if when.timestamp() == 0 {
        return String::new();
    }

    let seconds = (now - when).num_seconds().max(0);
    match seconds {
        s if s < MINUTE => "Just now".to_string(),
        s if s < HOUR => format!("{} minutes ago", s / MINUTE),
        s if s < DAY => format!("{} hours ago", s / HOUR),
        s if s < 7 * DAY => format!("{} days ago", s / DAY),
        _ => absolute_date(when, date_format),
    }
}

/// `when` in local time, rendered with `date_format`, or with `%Y-%m-%d` if
/// the format contains an invalid specifier.
fn absolute_date(when: DateTime<Utc>, date_format: &str) -> String {
    let local = when.with_timezone(&Local);
    let mut rendered = String::new();
    if write!(rendered, "{}", local.format(date_format)).is_ok() {
        return rendered;
    }

    tracing::debug!("Invalid date format '{}', using {}", date_format, FALLBACK_DATE_FORMAT);
    local.format(FALLBACK_DATE_FORMAT).to_string()
}
