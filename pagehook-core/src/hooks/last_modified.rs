//! Last-modified stamp derived from commit history.

use chrono::{DateTime, Utc};
use pagehook_types::{CommitRecord, LastModified};

use crate::config::DateDisplay;

/// RFC 2822 layout with a zero-padded day
const ABSOLUTE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Read the author date of the first (newest) record.
///
/// `display` is "Unknown" when there is no date, the raw value when it
/// cannot be parsed, and otherwise formatted per `display`.
pub fn extract_last_modified(
    records: &[CommitRecord],
    display: DateDisplay,
    now: DateTime<Utc>,
) -> LastModified {
    let Some(raw) = records.first().and_then(CommitRecord::author_date) else {
        return LastModified::unknown();
    };

    let display = match parse_commit_date(raw) {
        Some(date) => match display {
            DateDisplay::Absolute => date.format(ABSOLUTE_FORMAT).to_string(),
            DateDisplay::Relative => format_relative(date, now),
        },
        None => {
            tracing::warn!("Unparseable commit date: {}", raw);
            raw.to_string()
        }
    };

    LastModified {
        raw: Some(raw.to_string()),
        display,
    }
}

/// Parse an ISO 8601 / RFC 3339 or RFC 2822 date
pub fn parse_commit_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Human relative time ("3 days ago", "in 2 hours")
pub fn format_relative(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(date).num_seconds();
    let phrase = relative_phrase(delta.unsigned_abs());
    if delta < 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn rounded(value: u64, unit: u64) -> u64 {
    (value + unit / 2) / unit
}

fn relative_phrase(seconds: u64) -> String {
    if seconds < 45 {
        return "a few seconds".to_string();
    }
    if seconds < 90 {
        return "a minute".to_string();
    }

    let minutes = rounded(seconds, 60);
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if minutes < 90 {
        return "an hour".to_string();
    }

    let hours = rounded(minutes, 60);
    if hours < 22 {
        return format!("{hours} hours");
    }
    if hours < 36 {
        return "a day".to_string();
    }

    let days = rounded(hours, 24);
    if days < 26 {
        return format!("{days} days");
    }
    if days < 45 {
        return "a month".to_string();
    }
    if days < 320 {
        // 30.4 days per month
        let months = rounded(days * 10, 304).max(2);
        return format!("{months} months");
    }
    if days < 548 {
        return "a year".to_string();
    }

    let years = rounded(days * 100, 36525).max(2);
    format!("{years} years")
}
