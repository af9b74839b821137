//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use carelog_core::record::timestamp;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~100 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 100 * 365 * 24 * 60;

/// Parse a datetime string as `now`, ISO 8601, or relative time.
///
/// Supports:
/// - "now"
/// - ISO 8601: "2026-01-15T10:30:00Z", or without offset (read as UTC)
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }
    if let Some(dt) = timestamp::parse(s) {
        return Ok(dt);
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Short age of `then` as seen from `now`: "just now", "5m ago", "3h ago",
/// "2d ago", or the calendar date once it is a week old.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    if elapsed < Duration::zero() {
        return then.format("%b %-d %H:%M").to_string();
    }
    match elapsed {
        e if e < Duration::minutes(1) => "just now".to_string(),
        e if e < Duration::hours(1) => format!("{}m ago", e.num_minutes()),
        e if e < Duration::days(1) => format!("{}h ago", e.num_hours()),
        e if e < Duration::days(7) => format!("{}d ago", e.num_days()),
        _ => then.format("%b %-d").to_string(),
    }
}
