//! Unified activity feed.
//!
//! Every record projects to exactly one [`FeedItem`]; the feed is the
//! concatenation of all projections sorted newest first. Projection is pure,
//! so recomputing from the same collections always yields the same feed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::kind::{Kind, Visual};
use crate::record::LogRecord;
use crate::types::RecordId;

/// Globally unique feed identifier, derived from kind and per-kind id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeedItemId {
    pub kind: Kind,
    pub record_id: RecordId,
}

impl fmt::Display for FeedItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.record_id)
    }
}

impl Serialize for FeedItemId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A display-ready projection of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub id: FeedItemId,
    pub kind: Kind,
    pub title: String,
    pub subtitle: String,
    /// When the logged thing happened (sleep start for sleep logs).
    pub timestamp: DateTime<Utc>,
}

impl FeedItem {
    pub const fn visual(&self) -> Visual {
        self.kind.visual()
    }
}

/// Projects a single record.
pub fn project(record: &LogRecord) -> FeedItem {
    let (title, subtitle, timestamp) = match record {
        LogRecord::Meal(meal) => (
            meal.meal_type.clone(),
            meal.notes
                .clone()
                .unwrap_or_else(|| "Meal logged".to_string()),
            meal.created_at,
        ),
        LogRecord::Sleep(sleep) => {
            let subtitle = if sleep.end_time.is_none() {
                "Started sleeping".to_string()
            } else {
                format!("Slept for {}m", sleep.duration_minutes.unwrap_or(0))
            };
            ("Sleep Log".to_string(), subtitle, sleep.start_time)
        }
        LogRecord::Behavior(behavior) => (
            capitalize_words(&behavior.behavior_type),
            behavior.incident_description.clone().unwrap_or_else(|| {
                format!("Mood: {}/5", behavior.mood_rating.unwrap_or(0))
            }),
            behavior.created_at,
        ),
        LogRecord::Hydration(hydration) => (
            "Hydration".to_string(),
            format!("{}ml of {}", hydration.amount_ml, hydration.fluid_type),
            hydration.created_at,
        ),
        LogRecord::Location(check) => (
            "Location Check".to_string(),
            check
                .location_name
                .clone()
                .unwrap_or_else(|| "Check-in recorded".to_string()),
            check.created_at,
        ),
        LogRecord::Activity(activity) => (
            activity.activity_type.clone(),
            format!("{} mins", activity.details.duration_minutes.unwrap_or(0)),
            activity.created_at,
        ),
    };

    FeedItem {
        id: FeedItemId {
            kind: record.kind(),
            record_id: record.id().clone(),
        },
        kind: record.kind(),
        title,
        subtitle,
        timestamp,
    }
}

/// Builds the feed from any number of records, newest first.
///
/// Ties on timestamp are broken by `(kind, record id)` ascending so the
/// output is reproducible.
pub fn aggregate<'a, I>(records: I) -> Vec<FeedItem>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut items: Vec<FeedItem> = records.into_iter().map(project).collect();
    items.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
    items
}

/// Upper-cases the first letter of each word and lower-cases the rest.
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
