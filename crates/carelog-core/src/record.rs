//! Typed log records as delivered by the server.
//!
//! Each kind has its own struct with snake_case wire names. Collections are
//! decoded one record at a time so that a single malformed entry only costs
//! that entry, never the whole fetch.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::kind::Kind;
use crate::types::{ChildId, RecordId};

/// Why a single record was rejected.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The JSON did not match the kind's shape.
    #[error("{kind} record does not decode: {source}")]
    Decode {
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },

    /// A required text field was blank.
    #[error("{kind} record {id} has empty {field}")]
    EmptyField {
        kind: Kind,
        id: RecordId,
        field: &'static str,
    },

    #[error("sleep record {id} ends before it starts")]
    SleepEndsBeforeStart { id: RecordId },

    /// The record belongs to a different child than the one fetched for.
    #[error("{kind} record {id} belongs to child {found}, expected {expected}")]
    ChildMismatch {
        kind: Kind,
        id: RecordId,
        expected: ChildId,
        found: ChildId,
    },
}

/// ISO-8601 timestamp parsing that tolerates fractional seconds and a missing
/// offset (read as UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parses an ISO-8601 timestamp.
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|s| {
                    super::parse(&s)
                        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
                })
                .transpose()
        }
    }
}

fn default_analysis_status() -> String {
    "pending".to_string()
}

/// Accepts a coordinate sent either as a JSON string or a number.
fn coordinate<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected coordinate, got {other}"
        ))),
    }
}

/// Non-negative integers only; anything else is treated as absent.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn details_or_default<'de, D>(deserializer: D) -> Result<ActivityDetails, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ActivityDetails>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub id: RecordId,
    pub child_id: ChildId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub meal_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Server-side photo analysis state (e.g. "pending", "complete").
    #[serde(default = "default_analysis_status")]
    pub analysis_status: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepLog {
    pub id: RecordId,
    pub child_id: ChildId,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub start_time: DateTime<Utc>,
    /// Absent while the child is still asleep.
    #[serde(
        default,
        deserialize_with = "timestamp::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorLog {
    pub id: RecordId,
    pub child_id: ChildId,
    pub behavior_type: String,
    /// Mood on a 1-5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationLog {
    pub id: RecordId,
    pub child_id: ChildId,
    pub fluid_type: String,
    pub amount_ml: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCheck {
    pub id: RecordId,
    pub child_id: ChildId,
    #[serde(deserialize_with = "coordinate")]
    pub latitude: String,
    #[serde(deserialize_with = "coordinate")]
    pub longitude: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Free-form activity details with the fields the client understands typed.
///
/// Unknown keys are kept in `extra` and sent back untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    #[serde(
        default,
        deserialize_with = "lenient_minutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_minutes: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: RecordId,
    pub child_id: ChildId,
    pub activity_type: String,
    #[serde(default, deserialize_with = "details_or_default")]
    pub details: ActivityDetails,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// One record of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LogRecord {
    Meal(Meal),
    Sleep(SleepLog),
    Behavior(BehaviorLog),
    Hydration(HydrationLog),
    Location(LocationCheck),
    Activity(Activity),
}

impl LogRecord {
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Meal(_) => Kind::Meal,
            Self::Sleep(_) => Kind::Sleep,
            Self::Behavior(_) => Kind::Behavior,
            Self::Hydration(_) => Kind::Hydration,
            Self::Location(_) => Kind::Location,
            Self::Activity(_) => Kind::Activity,
        }
    }

    pub const fn id(&self) -> &RecordId {
        match self {
            Self::Meal(r) => &r.id,
            Self::Sleep(r) => &r.id,
            Self::Behavior(r) => &r.id,
            Self::Hydration(r) => &r.id,
            Self::Location(r) => &r.id,
            Self::Activity(r) => &r.id,
        }
    }

    pub const fn child_id(&self) -> &ChildId {
        match self {
            Self::Meal(r) => &r.child_id,
            Self::Sleep(r) => &r.child_id,
            Self::Behavior(r) => &r.child_id,
            Self::Hydration(r) => &r.child_id,
            Self::Location(r) => &r.child_id,
            Self::Activity(r) => &r.child_id,
        }
    }

    /// When the record was logged, as opposed to when it happened.
    pub const fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Meal(r) => r.created_at,
            Self::Sleep(r) => r.created_at,
            Self::Behavior(r) => r.created_at,
            Self::Hydration(r) => r.created_at,
            Self::Location(r) => r.created_at,
            Self::Activity(r) => r.created_at,
        }
    }

    /// Decodes and validates one record of the given kind.
    pub fn decode(kind: Kind, value: Value) -> Result<Self, RecordError> {
        match kind {
            Kind::Meal => decode_as::<Meal>(value),
            Kind::Sleep => decode_as::<SleepLog>(value),
            Kind::Behavior => decode_as::<BehaviorLog>(value),
            Kind::Hydration => decode_as::<HydrationLog>(value),
            Kind::Location => decode_as::<LocationCheck>(value),
            Kind::Activity => decode_as::<Activity>(value),
        }
    }
}

/// Per-kind decode hook.
trait KindRecord: DeserializeOwned {
    const KIND: Kind;

    fn validate(&self) -> Result<(), RecordError> {
        Ok(())
    }

    fn into_record(self) -> LogRecord;
}

fn require_text(
    kind: Kind,
    id: &RecordId,
    field: &'static str,
    value: &str,
) -> Result<(), RecordError> {
    if value.trim().is_empty() {
        return Err(RecordError::EmptyField {
            kind,
            id: id.clone(),
            field,
        });
    }
    Ok(())
}

impl KindRecord for Meal {
    const KIND: Kind = Kind::Meal;

    fn validate(&self) -> Result<(), RecordError> {
        require_text(Self::KIND, &self.id, "meal_type", &self.meal_type)
    }

    fn into_record(self) -> LogRecord {
        LogRecord::Meal(self)
    }
}

impl KindRecord for SleepLog {
    const KIND: Kind = Kind::Sleep;

    fn validate(&self) -> Result<(), RecordError> {
        match self.end_time {
            Some(end) if end < self.start_time => Err(RecordError::SleepEndsBeforeStart {
                id: self.id.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn into_record(self) -> LogRecord {
        LogRecord::Sleep(self)
    }
}

impl KindRecord for BehaviorLog {
    const KIND: Kind = Kind::Behavior;

    fn validate(&self) -> Result<(), RecordError> {
        require_text(Self::KIND, &self.id, "behavior_type", &self.behavior_type)
    }

    fn into_record(self) -> LogRecord {
        LogRecord::Behavior(self)
    }
}

impl KindRecord for HydrationLog {
    const KIND: Kind = Kind::Hydration;

    fn validate(&self) -> Result<(), RecordError> {
        require_text(Self::KIND, &self.id, "fluid_type", &self.fluid_type)
    }

    fn into_record(self) -> LogRecord {
        LogRecord::Hydration(self)
    }
}

impl KindRecord for LocationCheck {
    const KIND: Kind = Kind::Location;

    fn into_record(self) -> LogRecord {
        LogRecord::Location(self)
    }
}

impl KindRecord for Activity {
    const KIND: Kind = Kind::Activity;

    fn validate(&self) -> Result<(), RecordError> {
        require_text(Self::KIND, &self.id, "activity_type", &self.activity_type)
    }

    fn into_record(self) -> LogRecord {
        LogRecord::Activity(self)
    }
}

fn decode_as<R: KindRecord>(value: Value) -> Result<LogRecord, RecordError> {
    let record: R = serde_json::from_value(value).map_err(|source| RecordError::Decode {
        kind: R::KIND,
        source,
    })?;
    record.validate()?;
    Ok(record.into_record())
}

/// A record that was dropped while decoding a collection.
#[derive(Debug)]
pub struct Rejected {
    /// Position in the fetched array.
    pub index: usize,
    pub error: RecordError,
}

/// Result of decoding one fetched collection.
#[derive(Debug, Default)]
pub struct DecodedCollection {
    pub records: Vec<LogRecord>,
    pub rejected: Vec<Rejected>,
}

/// Decodes a fetched collection for `child`, skipping malformed records.
pub fn decode_collection(kind: Kind, child: &ChildId, raw: Vec<Value>) -> DecodedCollection {
    let mut decoded = DecodedCollection::default();
    for (index, value) in raw.into_iter().enumerate() {
        let result = LogRecord::decode(kind, value).and_then(|record| {
            if record.child_id() == child {
                Ok(record)
            } else {
                Err(RecordError::ChildMismatch {
                    kind,
                    id: record.id().clone(),
                    expected: child.clone(),
                    found: record.child_id().clone(),
                })
            }
        });
        match result {
            Ok(record) => decoded.records.push(record),
            Err(error) => {
                tracing::debug!(%kind, index, %error, "skipping malformed record");
                decoded.rejected.push(Rejected { index, error });
            }
        }
    }
    decoded
}

/// Fields for a record to be created. The child and caregiver are supplied
/// by the caller of the create operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NewRecord {
    Meal(NewMeal),
    Sleep(NewSleep),
    Behavior(NewBehavior),
    Hydration(NewHydration),
    Location(NewLocation),
    Activity(NewActivity),
}

impl NewRecord {
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Meal(_) => Kind::Meal,
            Self::Sleep(_) => Kind::Sleep,
            Self::Behavior(_) => Kind::Behavior,
            Self::Hydration(_) => Kind::Hydration,
            Self::Location(_) => Kind::Location,
            Self::Activity(_) => Kind::Activity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMeal {
    pub meal_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSleep {
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBehavior {
    pub behavior_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewHydration {
    pub fluid_type: String,
    pub amount_ml: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLocation {
    pub latitude: String,
    pub longitude: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewActivity {
    pub activity_type: String,
    pub details: ActivityDetails,
}

/// Closes or amends a sleep log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepUpdate {
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
