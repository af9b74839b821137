//! Children known to the caregiver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::timestamp;
use crate::types::ChildId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub id: ChildId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(
        default,
        deserialize_with = "timestamp::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// A child to be registered. The client assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewChild {
    pub id: ChildId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
}
