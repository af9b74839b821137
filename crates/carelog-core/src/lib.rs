//! Core domain logic for carelog.
//!
//! This crate contains the fundamental types and logic for:
//! - Records: the six log kinds as delivered by the server
//! - Feed: projecting records into one ordered activity feed
//! - State: per-child collections with replace-on-refresh semantics
//! - Analytics: server-computed summaries, consumed read-only

pub mod analytics;
pub mod child;
pub mod feed;
pub mod kind;
pub mod record;
mod state;
mod types;

pub use analytics::{HandoffSummary, VoiceLogResponse, WeeklySummary};
pub use child::{Child, NewChild};
pub use feed::{FeedItem, FeedItemId, aggregate, project};
pub use kind::{Color, Kind, Visual};
pub use record::{
    DecodedCollection, LogRecord, NewRecord, RecordError, SleepUpdate, decode_collection,
};
pub use state::{Applied, ChildState};
pub use types::{ChildId, RecordId, UserId, ValidationError};
