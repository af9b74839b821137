//! Per-child in-memory state.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::feed::{self, FeedItem};
use crate::kind::Kind;
use crate::record::{LogRecord, SleepLog};
use crate::types::ChildId;

/// Bookkeeping for one kind-collection.
#[derive(Debug, Clone, Default)]
struct Slot {
    records: Vec<LogRecord>,
    refreshed_at: Option<DateTime<Utc>>,
    /// Ticket of the fetch whose result is currently held.
    applied_ticket: u64,
}

/// Outcome of offering a fetched collection to [`ChildState::replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The collection was replaced and the feed recomputed.
    Replaced,
    /// A newer fetch for this kind was already applied; nothing changed.
    Superseded,
}

/// The six kind-collections of one child plus the feed derived from them.
///
/// Collections are replaced wholesale, never patched. Kinds can be at
/// different refresh ages; a kind never fetched is simply empty.
#[derive(Debug, Clone)]
pub struct ChildState {
    child: ChildId,
    slots: BTreeMap<Kind, Slot>,
    feed: Arc<[FeedItem]>,
}

impl ChildState {
    pub fn new(child: ChildId) -> Self {
        Self {
            child,
            slots: BTreeMap::new(),
            feed: Arc::from(Vec::new()),
        }
    }

    pub const fn child(&self) -> &ChildId {
        &self.child
    }

    /// Replaces `kind`'s collection with the result of fetch `ticket`.
    ///
    /// Tickets grow monotonically in issue order, so a result older than the
    /// one already held is discarded.
    pub fn replace(
        &mut self,
        kind: Kind,
        records: Vec<LogRecord>,
        ticket: u64,
        fetched_at: DateTime<Utc>,
    ) -> Applied {
        let slot = self.slots.entry(kind).or_default();
        if ticket <= slot.applied_ticket {
            return Applied::Superseded;
        }
        slot.records = records;
        slot.refreshed_at = Some(fetched_at);
        slot.applied_ticket = ticket;
        self.feed = self.recompute_feed().into();
        Applied::Replaced
    }

    /// Builds the feed from all current collections.
    pub fn recompute_feed(&self) -> Vec<FeedItem> {
        feed::aggregate(self.slots.values().flat_map(|slot| slot.records.iter()))
    }

    /// The last computed feed. Cheap to clone.
    pub fn feed(&self) -> Arc<[FeedItem]> {
        Arc::clone(&self.feed)
    }

    pub fn collection(&self, kind: Kind) -> &[LogRecord] {
        self.slots
            .get(&kind)
            .map(|slot| slot.records.as_slice())
            .unwrap_or_default()
    }

    /// When `kind` was last replaced, if ever.
    pub fn refreshed_at(&self, kind: Kind) -> Option<DateTime<Utc>> {
        self.slots.get(&kind).and_then(|slot| slot.refreshed_at)
    }

    /// The sleep log still in progress, if any.
    pub fn active_sleep(&self) -> Option<&SleepLog> {
        self.collection(Kind::Sleep).iter().find_map(|record| match record {
            LogRecord::Sleep(sleep) if sleep.end_time.is_none() => Some(sleep),
            _ => None,
        })
    }

    /// Total fluid logged on `date` in timezone `tz`, in millilitres.
    pub fn hydration_total_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> u64 {
        self.collection(Kind::Hydration)
            .iter()
            .filter_map(|record| match record {
                LogRecord::Hydration(log)
                    if log.created_at.with_timezone(tz).date_naive() == date =>
                {
                    Some(u64::from(log.amount_ml))
                }
                _ => None,
            })
            .sum()
    }
}
