//! The coordinator owns selection and per-child state and sequences
//! refreshes against the remote client.
//!
//! All mutation goes through one mutex that is only held for synchronous
//! apply-and-recompute steps, never across an `.await`. Fetches for
//! different kinds run concurrently and apply in whatever order they finish;
//! because each replaces only its own kind-collection, the settled feed does
//! not depend on that order.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use carelog_client::{ClientError, RemoteClient};
use carelog_core::{
    Applied, Child, ChildId, ChildState, FeedItem, HandoffSummary, Kind, LogRecord, NewChild,
    NewRecord, RecordId, SleepUpdate, ValidationError, VoiceLogResponse,
    WeeklySummary, decode_collection,
};
use chrono::Utc;
use futures::future::join_all;
use thiserror::Error;
use tokio::sync::watch;

/// A kind-refresh that could not fetch. The previous collection is kept.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("failed to fetch {kind} for child {child}: {source}")]
    Fetch {
        kind: Kind,
        child: ChildId,
        #[source]
        source: ClientError,
    },
}

/// Errors surfaced to the caller of a coordinator operation.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("child {0} is not in the children list")]
    UnknownChild(ChildId),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// What happened to a fetched collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    /// Replaced the kind-collection.
    Applied,
    /// A newer fetch for the same child and kind had already been applied.
    Superseded,
    /// Issued before a logout, or for a child removed since; dropped.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub kind: Kind,
    pub child: ChildId,
    pub status: RefreshStatus,
    /// Records that decoded and validated.
    pub records: usize,
    /// Records skipped as malformed.
    pub skipped: usize,
}

/// Per-kind results of [`Coordinator::refresh_all`], in [`Kind::ALL`] order.
#[derive(Debug)]
pub struct RefreshReport {
    pub results: Vec<(Kind, Result<RefreshOutcome, RefreshError>)>,
}

impl RefreshReport {
    pub fn failures(&self) -> impl Iterator<Item = &RefreshError> {
        self.results.iter().filter_map(|(_, result)| result.as_ref().err())
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// The feed currently on display.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    /// Child the feed belongs to; `None` when nothing is selected.
    pub child: Option<ChildId>,
    pub items: Arc<[FeedItem]>,
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self {
            child: None,
            items: Arc::from(Vec::new()),
        }
    }
}

/// Which child is selected, out of which known children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<ChildId>,
    pub children: Vec<Child>,
}

#[derive(Debug, Default)]
struct Store {
    selection: SelectionState,
    states: HashMap<ChildId, ChildState>,
    /// Children deleted this session; late results for them are dropped.
    removed: HashSet<ChildId>,
    /// Bumped on logout so results of earlier fetches are dropped.
    epoch: u64,
}

/// Owns [`SelectionState`] and one [`ChildState`] per child.
///
/// Construct one per session and hand it to the presentation layer, which
/// reads feeds through [`Coordinator::subscribe`] or [`Coordinator::feed`].
pub struct Coordinator {
    client: Arc<dyn RemoteClient>,
    store: Mutex<Store>,
    tickets: AtomicU64,
    feed_tx: watch::Sender<FeedSnapshot>,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("selection", &self.lock().selection)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        let (feed_tx, _feed_rx) = watch::channel(FeedSnapshot::default());
        Self {
            client,
            store: Mutex::new(Store::default()),
            tickets: AtomicU64::new(0),
            feed_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // Nothing panics while holding the lock; recover the data regardless.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, child: Option<ChildId>, items: Arc<[FeedItem]>) {
        self.feed_tx.send_replace(FeedSnapshot { child, items });
    }

    // ========== Reading ==========

    /// Receives every feed published for the selected child.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.feed_tx.subscribe()
    }

    /// The feed currently on display.
    pub fn feed(&self) -> FeedSnapshot {
        self.feed_tx.borrow().clone()
    }

    pub fn selection(&self) -> SelectionState {
        self.lock().selection.clone()
    }

    pub fn children(&self) -> Vec<Child> {
        self.lock().selection.children.clone()
    }

    pub fn selected_child(&self) -> Option<ChildId> {
        self.lock().selection.selected.clone()
    }

    /// Feed held for any child, selected or not.
    pub fn child_feed(&self, child: &ChildId) -> Arc<[FeedItem]> {
        self.lock()
            .states
            .get(child)
            .map_or_else(|| Arc::from(Vec::new()), ChildState::feed)
    }

    pub fn collection(&self, child: &ChildId, kind: Kind) -> Vec<LogRecord> {
        self.lock()
            .states
            .get(child)
            .map(|state| state.collection(kind).to_vec())
            .unwrap_or_default()
    }

    /// Runs `f` against a child's state, if it has been loaded.
    pub fn with_child_state<R>(&self, child: &ChildId, f: impl FnOnce(&ChildState) -> R) -> Option<R> {
        self.lock().states.get(child).map(f)
    }

    // ========== Selection ==========

    /// Selects `child` and shows whatever feed is already held for it.
    ///
    /// Does not fetch. Once the children list is loaded, only listed
    /// children can be selected.
    pub fn select_child(&self, child: &ChildId) -> Result<(), CoordinatorError> {
        let mut guard = self.lock();
        let store = &mut *guard;
        let children = &store.selection.children;
        if !children.is_empty() && !children.iter().any(|known| &known.id == child) {
            return Err(CoordinatorError::UnknownChild(child.clone()));
        }
        store.selection.selected = Some(child.clone());
        let items = store
            .states
            .get(child)
            .map_or_else(|| Arc::from(Vec::new()), ChildState::feed);
        self.publish(Some(child.clone()), items);
        tracing::debug!(%child, "selected child");
        Ok(())
    }

    /// Forgets everything: selection, children, and all per-child state.
    /// Fetches still in flight are dropped when they land.
    pub fn logout(&self) {
        let mut store = self.lock();
        store.epoch += 1;
        store.selection = SelectionState::default();
        store.states.clear();
        store.removed.clear();
        self.publish(None, Arc::from(Vec::new()));
        tracing::debug!("logged out");
    }

    /// Fetches the children list. Selects the first child if none is
    /// selected yet.
    pub async fn refresh_children(&self) -> Result<Vec<Child>, CoordinatorError> {
        let epoch = self.lock().epoch;
        let children = self.client.fetch_children().await?;

        let mut guard = self.lock();
        let store = &mut *guard;
        if store.epoch != epoch {
            return Ok(children);
        }
        store.selection.children.clone_from(&children);
        store
            .removed
            .retain(|removed| !children.iter().any(|known| &known.id == removed));
        if store.selection.selected.is_none() {
            if let Some(first) = children.first() {
                store.selection.selected = Some(first.id.clone());
                let items = store
                    .states
                    .get(&first.id)
                    .map_or_else(|| Arc::from(Vec::new()), ChildState::feed);
                self.publish(Some(first.id.clone()), items);
                tracing::debug!(child = %first.id, "auto-selected first child");
            }
        }
        Ok(children)
    }

    pub async fn add_child(
        &self,
        name: &str,
        birthdate: Option<String>,
    ) -> Result<Child, CoordinatorError> {
        let new_child = NewChild {
            id: ChildId::new(uuid::Uuid::new_v4().to_string())?,
            name: name.to_string(),
            birthdate,
        };
        let created = self.client.create_child(&new_child).await?;
        if let Err(error) = self.refresh_children().await {
            tracing::warn!(%error, "child created but children list refresh failed");
        }
        Ok(created)
    }

    /// Deletes a child and drops its local state.
    pub async fn remove_child(&self, child: &ChildId) -> Result<(), CoordinatorError> {
        self.client.delete_child(child).await?;
        {
            let mut store = self.lock();
            store.states.remove(child);
            store.removed.insert(child.clone());
            store.selection.children.retain(|known| &known.id != child);
            if store.selection.selected.as_ref() == Some(child) {
                store.selection.selected = None;
                self.publish(None, Arc::from(Vec::new()));
            }
        }
        if let Err(error) = self.refresh_children().await {
            tracing::warn!(%error, "child removed but children list refresh failed");
        }
        Ok(())
    }

    // ========== Refreshing ==========

    /// Fetches `child`'s full `kind` collection and replaces the held one.
    ///
    /// Malformed records are skipped. On failure the held collection is left
    /// as it was.
    pub async fn refresh_kind(
        &self,
        kind: Kind,
        child: &ChildId,
    ) -> Result<RefreshOutcome, RefreshError> {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed) + 1;
        let epoch = self.lock().epoch;

        let raw = match self.client.fetch_collection(kind, child).await {
            Ok(raw) => raw,
            Err(source) => {
                tracing::warn!(%kind, %child, error = %source, "refresh failed, keeping previous collection");
                return Err(RefreshError::Fetch {
                    kind,
                    child: child.clone(),
                    source,
                });
            }
        };

        let decoded = decode_collection(kind, child, raw);
        let records = decoded.records.len();
        let skipped = decoded.rejected.len();
        if skipped > 0 {
            tracing::warn!(%kind, %child, skipped, "skipped malformed records");
        }

        let status = {
            let mut guard = self.lock();
            let store = &mut *guard;
            if store.epoch == epoch && !store.removed.contains(child) {
                let state = store
                    .states
                    .entry(child.clone())
                    .or_insert_with(|| ChildState::new(child.clone()));
                match state.replace(kind, decoded.records, ticket, Utc::now()) {
                    Applied::Replaced => {
                        if store.selection.selected.as_ref() == Some(child) {
                            self.publish(Some(child.clone()), state.feed());
                        }
                        RefreshStatus::Applied
                    }
                    Applied::Superseded => RefreshStatus::Superseded,
                }
            } else {
                RefreshStatus::Discarded
            }
        };

        tracing::debug!(%kind, %child, ?status, records, skipped, "refresh settled");
        Ok(RefreshOutcome {
            kind,
            child: child.clone(),
            status,
            records,
            skipped,
        })
    }

    /// Refreshes all six kinds concurrently.
    pub async fn refresh_all(&self, child: &ChildId) -> RefreshReport {
        let results = join_all(Kind::ALL.map(|kind| self.refresh_kind(kind, child))).await;
        RefreshReport {
            results: Kind::ALL.into_iter().zip(results).collect(),
        }
    }

    // ========== Writing ==========

    /// Creates a record, then refreshes its kind.
    ///
    /// Nothing is stored locally unless the follow-up refresh brings the
    /// record back from the server. The write has succeeded once this
    /// returns `Ok`; the echoed record is `None` when the server's reply
    /// could not be read.
    pub async fn log_record(
        &self,
        child: &ChildId,
        record: &NewRecord,
    ) -> Result<Option<LogRecord>, CoordinatorError> {
        let kind = record.kind();
        let created = self.client.create_record(child, record).await?;
        if self.refresh_kind(kind, child).await.is_err() {
            tracing::debug!(%kind, %child, "record created but not yet visible");
        }
        Ok(read_echo(kind, created))
    }

    /// Closes or amends a sleep log, then refreshes sleep.
    pub async fn end_sleep(
        &self,
        child: &ChildId,
        sleep: &RecordId,
        update: &SleepUpdate,
    ) -> Result<Option<LogRecord>, CoordinatorError> {
        let updated = self.client.update_sleep(sleep, update).await?;
        if self.refresh_kind(Kind::Sleep, child).await.is_err() {
            tracing::debug!(%child, %sleep, "sleep updated but not yet visible");
        }
        Ok(read_echo(Kind::Sleep, updated))
    }

    /// Sends free text for AI extraction, then refreshes every kind since
    /// any of them may have gained records.
    pub async fn process_voice_log(
        &self,
        child: &ChildId,
        text: &str,
    ) -> Result<(VoiceLogResponse, RefreshReport), CoordinatorError> {
        let response = self.client.process_voice_log(child, text).await?;
        let report = self.refresh_all(child).await;
        Ok((response, report))
    }

    // ========== Analytics ==========

    pub async fn weekly_summary(&self, child: &ChildId) -> Result<WeeklySummary, CoordinatorError> {
        Ok(self.client.weekly_summary(child).await?)
    }

    pub async fn handoff_summary(
        &self,
        child: &ChildId,
    ) -> Result<HandoffSummary, CoordinatorError> {
        Ok(self.client.handoff_summary(child).await?)
    }
}

/// Decodes the record a server echoes back after a write.
fn read_echo(kind: Kind, raw: serde_json::Value) -> Option<LogRecord> {
    LogRecord::decode(kind, raw)
        .inspect_err(|error| {
            tracing::warn!(%kind, %error, "write succeeded but its reply was unreadable");
        })
        .ok()
}
