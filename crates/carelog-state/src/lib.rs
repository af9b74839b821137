//! Selection and refresh coordination.
//!
//! The [`Coordinator`] is the single owner of which child is selected and of
//! every child's kind-collections. It issues fetches through a
//! [`carelog_client::RemoteClient`], applies the results, and publishes the
//! recomputed feed for the selected child.

mod coordinator;

pub use coordinator::{
    Coordinator, CoordinatorError, FeedSnapshot, RefreshError, RefreshOutcome, RefreshReport,
    RefreshStatus, SelectionState,
};
