//! CLI subcommand implementations.

pub mod children;
pub mod feed;
pub mod handoff;
pub mod insights;
pub mod log;
pub mod sleep_end;
pub mod util;
pub mod voice;

use anyhow::{Context, Result};
use carelog_core::ChildId;
use carelog_state::Coordinator;

use crate::Config;

/// Picks the child a command acts on: `--child`, then `default_child`, then
/// the first child the server lists.
pub async fn resolve_child(
    coordinator: &Coordinator,
    config: &Config,
    explicit: Option<&str>,
) -> Result<ChildId> {
    coordinator
        .refresh_children()
        .await
        .context("failed to fetch children")?;

    if let Some(id) = explicit.or(config.default_child.as_deref()) {
        let child = ChildId::new(id).context("invalid child id")?;
        coordinator.select_child(&child)?;
        return Ok(child);
    }

    coordinator
        .selected_child()
        .context("no children registered yet; add one with `carelog children add NAME`")
}

/// Display name for a child, falling back to its id.
pub fn child_name(coordinator: &Coordinator, child: &ChildId) -> String {
    coordinator
        .children()
        .into_iter()
        .find(|known| &known.id == child)
        .map_or_else(|| child.to_string(), |known| known.name)
}
