//! Refresh all kinds and print the combined feed.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use carelog_core::{ChildId, FeedItem, Kind, Visual};
use carelog_state::{Coordinator, RefreshReport};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::util::relative_time;
use super::{child_name, resolve_child};
use crate::Config;

/// What the selected child has going on today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Today {
    pub hydration_ml: u64,
    pub sleeping_since: Option<DateTime<Utc>>,
}

pub async fn run<W: Write>(
    writer: &mut W,
    coordinator: &Coordinator,
    config: &Config,
    child: Option<&str>,
    json: bool,
) -> Result<()> {
    let child = resolve_child(coordinator, config, child).await?;
    let report = coordinator.refresh_all(&child).await;
    let snapshot = coordinator.feed();

    if json {
        let refreshed_at = coordinator
            .with_child_state(&child, |state| {
                Kind::ALL
                    .into_iter()
                    .filter_map(|kind| state.refreshed_at(kind).map(|at| (kind, at)))
                    .collect()
            })
            .unwrap_or_default();
        return render_json(writer, &child, &snapshot.items, refreshed_at);
    }

    let date = Local::now().date_naive();
    let today = coordinator
        .with_child_state(&child, |state| Today {
            hydration_ml: state.hydration_total_on(date, &Local),
            sleeping_since: state.active_sleep().map(|sleep| sleep.start_time),
        })
        .unwrap_or(Today {
            hydration_ml: 0,
            sleeping_since: None,
        });

    let now = Utc::now();
    render(writer, &child_name(coordinator, &child), &snapshot.items, now)?;
    render_today(writer, today, now)?;
    render_report(writer, &report)
}

/// A feed item as printed by `feed --json`, with its kind's icon and color.
#[derive(Debug, Serialize)]
struct FeedEntry<'a> {
    #[serde(flatten)]
    item: &'a FeedItem,
    #[serde(flatten)]
    visual: Visual,
}

#[derive(Debug, Serialize)]
struct FeedJson<'a> {
    child: &'a ChildId,
    items: Vec<FeedEntry<'a>>,
    /// Kinds that loaded, and when.
    refreshed_at: BTreeMap<Kind, DateTime<Utc>>,
}

pub fn render_json<W: Write>(
    writer: &mut W,
    child: &ChildId,
    items: &[FeedItem],
    refreshed_at: BTreeMap<Kind, DateTime<Utc>>,
) -> Result<()> {
    let feed = FeedJson {
        child,
        items: items
            .iter()
            .map(|item| FeedEntry {
                item,
                visual: item.visual(),
            })
            .collect(),
        refreshed_at,
    };
    writeln!(writer, "{}", serde_json::to_string_pretty(&feed)?)?;
    Ok(())
}

/// Prints the feed newest first, one line per item.
pub fn render<W: Write>(
    writer: &mut W,
    name: &str,
    items: &[FeedItem],
    now: DateTime<Utc>,
) -> Result<()> {
    if items.is_empty() {
        writeln!(writer, "{name}: nothing logged yet")?;
        return Ok(());
    }

    writeln!(writer, "{name} ({} items)", items.len())?;
    for item in items {
        writeln!(
            writer,
            "{:>8}  {:<9}  {} - {}",
            relative_time(item.timestamp, now),
            item.kind.as_str(),
            item.title,
            item.subtitle
        )?;
    }
    Ok(())
}

pub fn render_today<W: Write>(writer: &mut W, today: Today, now: DateTime<Utc>) -> Result<()> {
    write!(writer, "Today: {}ml fluids", today.hydration_ml)?;
    if let Some(since) = today.sleeping_since {
        write!(writer, ", asleep since {}", relative_time(since, now))?;
    }
    writeln!(writer)?;
    Ok(())
}

/// One summary line of per-kind results, then one line per failed kind.
pub fn render_report<W: Write>(writer: &mut W, report: &RefreshReport) -> Result<()> {
    let parts: Vec<String> = report
        .results
        .iter()
        .map(|(kind, result)| match result {
            Ok(outcome) if outcome.skipped > 0 => format!(
                "{} {} ({} skipped)",
                kind.as_str(),
                outcome.records,
                outcome.skipped
            ),
            Ok(outcome) => format!("{} {}", kind.as_str(), outcome.records),
            Err(_) => format!("{} failed", kind.as_str()),
        })
        .collect();
    writeln!(writer, "Refreshed: {}", parts.join(", "))?;

    for error in report.failures() {
        writeln!(writer, "warning: {error}")?;
    }
    Ok(())
}
