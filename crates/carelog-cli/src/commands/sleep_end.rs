//! Close a sleep log.

use std::io::Write;

use anyhow::{Context, Result};
use carelog_core::{Kind, LogRecord, RecordId, SleepUpdate};
use carelog_state::Coordinator;
use chrono::Utc;
use clap::Args;

use super::resolve_child;
use super::util::parse_datetime;
use crate::Config;

#[derive(Debug, Args)]
pub struct SleepEndArgs {
    /// Sleep log ID. Defaults to the sleep log still in progress.
    pub id: Option<String>,

    /// When sleep ended (ISO 8601, "now", or e.g. "10 minutes ago").
    #[arg(long, default_value = "now")]
    pub at: String,

    /// Quality from 1 to 5.
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=5))]
    pub rating: Option<i32>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Child ID (defaults to `default_child`, then the first child).
    #[arg(long)]
    pub child: Option<String>,
}

pub async fn run<W: Write>(
    writer: &mut W,
    coordinator: &Coordinator,
    config: &Config,
    args: &SleepEndArgs,
) -> Result<()> {
    let update = SleepUpdate {
        end_time: parse_datetime(&args.at, Utc::now()).context("invalid --at")?,
        quality_rating: args.rating,
        notes: args.notes.clone(),
    };
    let child = resolve_child(coordinator, config, args.child.as_deref()).await?;

    let sleep_id = if let Some(id) = &args.id {
        RecordId::from(id.as_str())
    } else {
        coordinator
            .refresh_kind(Kind::Sleep, &child)
            .await
            .context("failed to fetch sleep logs")?;
        coordinator
            .with_child_state(&child, |state| state.active_sleep().map(|sleep| sleep.id.clone()))
            .flatten()
            .context("no sleep in progress; pass the sleep log ID")?
    };

    let updated = coordinator
        .end_sleep(&child, &sleep_id, &update)
        .await
        .with_context(|| format!("failed to end sleep {sleep_id}"))?;
    match updated {
        Some(updated) => render(writer, &updated),
        None => {
            writeln!(writer, "Sleep #{sleep_id} ended")?;
            Ok(())
        }
    }
}

pub fn render<W: Write>(writer: &mut W, record: &LogRecord) -> Result<()> {
    let LogRecord::Sleep(sleep) = record else {
        anyhow::bail!("server answered with a {} record", record.kind());
    };
    write!(writer, "Sleep #{} ended", sleep.id)?;
    if let Some(minutes) = sleep.duration_minutes {
        write!(writer, " after {}h {:02}m", minutes / 60, minutes % 60)?;
    }
    if let Some(rating) = sleep.quality_rating {
        write!(writer, ", quality {rating}/5")?;
    }
    writeln!(writer)?;
    Ok(())
}
