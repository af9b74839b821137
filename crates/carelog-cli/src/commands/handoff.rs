//! Shift-change handoff summary.

use std::io::Write;

use anyhow::{Context, Result};
use carelog_core::HandoffSummary;
use carelog_state::Coordinator;

use super::{child_name, resolve_child};
use crate::Config;

pub async fn run<W: Write>(
    writer: &mut W,
    coordinator: &Coordinator,
    config: &Config,
    child: Option<&str>,
) -> Result<()> {
    let child = resolve_child(coordinator, config, child).await?;
    let summary = coordinator
        .handoff_summary(&child)
        .await
        .context("failed to fetch handoff summary")?;
    render(writer, &child_name(coordinator, &child), &summary)
}

pub fn render<W: Write>(writer: &mut W, name: &str, summary: &HandoffSummary) -> Result<()> {
    writeln!(
        writer,
        "Handoff for {name} (alert level {})",
        summary.alert_level.as_str()
    )?;
    for line in &summary.summary {
        writeln!(writer, "- {line}")?;
    }
    if !summary.recommendations.is_empty() {
        writeln!(writer, "Recommendations:")?;
        for recommendation in &summary.recommendations {
            writeln!(writer, "- {recommendation}")?;
        }
    }
    Ok(())
}
