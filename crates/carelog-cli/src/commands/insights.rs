//! Weekly summary.

use std::io::Write;

use anyhow::{Context, Result};
use carelog_core::WeeklySummary;
use carelog_core::analytics::AbcStat;
use carelog_state::Coordinator;

use super::resolve_child;
use crate::Config;

pub async fn run<W: Write>(
    writer: &mut W,
    coordinator: &Coordinator,
    config: &Config,
    child: Option<&str>,
    json: bool,
) -> Result<()> {
    let child = resolve_child(coordinator, config, child).await?;
    let summary = coordinator
        .weekly_summary(&child)
        .await
        .context("failed to fetch weekly summary")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }
    render(writer, &summary)
}

pub fn render<W: Write>(writer: &mut W, summary: &WeeklySummary) -> Result<()> {
    writeln!(writer, "Week {} to {}", summary.week_start, summary.week_end)?;
    writeln!(
        writer,
        "Meals: {}  Sleep: {:.1}h (quality {:.1}/5)  Incidents: {}",
        summary.total_meals,
        summary.total_sleep_hours,
        summary.avg_sleep_quality,
        summary.total_incidents
    )?;

    let battery = &summary.regulation_battery;
    writeln!(
        writer,
        "\nRegulation battery: {}% ({})",
        battery.level, battery.status
    )?;
    for input in &battery.inputs {
        writeln!(writer, "  + {input}")?;
    }
    for drain in &battery.drains {
        writeln!(writer, "  - {drain}")?;
    }
    writeln!(writer, "  {}", battery.recommendation)?;

    if !summary.open_loops.is_empty() {
        writeln!(writer, "\nOpen loops:")?;
        for open in &summary.open_loops {
            writeln!(
                writer,
                "  {} ({}, open {}m, {} risk)",
                open.request_object, open.status, open.time_elapsed_minutes, open.risk_level
            )?;
        }
    }

    render_stats(writer, "Top triggers", &summary.abc_analysis.top_triggers)?;
    render_stats(
        writer,
        "Effective interventions",
        &summary.abc_analysis.effective_interventions,
    )?;

    if !summary.insights.is_empty() {
        writeln!(writer, "\nInsights:")?;
        for insight in &summary.insights {
            writeln!(
                writer,
                "  [{}] {} ({} confidence)",
                insight.kind, insight.title, insight.confidence
            )?;
            writeln!(writer, "    {}", insight.description)?;
            if let Some(tip) = &insight.actionable_tip {
                writeln!(writer, "    Tip: {tip}")?;
            }
        }
    }
    Ok(())
}

fn render_stats<W: Write>(writer: &mut W, heading: &str, stats: &[AbcStat]) -> Result<()> {
    if stats.is_empty() {
        return Ok(());
    }
    writeln!(writer, "\n{heading}:")?;
    for stat in stats {
        writeln!(
            writer,
            "  {}: {} ({:.0}%)",
            stat.label, stat.count, stat.percentage
        )?;
    }
    Ok(())
}
