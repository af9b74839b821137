//! Free-text logging through the server's extraction endpoint.

use std::io::Write;

use anyhow::{Context, Result, ensure};
use carelog_core::VoiceLogResponse;
use carelog_state::Coordinator;

use super::feed::render_report;
use super::resolve_child;
use crate::Config;

pub async fn run<W: Write>(
    writer: &mut W,
    coordinator: &Coordinator,
    config: &Config,
    text: &str,
    child: Option<&str>,
) -> Result<()> {
    let text = text.trim();
    ensure!(!text.is_empty(), "nothing to log");
    let child = resolve_child(coordinator, config, child).await?;
    let (response, report) = coordinator
        .process_voice_log(&child, text)
        .await
        .context("failed to process voice log")?;

    render(writer, &response)?;
    render_report(writer, &report)
}

pub fn render<W: Write>(writer: &mut W, response: &VoiceLogResponse) -> Result<()> {
    writeln!(writer, "{}", response.message)?;
    if !response.processed_types.is_empty() {
        writeln!(writer, "Recorded: {}", response.processed_types.join(", "))?;
    }
    Ok(())
}
