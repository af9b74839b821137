//! List, add and remove children.

use std::io::Write;

use anyhow::{Context, Result};
use carelog_core::{Child, ChildId};
use carelog_state::Coordinator;
use chrono::NaiveDate;

pub async fn list<W: Write>(writer: &mut W, coordinator: &Coordinator, json: bool) -> Result<()> {
    let children = coordinator
        .refresh_children()
        .await
        .context("failed to fetch children")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&children)?)?;
        return Ok(());
    }
    render(writer, &children, coordinator.selected_child().as_ref())
}

pub async fn add<W: Write>(
    writer: &mut W,
    coordinator: &Coordinator,
    name: &str,
    birthdate: Option<&str>,
) -> Result<()> {
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "child name must not be empty");
    if let Some(date) = birthdate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("invalid birthdate {date}, expected YYYY-MM-DD"))?;
    }

    let child = coordinator
        .add_child(name, birthdate.map(str::to_string))
        .await
        .context("failed to add child")?;
    writeln!(writer, "Added {} [{}]", child.name, child.id)?;
    Ok(())
}

pub async fn remove<W: Write>(writer: &mut W, coordinator: &Coordinator, id: &str) -> Result<()> {
    let child = ChildId::new(id).context("invalid child id")?;
    coordinator
        .remove_child(&child)
        .await
        .with_context(|| format!("failed to remove child {child}"))?;
    writeln!(writer, "Removed child {child}")?;
    Ok(())
}

/// One line per child; the selected one is starred.
pub fn render<W: Write>(writer: &mut W, children: &[Child], selected: Option<&ChildId>) -> Result<()> {
    if children.is_empty() {
        writeln!(writer, "No children yet. Add one with `carelog children add NAME`.")?;
        return Ok(());
    }

    for child in children {
        let marker = if selected == Some(&child.id) { '*' } else { ' ' };
        write!(writer, "{marker} {} [{}]", child.name, child.id)?;
        if let Some(birthdate) = &child.birthdate {
            write!(writer, " born {birthdate}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
