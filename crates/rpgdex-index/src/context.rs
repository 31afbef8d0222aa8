//! Markdown database context report.

use std::fmt::{self, Write};

use serde_json::Value;

use crate::{CollectionKind, EntityIndex, Record};

const DESCRIPTION_CHARS: usize = 50;

/// Render a markdown overview of the index: counts per type, then tables
/// for actors, enemies, skills, items, and troops.
pub fn render_database_context(index: &EntityIndex) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_database_context(&mut out, index)?;
    Ok(out)
}

/// Write the overview rendered by [`render_database_context`] to `out`.
pub fn write_database_context<W: Write>(out: &mut W, index: &EntityIndex) -> fmt::Result {
    let stats = index.stats();

    out.write_str("# Database Context Report\n\n")?;
    out.write_str("## Statistics\n\n")?;
    out.write_str("| Type | Count |\n|------|-------|\n")?;
    for (kind, count) in &stats.counts {
        writeln!(out, "| {} | {} |", kind.label(), count)?;
    }
    writeln!(out, "| **Total** | {} |\n", stats.total)?;

    section(out, index, CollectionKind::Actor, &["ID", "Name", "Class", "Level"], |r| {
        vec![cell(r.get("classId")), cell(r.get("initialLevel"))]
    })?;

    section(out, index, CollectionKind::Enemy, &["ID", "Name", "HP", "EXP", "Gold"], |r| {
        let hp = r.get_array("params").and_then(|p| p.first()).cloned().unwrap_or(Value::from(0));
        vec![cell(Some(&hp)), cell(r.get("exp")), cell(r.get("gold"))]
    })?;

    section(out, index, CollectionKind::Skill, &["ID", "Name", "MP Cost", "Type"], |r| {
        vec![
            r.get_i64("mpCost").unwrap_or(0).to_string(),
            r.get_i64("stypeId").unwrap_or(0).to_string(),
        ]
    })?;

    section(out, index, CollectionKind::Item, &["ID", "Name", "Type", "Description"], |r| {
        let description: String = r
            .get_str("description")
            .unwrap_or("")
            .chars()
            .take(DESCRIPTION_CHARS)
            .collect();
        vec![r.get_i64("itypeId").unwrap_or(0).to_string(), escape(&description)]
    })?;

    section(out, index, CollectionKind::Troop, &["ID", "Name", "Members"], |r| {
        vec![r.get_array("members").map_or(0, <[Value]>::len).to_string()]
    })
}

fn section<W, F>(
    out: &mut W,
    index: &EntityIndex,
    kind: CollectionKind,
    headers: &[&str],
    columns: F,
) -> fmt::Result
where
    W: Write,
    F: Fn(&Record) -> Vec<String>,
{
    let collection = index.collection(kind);
    if collection.is_empty() {
        return Ok(());
    }

    writeln!(out, "## {} ({})\n", kind.label(), collection.len())?;
    writeln!(out, "| {} |", headers.join(" | "))?;
    writeln!(out, "|{}|", vec!["----"; headers.len()].join("|"))?;

    for record in collection.iter() {
        let mut row = vec![record.id().to_string(), escape(record.name().unwrap_or(""))];
        row.extend(columns(record));
        writeln!(out, "| {} |", row.join(" | "))?;
    }
    out.write_char('\n')
}

fn cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => escape(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
