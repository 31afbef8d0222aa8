//! Markdown rendering and usage summaries for asset reports.

use std::fmt::{self, Write};

use crate::report::REPORT_LARGE_ASSET_BYTES;
use crate::size::format_bytes;
use crate::{AssetRecord, AssetReport, ConsumerKind};

const TABLE_ROWS: usize = 20;
const LARGEST_FILES: usize = 10;

/// Consumer kinds listed by [`asset_mapping`], in order.
const MAPPING_KINDS: [ConsumerKind; 4] = [
    ConsumerKind::Actor,
    ConsumerKind::Enemy,
    ConsumerKind::Map,
    ConsumerKind::Troop,
];

/// Compact per-kind consumer counts, e.g. `Actor:2, Map:1`, or `None`.
pub fn format_usage(asset: &AssetRecord) -> String {
    let parts: Vec<String> = ConsumerKind::ALL
        .iter()
        .filter_map(|&kind| {
            let n = asset.consumers(kind).len();
            (n > 0).then(|| format!("{}:{n}", kind.label()))
        })
        .collect();

    if parts.is_empty() {
        "None".to_string()
    } else {
        parts.join(", ")
    }
}

/// Each asset's file name with its consumers, e.g. `["Actor 1", "Map 3"]`.
pub fn asset_mapping(assets: &[AssetRecord]) -> Vec<(String, Vec<String>)> {
    assets
        .iter()
        .map(|asset| {
            let consumers: Vec<String> = MAPPING_KINDS
                .iter()
                .flat_map(|&kind| {
                    asset
                        .consumers(kind)
                        .iter()
                        .map(move |id| format!("{} {id}", kind.label()))
                })
                .collect();
            (asset.file_name().to_string(), consumers)
        })
        .collect()
}

/// Render the full asset report as markdown.
pub fn render_asset_context(report: &AssetReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_asset_context(&mut out, report)?;
    Ok(out)
}

/// Write the report rendered by [`render_asset_context`] to `out`.
pub fn write_asset_context<W: Write>(out: &mut W, report: &AssetReport) -> fmt::Result {
    writeln!(out, "# Asset Context Report\n")?;
    writeln!(out, "**Project**: {}\n", report.project.display())?;
    out.write_str("---\n\n")?;

    out.write_str("## Summary\n\n")?;
    writeln!(out, "- **Total assets**: {}", report.total_assets)?;
    writeln!(out, "- **Total size**: {}", report.total_size_formatted)?;
    writeln!(out, "- **In use**: {}", report.used)?;
    writeln!(out, "- **Unused**: {}\n", report.unused)?;

    out.write_str("## By Category\n\n")?;
    out.write_str("| Category | Count |\n")?;
    out.write_str("|----------|-------|\n")?;
    for (category, count) in &report.by_category {
        writeln!(out, "| {category} | {count} |")?;
    }
    out.write_char('\n')?;

    out.write_str("## Usage\n\n")?;

    let used: Vec<&AssetRecord> = report.used_assets().collect();
    if !used.is_empty() {
        writeln!(out, "### Used Assets ({})\n", used.len())?;
        out.write_str("| File | Category | Size | Used By |\n")?;
        out.write_str("|------|----------|------|---------|\n")?;
        for asset in used.iter().take(TABLE_ROWS) {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                escape(asset.file_name()),
                asset.category(),
                format_bytes(asset.size()),
                format_usage(asset)
            )?;
        }
        more(out, used.len())?;
        out.write_char('\n')?;
    }

    let unused: Vec<&AssetRecord> = report.unused_assets().collect();
    if !unused.is_empty() {
        writeln!(out, "### Unused Assets ({})\n", unused.len())?;
        out.write_str("| File | Category | Size |\n")?;
        out.write_str("|------|----------|------|\n")?;
        for asset in unused.iter().take(TABLE_ROWS) {
            writeln!(
                out,
                "| {} | {} | {} |",
                escape(asset.file_name()),
                asset.category(),
                format_bytes(asset.size())
            )?;
        }
        more(out, unused.len())?;
        writeln!(
            out,
            "\n**Removing unused assets would save {}**\n",
            format_bytes(report.unused_bytes())
        )?;
    }

    out.write_str("## Recommendations\n\n")?;
    for recommendation in &report.recommendations {
        writeln!(out, "- {recommendation}")?;
    }
    out.write_char('\n')?;

    let mut largest: Vec<&AssetRecord> = report
        .assets
        .iter()
        .filter(|a| a.size() > REPORT_LARGE_ASSET_BYTES)
        .collect();
    largest.sort_by(|a, b| b.size().cmp(&a.size()));
    largest.truncate(LARGEST_FILES);

    if !largest.is_empty() {
        writeln!(out, "## Largest Files (Top {LARGEST_FILES})\n")?;
        out.write_str("| File | Category | Size | Status |\n")?;
        out.write_str("|------|----------|------|--------|\n")?;
        for asset in largest {
            let status = if asset.is_unused() { "unused" } else { "in use" };
            writeln!(
                out,
                "| {} | {} | {} | {status} |",
                escape(asset.file_name()),
                asset.category(),
                format_bytes(asset.size())
            )?;
        }
        out.write_char('\n')?;
    }

    Ok(())
}

fn more<W: Write>(out: &mut W, total: usize) -> fmt::Result {
    if total > TABLE_ROWS {
        writeln!(out, "\n*... and {} more*", total - TABLE_ROWS)?;
    }
    Ok(())
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}
