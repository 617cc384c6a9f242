//! Run summary generation.
//!
//! Produces a Markdown overview of the plotted statistics and a JSON
//! dump of the full run, written next to the charts.

use crate::models::{ChartSeries, GroupKind, Quantity, RunSummary};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Generate the Markdown summary.
pub fn generate_markdown_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    output.push_str("# Benchmark Report\n\n");
    output.push_str(&generate_metadata_section(summary));

    for group in group_names(&summary.series) {
        output.push_str(&generate_group_section(&group, &summary.series));
    }

    output
}

fn generate_metadata_section(summary: &RunSummary) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Results:** `{}`\n", summary.results_dir));
    section.push_str(&format!("- **Graphs:** `{}`\n", summary.graphs_dir));
    section.push_str(&format!("- **Files Read:** {}\n", summary.files_read));
    section.push_str(&format!("- **Charts Written:** {}\n", summary.charts.len()));
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n",
        summary.duration_seconds
    ));
    section.push('\n');

    section
}

/// Groups in the order their charts were rendered.
fn group_names(series: &[ChartSeries]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for s in series {
        if !names.contains(&s.group) {
            names.push(s.group.clone());
        }
    }
    names
}

/// One table per group: mean ± std of every quantity at every size.
fn generate_group_section(group: &str, series: &[ChartSeries]) -> String {
    let kind = GroupKind::of(group);
    let find = |quantity: Quantity| {
        series
            .iter()
            .find(|s| s.group == group && s.quantity == quantity)
    };

    let (Some(allocation), Some(compute), Some(total)) = (
        find(Quantity::Allocation),
        find(Quantity::Compute),
        find(Quantity::Total),
    ) else {
        return String::new();
    };

    let compute_label = match kind {
        GroupKind::MatrixMultiplication => "Multiplication",
        GroupKind::Quicksort => "Sort",
    };

    let mut section = String::new();
    section.push_str(&format!("## {} ({})\n\n", group, kind));
    section.push_str(&format!(
        "| Size | Allocation (µs) | {} (µs) | Total (µs) |\n",
        compute_label
    ));
    section.push_str("|---:|---:|---:|---:|\n");

    for ((a, c), t) in allocation
        .points
        .iter()
        .zip(&compute.points)
        .zip(&total.points)
    {
        section.push_str(&format!(
            "| {} | {:.1} ± {:.1} | {:.1} ± {:.1} | {:.1} ± {:.1} |\n",
            a.size, a.mean, a.std_dev, c.mean, c.std_dev, t.mean, t.std_dev
        ));
    }
    section.push('\n');

    section
}

/// Generate the JSON summary.
pub fn generate_json_summary(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(Into::into)
}

/// Write `summary.md` and `summary.json` into `dir`.
pub fn write_summary(summary: &RunSummary, dir: &Path) -> Result<Vec<PathBuf>> {
    let markdown_path = dir.join("summary.md");
    std::fs::write(&markdown_path, generate_markdown_summary(summary))
        .with_context(|| format!("Failed to write {}", markdown_path.display()))?;

    let json_path = dir.join("summary.json");
    std::fs::write(&json_path, generate_json_summary(summary)?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    Ok(vec![markdown_path, json_path])
}
