//! Chart reporting.
//!
//! Turns aggregated statistics into one set of charts per result group,
//! optionally exporting the plotted values and a run summary.

pub mod charts;
pub mod generator;
pub mod render;

pub use charts::*;
pub use generator::*;
pub use render::{render_chart, RenderOptions};

use crate::models::{Aggregates, ChartSeries, Scale, Size};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while producing charts.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no aggregated results for group '{group}' at size {size}")]
    MissingAggregate { group: String, size: Size },

    #[error("output directory does not exist: {}", path.display())]
    OutputDirectoryMissing { path: PathBuf },

    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize chart data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for a reporting pass.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Root directory charts are written under (`<root>/<group>/<stem>.<ext>`).
    pub graphs_root: PathBuf,
    /// Scale of the quicksort sort and total charts.
    pub quicksort_scale: Scale,
    /// Image settings.
    pub render: RenderOptions,
    /// Create missing group output directories instead of failing.
    pub create_dirs: bool,
    /// Write a `<stem>.json` file with the plotted values next to each chart.
    pub export_data: bool,
    /// Show a progress bar.
    pub show_progress: bool,
}

/// A chart that was written.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    /// Image path.
    pub path: PathBuf,
    /// The plotted series.
    pub series: ChartSeries,
}

/// Render every chart of every group, in group order.
///
/// Stops at the first error; charts of earlier groups stay on disk.
pub fn report(
    groups: &[String],
    sizes: &[Size],
    aggregates: &Aggregates,
    options: &ReportOptions,
) -> Result<Vec<RenderedChart>, ReportError> {
    let progress = progress_bar(groups.len() * 3, options.show_progress);
    let mut rendered = Vec::new();

    for group in groups {
        let series = build_group_series(group, sizes, aggregates, options.quicksort_scale)?;
        let dir = ensure_group_dir(&options.graphs_root, group, options.create_dirs)?;

        for chart in series {
            let path = dir.join(format!("{}.{}", chart.stem, options.render.format.extension()));
            progress.set_message(format!("{}/{}", group, chart.stem));

            render_chart(&chart, &path, &options.render)?;
            if options.export_data {
                export_series(&chart, &dir.join(format!("{}.json", chart.stem)))?;
            }

            progress.inc(1);
            rendered.push(RenderedChart {
                path,
                series: chart,
            });
        }

        info!("Rendered charts for group '{}' in {}", group, dir.display());
    }

    progress.finish_and_clear();
    Ok(rendered)
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn ensure_group_dir(root: &Path, group: &str, create: bool) -> Result<PathBuf, ReportError> {
    let dir = root.join(group);
    if dir.is_dir() {
        return Ok(dir);
    }

    if !create {
        return Err(ReportError::OutputDirectoryMissing { path: dir });
    }

    debug!("Creating output directory {}", dir.display());
    std::fs::create_dir_all(&dir).map_err(|source| ReportError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Write a chart's plotted values as pretty JSON.
///
/// The output holds no timestamps, so identical inputs give identical files.
pub fn export_series(series: &ChartSeries, path: &Path) -> Result<(), ReportError> {
    let mut content = serde_json::to_string_pretty(series)?;
    content.push('\n');
    std::fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
