//! Chart planning.
//!
//! Decides which charts a group gets, how each is titled and scaled, and
//! assembles the plotted series from the aggregates.

use crate::models::{Aggregates, ChartPoint, ChartSeries, GroupKind, Quantity, Scale, Size};
use crate::report::ReportError;

/// Presentation of one chart of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartConfig {
    /// Plotted quantity.
    pub quantity: Quantity,
    /// Output file name without extension.
    pub stem: &'static str,
    /// Y axis scale.
    pub scale: Scale,
    /// Quantity wording used in the title.
    pub label: &'static str,
}

/// The three charts drawn for a group of the given kind.
///
/// `quicksort_scale` applies to the quicksort sort and total charts; the
/// allocation chart is always linear.
pub fn chart_configs(kind: GroupKind, quicksort_scale: Scale) -> [ChartConfig; 3] {
    match kind {
        GroupKind::MatrixMultiplication => [
            ChartConfig {
                quantity: Quantity::Allocation,
                stem: "alloc",
                scale: Scale::Linear,
                label: "allocation",
            },
            ChartConfig {
                quantity: Quantity::Compute,
                stem: "mult",
                scale: Scale::Log,
                label: "multiplication",
            },
            ChartConfig {
                quantity: Quantity::Total,
                stem: "total",
                scale: Scale::Log,
                label: "total",
            },
        ],
        GroupKind::Quicksort => [
            ChartConfig {
                quantity: Quantity::Allocation,
                stem: "alloc",
                scale: Scale::Linear,
                label: "allocation",
            },
            ChartConfig {
                quantity: Quantity::Compute,
                stem: "sort",
                scale: quicksort_scale,
                label: "sorting",
            },
            ChartConfig {
                quantity: Quantity::Total,
                stem: "total",
                scale: quicksort_scale,
                label: "total",
            },
        ],
    }
}

/// Title of a chart, e.g. `Quicksort demand paging sorting runtimes`.
pub fn chart_title(group: &str, kind: GroupKind, label: &str) -> String {
    let paging = match kind {
        GroupKind::Quicksort => group.replace("_sort", ""),
        GroupKind::MatrixMultiplication => group.to_string(),
    };
    format!("{} {} paging {} runtimes", kind, paging, label)
}

/// Build the series of all charts for one group.
///
/// Sizes are plotted in ascending order. A size without aggregated data is
/// an error, never a zero point.
pub fn build_group_series(
    group: &str,
    sizes: &[Size],
    aggregates: &Aggregates,
    quicksort_scale: Scale,
) -> Result<Vec<ChartSeries>, ReportError> {
    let mut sizes = sizes.to_vec();
    sizes.sort_unstable();
    sizes.dedup();

    let kind = GroupKind::of(group);
    let configs = chart_configs(kind, quicksort_scale);
    let mut points: [Vec<ChartPoint>; 3] = Default::default();

    for size in sizes {
        let missing = || ReportError::MissingAggregate {
            group: group.to_string(),
            size,
        };
        let allocation = aggregates
            .get(group, size, Quantity::Allocation)
            .ok_or_else(missing)?;
        let compute = aggregates
            .get(group, size, Quantity::Compute)
            .ok_or_else(missing)?;
        let total = allocation.combine(&compute);

        for (config, series_points) in configs.iter().zip(points.iter_mut()) {
            let stats = match config.quantity {
                Quantity::Allocation => allocation,
                Quantity::Compute => compute,
                Quantity::Total => total,
            };
            series_points.push(ChartPoint {
                size,
                mean: stats.mean,
                std_dev: stats.std_dev,
            });
        }
    }

    Ok(configs
        .iter()
        .zip(points)
        .map(|(config, points)| ChartSeries {
            title: chart_title(group, kind, config.label),
            group: group.to_string(),
            quantity: config.quantity,
            stem: config.stem.to_string(),
            scale: config.scale,
            points,
        })
        .collect())
}
