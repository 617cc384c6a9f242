//! Chart rendering with plotters.

use crate::cli::ImageFormat;
use crate::models::{ChartPoint, ChartSeries, Scale};
use crate::report::ReportError;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const X_LABEL: &str = "Size";
const Y_LABEL: &str = "Time (microseconds)";

/// Family every chart text is drawn in.
const FONT_FAMILY: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Register the bundled font under [`FONT_FAMILY`]. Runs once per process.
fn ensure_font() -> Result<(), String> {
    static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA)
                .map_err(|_| "bundled chart font could not be loaded".to_string())
        })
        .clone()
}

/// Image settings shared by every chart of a run.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            width: 640,
            height: 480,
        }
    }
}

/// Draw one error-bar chart to `path`, replacing any existing file.
pub fn render_chart(
    series: &ChartSeries,
    path: &Path,
    options: &RenderOptions,
) -> Result<(), ReportError> {
    debug!("Rendering '{}' to {}", series.title, path.display());

    let size = (options.width, options.height);
    let result = ensure_font().and_then(|()| match options.format {
        ImageFormat::Png => {
            draw_chart(BitMapBackend::new(path, size).into_drawing_area(), series)
                .map_err(|e| e.to_string())
        }
        ImageFormat::Svg => draw_chart(SVGBackend::new(path, size).into_drawing_area(), series)
            .map_err(|e| e.to_string()),
    });

    result.map_err(|message| ReportError::Render {
        path: path.to_path_buf(),
        message,
    })
}

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    series: &ChartSeries,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let x_range = x_range(&series.points);
    let y_range = y_range(&series.points, series.scale);

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(&series.title, (FONT_FAMILY, 20).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70);

    match series.scale {
        Scale::Linear => {
            let mut chart = builder.build_cartesian_2d(x_range, y_range)?;
            draw_series_on(&mut chart, &series.points, f64::NEG_INFINITY)?;
        }
        Scale::Log => {
            let floor = y_range.start;
            let mut chart = builder.build_cartesian_2d(x_range, y_range.log_scale())?;
            draw_series_on(&mut chart, &series.points, floor)?;
        }
    }

    root.present()?;
    Ok(())
}

/// Mesh, mean line, markers and ±1 std error bars. Values below `floor`
/// are drawn at `floor`; points without a defined mean are left out.
fn draw_series_on<DB, Y>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, Y>>,
    points: &[ChartPoint],
    floor: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    chart
        .configure_mesh()
        .label_style((FONT_FAMILY, 12))
        .axis_desc_style((FONT_FAMILY, 14))
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .draw()?;

    let points: Vec<&ChartPoint> = points.iter().filter(|p| p.mean.is_finite()).collect();

    let means: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.size), p.mean.max(floor)))
        .collect();

    chart.draw_series(LineSeries::new(means.clone(), BLUE.stroke_width(2)))?;
    chart.draw_series(points.iter().map(|p| {
        ErrorBar::new_vertical(
            f64::from(p.size),
            (p.mean - p.std_dev).max(floor),
            p.mean.max(floor),
            (p.mean + p.std_dev).max(floor),
            BLUE.filled(),
            8,
        )
    }))?;
    chart.draw_series(means.into_iter().map(|m| Circle::new(m, 4, BLUE.filled())))?;

    Ok(())
}

/// X axis range covering every size with a small margin.
pub fn x_range(points: &[ChartPoint]) -> Range<f64> {
    let min = points.iter().map(|p| f64::from(p.size)).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| f64::from(p.size))
        .fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad)..(max + pad)
}

/// Y axis range covering every error bar.
///
/// Linear axes start at zero (or lower if an error bar dips below it).
/// Logarithmic axes start below the smallest positive value and never at
/// or below zero.
pub fn y_range(points: &[ChartPoint], scale: Scale) -> Range<f64> {
    let high = points
        .iter()
        .map(|p| p.mean + p.std_dev)
        .fold(f64::NEG_INFINITY, f64::max);

    match scale {
        Scale::Linear => {
            let low = points
                .iter()
                .map(|p| p.mean - p.std_dev)
                .fold(0.0, f64::min);
            let high = if high.is_finite() && high > low {
                high
            } else {
                low + 1.0
            };
            low..(high + (high - low) * 0.05)
        }
        Scale::Log => {
            let smallest = points
                .iter()
                .flat_map(|p| [p.mean - p.std_dev, p.mean])
                .filter(|v| *v > 0.0)
                .fold(f64::INFINITY, f64::min);
            let low = if smallest.is_finite() {
                smallest / 2.0
            } else {
                1.0
            };
            let high = if high.is_finite() && high > low {
                high * 2.0
            } else {
                low * 10.0
            };
            low..high
        }
    }
}
