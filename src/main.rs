//! Benchplot - paging benchmark chart generator
//!
//! A CLI tool that reads benchmark result files, aggregates mean and
//! standard deviation per result group and problem size, and renders
//! error-bar charts for the allocation, compute and total runtimes.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (unreadable or malformed results, missing data, write failure)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod scanner;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use models::{Aggregates, Quantity, RunSummary};
use report::{RenderOptions, ReportOptions};
use scanner::ResultScanner;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    match run(args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .benchplot.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize directories, groups, sizes and chart options.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Load configuration, set up logging and run the requested mode.
fn run(args: Args) -> Result<()> {
    let (mut config, source) = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };
    init_logging(level);

    info!("Benchplot v{}", env!("CARGO_PKG_VERSION"));
    match source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }
    debug!("Configuration: {:?}", config);

    if args.dry_run {
        return handle_dry_run(&config);
    }

    if !args.quiet {
        println!(
            "📥 Reading results from {}",
            config.general.results_dir.display()
        );
    }

    let summary = run_pipeline(&config, !args.quiet)?;

    if !args.quiet {
        println!("\n📊 Summary:");
        println!("   Result files: {}", summary.files_read);
        println!("   Charts written: {}", summary.charts.len());
        println!("   Duration: {:.2}s", summary.duration_seconds);
        println!(
            "\n✅ Done! Charts saved under: {}",
            config.general.graphs_dir.display()
        );
    }

    Ok(())
}

/// Read, aggregate and render. Returns what was produced.
fn run_pipeline(config: &Config, show_progress: bool) -> Result<RunSummary> {
    let start_time = Instant::now();

    // Step 1: Aggregate result files
    let scanner = ResultScanner::new(config.general.results_dir.clone());
    let aggregates = analysis::aggregate(&config.benchmark.groups, &scanner).with_context(|| {
        format!(
            "Failed to aggregate results from {}",
            config.general.results_dir.display()
        )
    })?;
    if aggregates.is_empty() {
        warn!("No result data found in any group");
    } else {
        info!(
            "Aggregated {} result files into {} points",
            aggregates.files_read,
            aggregates.len()
        );
    }

    // Step 2: Render charts
    let options = ReportOptions {
        graphs_root: config.general.graphs_dir.clone(),
        quicksort_scale: config.charts.quicksort_scale,
        render: RenderOptions {
            format: config.charts.format,
            width: config.charts.width,
            height: config.charts.height,
        },
        create_dirs: config.charts.create_dirs,
        export_data: config.charts.export_data,
        show_progress,
    };

    let rendered = report::report(
        &config.benchmark.groups,
        &config.benchmark.sizes,
        &aggregates,
        &options,
    )
    .context("Failed to render charts")?;

    // Step 3: Summarize
    let summary = RunSummary {
        generated_at: Utc::now(),
        results_dir: config.general.results_dir.display().to_string(),
        graphs_dir: config.general.graphs_dir.display().to_string(),
        files_read: aggregates.files_read,
        charts: rendered
            .iter()
            .map(|chart| chart.path.display().to_string())
            .collect(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
        series: rendered.into_iter().map(|chart| chart.series).collect(),
    };

    if config.charts.export_data {
        let written = report::write_summary(&summary, &config.general.graphs_dir)?;
        for path in written {
            debug!("Wrote {}", path.display());
        }
    }

    Ok(summary)
}

/// Handle --dry-run: aggregate and print the statistics, draw nothing.
fn handle_dry_run(config: &Config) -> Result<()> {
    println!("\n🔍 Dry run: aggregating results (no charts)...\n");

    let scanner = ResultScanner::new(config.general.results_dir.clone());
    let aggregates = analysis::aggregate(&config.benchmark.groups, &scanner)?;

    for group in &config.benchmark.groups {
        println!("   📁 {}", group);
        print_group(&aggregates, group, &config.benchmark.sizes);
    }

    println!(
        "\n✅ Dry run complete. {} result files read, no charts written.",
        aggregates.files_read
    );
    Ok(())
}

fn print_group(aggregates: &Aggregates, group: &str, sizes: &[models::Size]) {
    let mut plotted = sizes.to_vec();
    plotted.sort_unstable();
    plotted.dedup();

    for &size in &plotted {
        let line = [Quantity::Allocation, Quantity::Compute, Quantity::Total]
            .into_iter()
            .map(|quantity| match aggregates.get(group, size, quantity) {
                Some(stats) => format!("{} {:.1} ± {:.1}", quantity, stats.mean, stats.std_dev),
                None => format!("{} -", quantity),
            })
            .collect::<Vec<_>>()
            .join(" | ");
        println!("      {:>6}: {}", size, line);
    }

    let unplotted: Vec<_> = aggregates
        .sizes_of(group)
        .into_iter()
        .filter(|size| !plotted.contains(size))
        .collect();
    if !unplotted.is_empty() {
        warn!("Group '{}' has data for unplotted sizes {:?}", group, unplotted);
    }
}

/// Load configuration from file or use defaults.
///
/// Returns the config and the file it came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Ok((Config::load(config_path)?, Some(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, Some(PathBuf::from(CONFIG_FILE_NAME)))),
        Ok(None) => Ok((Config::default(), None)),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE_NAME, e);
            Ok((Config::default(), None))
        }
    }
}
