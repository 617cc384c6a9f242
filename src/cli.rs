//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every option is optional: without arguments the
//! tool reads `./results` and writes `./graphs`.

use crate::models::{Scale, Size};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Benchplot - paging benchmark chart generator
///
/// Reads benchmark result files from `<results>/<group>/`, computes mean and
/// standard deviation per problem size, and draws allocation, compute and
/// total runtime charts into `<graphs>/<group>/`.
///
/// Examples:
///   benchplot
///   benchplot --results-dir ./results --graphs-dir ./graphs --format svg
///   benchplot --groups demand,pre --sizes 64,128,256
///   benchplot --quicksort-scale log --create-dirs
///   benchplot --dry-run
///   benchplot --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Root directory holding one sub-directory of result files per group
    #[arg(short, long, value_name = "DIR", env = "BENCHPLOT_RESULTS")]
    pub results_dir: Option<PathBuf>,

    /// Root directory charts are written under
    ///
    /// Each group's charts go to `<graphs-dir>/<group>/`, which must exist
    /// unless --create-dirs is given.
    #[arg(short, long, value_name = "DIR", env = "BENCHPLOT_GRAPHS")]
    pub graphs_dir: Option<PathBuf>,

    /// Result groups to process (comma-separated)
    ///
    /// Example: --groups demand,demand_sort,pre,pre_sort
    #[arg(long, value_name = "GROUPS", value_delimiter = ',')]
    pub groups: Option<Vec<String>>,

    /// Problem sizes to plot (comma-separated)
    ///
    /// Example: --sizes 64,128,256,512
    #[arg(long, value_name = "SIZES", value_delimiter = ',')]
    pub sizes: Option<Vec<Size>>,

    /// Image format (png, svg)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ImageFormat>,

    /// Y scale of the quicksort sort and total charts (linear, log)
    #[arg(long, value_name = "SCALE")]
    pub quicksort_scale: Option<Scale>,

    /// Create missing output directories
    #[arg(long)]
    pub create_dirs: bool,

    /// Do not write chart data (.json) and run summaries
    #[arg(long)]
    pub no_export: bool,

    /// Aggregate and print the statistics without drawing charts
    #[arg(long)]
    pub dry_run: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .benchplot.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .benchplot.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Image format of the charts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG raster image (default)
    #[default]
    Png,
    /// SVG vector image
    Svg,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref groups) = self.groups {
            if groups.is_empty() {
                return Err("At least one group is required".to_string());
            }
            for group in groups {
                if group.trim().is_empty() {
                    return Err("Group names must not be empty".to_string());
                }
                if group.contains('/') || group.contains('\\') {
                    return Err(format!("Group name must not contain a path separator: {}", group));
                }
            }
        }

        if let Some(ref sizes) = self.sizes {
            if sizes.is_empty() {
                return Err("At least one size is required".to_string());
            }
        }

        // Validate config file if provided
        if let Some(ref config_path) = self.config {
            if !config_path.is_file() {
                return Err(format!(
                    "Config file does not exist: {}",
                    config_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["benchplot"]).unwrap();
        assert!(args.groups.is_none());
        assert!(args.sizes.is_none());
        assert!(args.format.is_none());
        assert!(!args.dry_run);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_lists_and_enums() {
        let args = Args::try_parse_from([
            "benchplot",
            "--groups",
            "demand,pre_sort",
            "--sizes",
            "64,512",
            "--format",
            "svg",
            "--quicksort-scale",
            "log",
            "-g",
            "out",
        ])
        .unwrap();

        assert_eq!(
            args.groups,
            Some(vec!["demand".to_string(), "pre_sort".to_string()])
        );
        assert_eq!(args.sizes, Some(vec![64, 512]));
        assert_eq!(args.format, Some(ImageFormat::Svg));
        assert_eq!(args.quicksort_scale, Some(Scale::Log));
        assert_eq!(args.graphs_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_invalid_size_rejected() {
        assert!(Args::try_parse_from(["benchplot", "--sizes", "64,big"]).is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = Args {
            verbose: true,
            quiet: true,
            ..Args::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_group_names() {
        let args = Args {
            groups: Some(vec!["../demand".to_string()]),
            ..Args::default()
        };
        assert!(args.validate().is_err());

        let args = Args {
            groups: Some(vec![" ".to_string()]),
            ..Args::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_config() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/.benchplot.toml")),
            ..Args::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::default();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_image_format_extension() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Svg.extension(), "svg");
    }
}
