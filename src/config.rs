//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.benchplot.toml` files. Defaults match the benchmark layout the tool
//! was written for, so no file is needed.

use crate::cli::ImageFormat;
use crate::models::{Scale, Size};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".benchplot.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Benchmark layout.
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Root directory of the result files.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Root directory of the charts.
    #[serde(default = "default_graphs_dir")]
    pub graphs_dir: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            graphs_dir: default_graphs_dir(),
            verbose: false,
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("./results")
}

fn default_graphs_dir() -> PathBuf {
    PathBuf::from("./graphs")
}

/// Which groups and sizes make up the benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Result groups, processed in this order.
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,

    /// Problem sizes plotted for every group.
    #[serde(default = "default_sizes")]
    pub sizes: Vec<Size>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            sizes: default_sizes(),
        }
    }
}

fn default_groups() -> Vec<String> {
    vec!["demand", "demand_sort", "pre", "pre_sort"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_sizes() -> Vec<Size> {
    vec![64, 128, 256, 512]
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Image format.
    #[serde(default)]
    pub format: ImageFormat,

    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Y scale of the quicksort sort and total charts.
    /// The allocation chart is always linear.
    #[serde(default)]
    pub quicksort_scale: Scale,

    /// Create missing `<graphs_dir>/<group>` directories.
    #[serde(default)]
    pub create_dirs: bool,

    /// Write chart data and run summaries.
    #[serde(default = "default_true")]
    pub export_data: bool,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            width: default_width(),
            height: default_height(),
            quicksort_scale: Scale::default(),
            create_dirs: false,
            export_data: true,
        }
    }
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values serde cannot check.
    pub fn validate(&self) -> Result<()> {
        if self.benchmark.groups.is_empty() {
            anyhow::bail!("benchmark.groups must not be empty");
        }
        if self.benchmark.sizes.is_empty() {
            anyhow::bail!("benchmark.sizes must not be empty");
        }
        if self.charts.width == 0 || self.charts.height == 0 {
            anyhow::bail!("charts.width and charts.height must be positive");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.results_dir {
            self.general.results_dir = dir.clone();
        }
        if let Some(ref dir) = args.graphs_dir {
            self.general.graphs_dir = dir.clone();
        }

        if let Some(ref groups) = args.groups {
            self.benchmark.groups = groups.clone();
        }
        if let Some(ref sizes) = args.sizes {
            self.benchmark.sizes = sizes.clone();
        }

        if let Some(format) = args.format {
            self.charts.format = format;
        }
        if let Some(scale) = args.quicksort_scale {
            self.charts.quicksort_scale = scale;
        }

        // Flags only ever switch behaviour on (or export off)
        if args.create_dirs {
            self.charts.create_dirs = true;
        }
        if args.no_export {
            self.charts.export_data = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.results_dir, PathBuf::from("./results"));
        assert_eq!(config.general.graphs_dir, PathBuf::from("./graphs"));
        assert_eq!(
            config.benchmark.groups,
            vec!["demand", "demand_sort", "pre", "pre_sort"]
        );
        assert_eq!(config.benchmark.sizes, vec![64, 128, 256, 512]);
        assert_eq!(config.charts.format, ImageFormat::Png);
        assert_eq!(config.charts.quicksort_scale, Scale::Linear);
        assert!(!config.charts.create_dirs);
        assert!(config.charts.export_data);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
results_dir = "bench/results"

[benchmark]
groups = ["demand", "demand_sort"]
sizes = [32, 64]

[charts]
format = "svg"
quicksort_scale = "log"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.results_dir, PathBuf::from("bench/results"));
        assert_eq!(config.general.graphs_dir, PathBuf::from("./graphs"));
        assert_eq!(config.benchmark.groups, vec!["demand", "demand_sort"]);
        assert_eq!(config.benchmark.sizes, vec![32, 64]);
        assert_eq!(config.charts.format, ImageFormat::Svg);
        assert_eq!(config.charts.quicksort_scale, Scale::Log);
        assert_eq!(config.charts.width, 640);
        assert!(config.charts.export_data);
    }

    #[test]
    fn test_validate_rejects_empty_lists() {
        let mut config = Config::default();
        config.benchmark.sizes.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.benchmark.groups.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[charts]\nwidth = 800\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.charts.width, 800);
        assert_eq!(config.charts.height, 480);

        std::fs::write(&path, "[charts]\nwidth = 0\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let args = Args {
            graphs_dir: Some(PathBuf::from("out")),
            sizes: Some(vec![128]),
            quicksort_scale: Some(Scale::Log),
            no_export: true,
            create_dirs: true,
            ..Args::default()
        };

        config.merge_with_args(&args);

        assert_eq!(config.general.results_dir, PathBuf::from("./results"));
        assert_eq!(config.general.graphs_dir, PathBuf::from("out"));
        assert_eq!(config.benchmark.sizes, vec![128]);
        assert_eq!(config.benchmark.groups.len(), 4);
        assert_eq!(config.charts.quicksort_scale, Scale::Log);
        assert!(!config.charts.export_data);
        assert!(config.charts.create_dirs);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[benchmark]"));
        assert!(toml_str.contains("[charts]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.benchmark.sizes, vec![64, 128, 256, 512]);
    }
}
