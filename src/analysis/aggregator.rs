//! Result aggregation.
//!
//! Reads every result file of every group and reduces each file to
//! per-quantity statistics keyed by (group, size).

use crate::analysis::Stats;
use crate::models::{AggregateKey, Aggregates};
use crate::scanner::{ResultScanner, ScanError};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while reading and aggregating result files.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}:{line}: expected 2 fields, found {fields}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        fields: usize,
    },

    #[error("{}:{line}: '{value}' is not a non-negative integer", path.display())]
    InvalidNumber {
        path: PathBuf,
        line: u64,
        value: String,
    },
}

/// Raw timing columns of one result file, in microseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Samples {
    /// First column.
    pub allocation: Vec<u64>,
    /// Second column.
    pub compute: Vec<u64>,
}

/// Parse result rows: one header line, then `allocation, compute` pairs.
///
/// A blank line among the data rows is a row with zero fields. `path` is
/// only used for error messages.
pub fn parse_samples<R: Read>(reader: R, path: &Path) -> Result<Samples, AggregateError> {
    let csv_error = |source| AggregateError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let blank_row = |line| AggregateError::MalformedRow {
        path: path.to_path_buf(),
        line,
        fields: 0,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(reader);

    csv_reader.headers().map_err(csv_error)?;

    // The reader drops empty lines silently; they only show up as extra
    // lines consumed between two records.
    let mut line = csv_reader.position().line();
    let mut samples = Samples::default();
    let mut record = csv::StringRecord::new();

    while csv_reader.read_record(&mut record).map_err(csv_error)? {
        let end = csv_reader.position().line();
        if end > line + 1 {
            return Err(blank_row(line));
        }

        if record.len() != 2 {
            return Err(AggregateError::MalformedRow {
                path: path.to_path_buf(),
                line,
                fields: record.len(),
            });
        }

        samples.allocation.push(parse_field(&record[0], path, line)?);
        samples.compute.push(parse_field(&record[1], path, line)?);
        line = end;
    }

    if csv_reader.position().line() > line {
        return Err(blank_row(line));
    }

    Ok(samples)
}

fn parse_field(value: &str, path: &Path, line: u64) -> Result<u64, AggregateError> {
    value.parse().map_err(|_| AggregateError::InvalidNumber {
        path: path.to_path_buf(),
        line,
        value: value.to_string(),
    })
}

/// Read and parse a single result file.
pub fn read_samples(path: &Path) -> Result<Samples, AggregateError> {
    let file = File::open(path).map_err(|source| AggregateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_samples(file, path)
}

/// Aggregate all result files of the given groups.
///
/// Any unreadable or malformed file aborts the whole pass. When two files
/// of a group map to the same size, the one read last (by file name) wins.
pub fn aggregate(groups: &[String], scanner: &ResultScanner) -> Result<Aggregates, AggregateError> {
    let mut aggregates = Aggregates::default();

    for group in groups {
        let files = scanner.group_files(group)?;
        if files.is_empty() {
            warn!("No result files for group '{}'", group);
            continue;
        }

        for file in files {
            let samples = read_samples(&file.path)?;
            let allocation = Stats::from_samples(&samples.allocation);
            let compute = Stats::from_samples(&samples.compute);
            if !allocation.is_defined() {
                warn!(
                    "{} has no data rows; size {} of group '{}' has no defined mean",
                    file.path.display(),
                    file.size,
                    group
                );
            }

            debug!(
                "{} (size {}): {} samples, allocation {:.1}±{:.1}, compute {:.1}±{:.1}",
                file.path.display(),
                file.size,
                samples.allocation.len(),
                allocation.mean,
                allocation.std_dev,
                compute.mean,
                compute.std_dev
            );

            let key = AggregateKey::new(group, file.size);
            if aggregates.insert(key, allocation, compute) {
                warn!(
                    "Group '{}' has several files for size {}; keeping {}",
                    group,
                    file.size,
                    file.path.display()
                );
            }
            aggregates.files_read += 1;
        }

        info!(
            "Aggregated group '{}': sizes {:?}",
            group,
            aggregates.sizes_of(group)
        );
    }

    Ok(aggregates)
}
