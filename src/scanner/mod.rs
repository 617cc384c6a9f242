//! Result file discovery.
//!
//! Lists the data files of each result group and owns the rule that maps
//! a file path to the problem size it was measured at.

use crate::models::Size;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors raised while locating result files.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("result directory for group '{group}' not found: {}", path.display())]
    GroupDirectoryMissing { group: String, path: PathBuf },

    #[error("failed to list result files: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("no size token (digit run) in path: {}", path.display())]
    MissingSizeToken { path: PathBuf },

    #[error("size token '{token}' out of range in path: {}", path.display())]
    InvalidSizeToken { path: PathBuf, token: String },
}

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[0-9]+").expect("size pattern is valid"))
}

/// Extract the problem size from a result file path.
///
/// The size is the first run of ASCII digits anywhere in the path string,
/// directories included. Precondition: no other digit run may precede the
/// size token, e.g. `results/demand/output256.csv` is fine while
/// `run2/demand/output256.csv` yields 2. Non-ASCII decimal digits are not
/// part of a size token.
pub fn extract_size(path: &Path) -> Result<Size, ScanError> {
    let text = path.to_string_lossy();
    let token = size_pattern()
        .find(&text)
        .ok_or_else(|| ScanError::MissingSizeToken {
            path: path.to_path_buf(),
        })?
        .as_str();

    token.parse().map_err(|_| ScanError::InvalidSizeToken {
        path: path.to_path_buf(),
        token: token.to_string(),
    })
}

/// A result file together with the size it was measured at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// Size extracted from the full path.
    pub size: Size,
}

/// Scanner over a results root laid out as `<root>/<group>/<file>`.
#[derive(Debug, Clone)]
pub struct ResultScanner {
    results_root: PathBuf,
}

impl ResultScanner {
    /// Create a new scanner.
    pub fn new(results_root: PathBuf) -> Self {
        Self { results_root }
    }

    /// Directory holding a group's result files.
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.results_root.join(group)
    }

    /// List the regular files directly inside a group directory, sorted by name.
    ///
    /// Subdirectories are skipped. An empty directory yields an empty list;
    /// a missing one is an error. The size token is searched in the full
    /// path, results root included (see [`extract_size`]).
    pub fn group_files(&self, group: &str) -> Result<Vec<ResultFile>, ScanError> {
        let dir = self.group_dir(group);

        if !dir.is_dir() {
            return Err(ScanError::GroupDirectoryMissing {
                group: group.to_string(),
                path: dir,
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                let path = entry.into_path();
                let size = extract_size(&path)?;
                files.push(ResultFile { path, size });
            } else {
                debug!("Skipping non-file entry: {}", entry.path().display());
            }
        }

        debug!("Group '{}': {} result files", group, files.len());
        Ok(files)
    }
}

/// Temporary directory whose path holds no digits, so that sizes of the
/// result files created inside it come from their own names.
#[cfg(test)]
pub(crate) fn digit_free_temp_dir() -> tempfile::TempDir {
    let bases = [std::env::temp_dir(), PathBuf::from(".")];
    for base in &bases {
        for _ in 0..200 {
            let dir = tempfile::Builder::new()
                .prefix("benchplot-")
                .tempdir_in(base)
                .unwrap();
            if !dir.path().to_string_lossy().bytes().any(|b| b.is_ascii_digit()) {
                return dir;
            }
        }
    }
    panic!("no digit-free temporary directory available");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extract_size_from_file_name() {
        let size = extract_size(Path::new("./results/demand/output256.csv")).unwrap();
        assert_eq!(size, 256);
    }

    #[test]
    fn test_extract_size_ignores_surrounding_text() {
        assert_eq!(extract_size(Path::new("results/pre/run_256_v3.csv")).unwrap(), 256);
        assert_eq!(extract_size(Path::new("results/pre_sort/256")).unwrap(), 256);
        assert_eq!(extract_size(Path::new("x-0064-y.txt")).unwrap(), 64);
    }

    #[test]
    fn test_extract_size_takes_first_digit_run() {
        // Documented precondition: earlier digits win.
        let size = extract_size(Path::new("run2/demand/output256.csv")).unwrap();
        assert_eq!(size, 2);
    }

    #[test]
    fn test_extract_size_missing_token() {
        let err = extract_size(Path::new("results/demand/output.csv")).unwrap_err();
        assert!(matches!(err, ScanError::MissingSizeToken { .. }));
    }

    #[test]
    fn test_extract_size_overflow() {
        let err = extract_size(Path::new("results/demand/output99999999999.csv")).unwrap_err();
        assert!(matches!(err, ScanError::InvalidSizeToken { .. }));
    }

    #[test]
    fn test_group_files_sorted_and_files_only() {
        let temp = digit_free_temp_dir();
        let group = temp.path().join("demand");
        fs::create_dir_all(group.join("nested")).unwrap();
        fs::write(group.join("output512.csv"), "a,b\n1,2\n").unwrap();
        fs::write(group.join("output128.csv"), "a,b\n1,2\n").unwrap();
        fs::write(group.join("nested").join("output64.csv"), "a,b\n1,2\n").unwrap();

        let scanner = ResultScanner::new(temp.path().to_path_buf());
        let files = scanner.group_files("demand").unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["output128.csv", "output512.csv"]);
        let sizes: Vec<_> = files.iter().map(|f| f.size).collect();
        assert_eq!(sizes, vec![128, 512]);
    }

    #[test]
    fn test_group_files_digits_in_root_come_first() {
        let temp = digit_free_temp_dir();
        let root = temp.path().join("run2").join("results");
        fs::create_dir_all(root.join("pre")).unwrap();
        fs::write(root.join("pre").join("output256.csv"), "a,b\n1,2\n").unwrap();

        let scanner = ResultScanner::new(root);
        let files = scanner.group_files("pre").unwrap();
        assert_eq!(files[0].size, 2);
    }

    #[test]
    fn test_group_files_missing_size_token() {
        let temp = digit_free_temp_dir();
        fs::create_dir(temp.path().join("demand")).unwrap();
        fs::write(temp.path().join("demand").join("notes.txt"), "a,b\n").unwrap();

        let scanner = ResultScanner::new(temp.path().to_path_buf());
        let err = scanner.group_files("demand").unwrap_err();
        assert!(matches!(err, ScanError::MissingSizeToken { .. }));
    }

    #[test]
    fn test_group_files_empty_directory() {
        let temp = digit_free_temp_dir();
        fs::create_dir(temp.path().join("pre")).unwrap();

        let scanner = ResultScanner::new(temp.path().to_path_buf());
        assert!(scanner.group_files("pre").unwrap().is_empty());
    }

    #[test]
    fn test_group_files_missing_directory() {
        let temp = digit_free_temp_dir();
        let scanner = ResultScanner::new(temp.path().to_path_buf());

        let err = scanner.group_files("pre_sort").unwrap_err();
        assert!(matches!(err, ScanError::GroupDirectoryMissing { .. }));
    }
}
