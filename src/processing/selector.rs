//! Selection of the files a cycle works on.

use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use crate::core::CandidateFile;
use crate::utils::{list_images, modified_at};

/// One entry of a directory scan.
#[derive(Debug)]
pub enum ScanEntry {
    Candidate(CandidateFile),
    /// The file was found but its metadata could not be read
    Unreadable { path: PathBuf, error: std::io::Error },
}

#[derive(Debug, Clone)]
pub struct FileSelector {
    root: PathBuf,
    exclude: Option<PathBuf>,
}

impl FileSelector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), exclude: None }
    }

    /// Prunes `dir` from the scan when it lies inside the root.
    pub fn excluding(mut self, dir: &Path) -> Self {
        if dir != self.root && dir.starts_with(&self.root) {
            self.exclude = Some(dir.to_path_buf());
        }
        self
    }

    /// Lazily scans the root in enumeration order.
    pub fn scan(&self) -> impl Iterator<Item = ScanEntry> + '_ {
        list_images(&self.root, self.exclude.as_deref()).map(move |path| {
            match modified_at(&path) {
                Ok(modified_at) => {
                    let relative = path
                        .strip_prefix(&self.root)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|_| path.clone());
                    ScanEntry::Candidate(CandidateFile { path, relative, modified_at })
                }
                Err(error) => ScanEntry::Unreadable { path, error },
            }
        })
    }
}

/// Strictly newer than the baseline. A file modified exactly at the
/// baseline has already been seen.
pub fn is_newer(candidate: &CandidateFile, since: DateTime<Utc>) -> bool {
    candidate.modified_at > since
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::testing::write_image;
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    #[test]
    fn strict_greater_than() {
        let since = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let candidate = |modified_at| CandidateFile {
            path: PathBuf::from("/a.jpg"),
            relative: PathBuf::from("a.jpg"),
            modified_at,
        };

        assert!(!is_newer(&candidate(since), since));
        assert!(is_newer(&candidate(since + Duration::milliseconds(1)), since));
        assert!(!is_newer(&candidate(since - Duration::seconds(1)), since));
    }

    #[test]
    fn scan_reports_relative_paths_and_mtimes() {
        let dir = tempdir().unwrap();
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        write_image(&dir.path().join("sub/a.jpg"), 10, t);
        write_image(&dir.path().join("b.png"), 10, t + Duration::seconds(5));

        let selector = FileSelector::new(dir.path());
        let candidates: Vec<_> = selector
            .scan()
            .map(|entry| match entry {
                ScanEntry::Candidate(c) => c,
                ScanEntry::Unreadable { path, error } => panic!("{}: {error}", path.display()),
            })
            .collect();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].relative, PathBuf::from("b.png"));
        assert_eq!(candidates[0].modified_at, t + Duration::seconds(5));
        assert_eq!(candidates[1].relative, PathBuf::from("sub/a.jpg"));
        assert_eq!(candidates[1].modified_at, t);
    }

    #[test]
    fn nested_output_dir_is_not_scanned() {
        let dir = tempdir().unwrap();
        let t = Utc::now();
        write_image(&dir.path().join("a.jpg"), 10, t);
        write_image(&dir.path().join("out/a.jpg"), 10, t);

        let selector = FileSelector::new(dir.path()).excluding(&dir.path().join("out"));
        assert_eq!(selector.scan().count(), 1);
    }
}
