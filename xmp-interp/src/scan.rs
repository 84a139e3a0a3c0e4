//! Sidecar sequence discovery
//!
//! Lists one directory (no recursion), keeps regular files whose name
//! contains the file marker, and sorts the names lexicographically. The
//! sorted order is the order of the ramp.

use std::path::Path;
use tracing::{debug, warn};
use xmp_interp_common::{Error, Result};

/// Sidecar sequence scanner
#[derive(Debug, Clone)]
pub struct SequenceScanner {
    marker: String,
}

impl SequenceScanner {
    /// Create a scanner matching names that contain `marker` (e.g. `.xmp`)
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// List the sequence in `dir`, sorted by file name
    pub fn scan(&self, dir: &Path) -> Result<Vec<String>> {
        if !dir.is_dir() {
            if dir.exists() {
                return Err(Error::NotADirectory(dir.to_path_buf()));
            }
            return Err(Error::io_at(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
            ));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| Error::io_at(dir, e))? {
            let entry = entry.map_err(|e| Error::io_at(dir, e))?;

            let Ok(name) = entry.file_name().into_string() else {
                warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
                continue;
            };

            if !name.contains(&self.marker) {
                continue;
            }

            // Follows symlinks, so linked sidecars are included
            if !entry.path().is_file() {
                debug!("Skipping {} (not a regular file)", name);
                continue;
            }

            names.push(name);
        }

        names.sort();

        debug!("Found {} files matching {:?} in {}", names.len(), self.marker, dir.display());
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["IMG_0010.xmp", "IMG_0002.xmp", "IMG_0002.CR2", "notes.txt", "IMG_0001.xmp"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("folder.xmp")).unwrap();

        let names = SequenceScanner::new(".xmp").scan(dir.path()).unwrap();
        assert_eq!(names, vec!["IMG_0001.xmp", "IMG_0002.xmp", "IMG_0010.xmp"]);
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.XMP"), "").unwrap();
        fs::write(dir.path().join("b.xmp"), "").unwrap();

        let names = SequenceScanner::new(".xmp").scan(dir.path()).unwrap();
        assert_eq!(names, vec!["b.xmp"]);
    }

    #[test]
    fn test_lexicographic_not_numeric() {
        let dir = TempDir::new().unwrap();
        for name in ["10.xmp", "9.xmp", "100.xmp"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let names = SequenceScanner::new(".xmp").scan(dir.path()).unwrap();
        assert_eq!(names, vec!["10.xmp", "100.xmp", "9.xmp"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = SequenceScanner::new(".xmp").scan(&dir.path().join("absent"));
        assert!(matches!(result, Err(Error::IoAt { .. })));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.xmp");
        fs::write(&file, "").unwrap();

        let result = SequenceScanner::new(".xmp").scan(&file);
        assert!(matches!(result, Err(Error::NotADirectory(_))));
    }
}
