//! Write-once backups of original sidecars
//!
//! The first time a sidecar is rewritten its original content is copied into
//! the backup folder. An existing backup is never replaced, so the folder
//! always holds the content from before the first run.
//!
//! Backups are written to a temporary file inside the backup folder and only
//! moved to their final name once complete, so a failed write never leaves a
//! partial file where a backup is expected.

use std::fs::File;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use xmp_interp_common::{Error, Result};

/// Backup folder under a target directory
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    /// Backup folder `name` inside `target_dir`
    pub fn new(target_dir: &Path, name: &str) -> Self {
        Self {
            dir: target_dir.join(name),
        }
    }

    /// Backup folder path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backup path for a sidecar file name
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Create the backup folder if it does not exist yet
    ///
    /// Only "already exists" is tolerated, and only when the existing entry
    /// is a directory.
    pub fn ensure_dir(&self) -> Result<()> {
        match std::fs::create_dir(&self.dir) {
            Ok(()) => {
                debug!("Created backup folder {}", self.dir.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if self.dir.is_dir() {
                    Ok(())
                } else {
                    Err(Error::NotADirectory(self.dir.clone()))
                }
            }
            Err(e) => Err(Error::io_at(&self.dir, e)),
        }
    }

    /// Store `content` as the backup of `file_name` unless one exists
    ///
    /// Returns `true` when a backup was written, `false` when one was
    /// already there.
    pub fn backup_once(&self, file_name: &str, content: &[u8]) -> Result<bool> {
        self.backup_with(file_name, |file| file.write_all(content))
    }

    /// Store a backup of `file_name` produced by `fill` unless one exists
    ///
    /// `fill` writes into a temporary file in the backup folder. The backup
    /// path only appears once `fill` succeeded and the data is synced; on any
    /// failure the temporary file is removed and nothing is left behind.
    fn backup_with<F>(&self, file_name: &str, fill: F) -> Result<bool>
    where
        F: FnOnce(&mut File) -> io::Result<()>,
    {
        let path = self.path_for(file_name);
        if path.exists() {
            debug!("Backup of {} already exists", file_name);
            return Ok(false);
        }

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(|e| Error::io_at(&self.dir, e))?;

        if let Err(e) = fill(temp.as_file_mut()).and_then(|_| temp.as_file().sync_all()) {
            warn!("Backup of {} failed, discarding partial copy", file_name);
            return Err(Error::io_at(&path, e));
        }

        match temp.persist_noclobber(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                debug!("Backup of {} already exists", file_name);
                Ok(false)
            }
            Err(e) => Err(Error::io_at(&path, e.error)),
        }
    }
}
