//! Sequence driver
//!
//! A run has two phases:
//! 1. **Staging** - list the sequence, read every file, build the ramp from
//!    the first and last file, and compute every patched output in memory.
//!    Read and parse failures stop the run here, before anything is written.
//! 2. **Apply** - create the backup folder, then for each file in order write
//!    its backup (first time only) and overwrite it with the patched text.
//!
//! Files are handled strictly one at a time in sorted order.

use crate::backup::BackupStore;
use crate::ramp::{progress, Ramp};
use crate::scan::SequenceScanner;
use crate::sidecar::{extract_fields, patch_text, FieldMatcher, ValueMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xmp_interp_common::{format_value, Error, Result, Settings};

/// Fewest files that make up a ramp (two endpoints and one file between)
pub const MIN_SEQUENCE_LEN: usize = 3;

/// Options for a single run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stage and log the result without touching the filesystem
    pub dry_run: bool,
}

/// One file of a staged run
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub progress: f64,
    pub values: ValueMap,
    pub original: String,
    pub patched: String,
}

/// A fully computed run, ready to be written
#[derive(Debug, Clone)]
pub struct StagedRun {
    pub fields: Vec<String>,
    pub files: Vec<StagedFile>,
}

/// Counts reported after an applied (or dry) run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub fields: Vec<String>,
    pub files_processed: usize,
    pub files_written: usize,
    pub backups_written: usize,
    pub dry_run: bool,
}

/// What a run ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Fewer than [`MIN_SEQUENCE_LEN`] matching files; nothing touched
    NotEnoughFiles { found: usize },
    /// The endpoints agree on every allow-listed field; nothing touched
    ///
    /// Unlike a completed run, no backup folder is created and no file is
    /// backed up or rewritten, even though rewriting would leave every file
    /// with the same content.
    NothingToInterpolate { files: usize },
    /// The ramp was applied (or staged only, for a dry run)
    Completed(RunSummary),
}

/// Interpolation driver for one directory
#[derive(Debug)]
pub struct RampDriver {
    dir: PathBuf,
    settings: Settings,
    matcher: FieldMatcher,
    scanner: SequenceScanner,
}

impl RampDriver {
    /// Create a driver for `dir` using `settings`
    pub fn new(dir: impl Into<PathBuf>, settings: Settings) -> Result<Self> {
        settings.validate()?;
        let matcher = FieldMatcher::new(&settings.fields)?;
        let scanner = SequenceScanner::new(settings.file_marker.clone());

        Ok(Self {
            dir: dir.into(),
            settings,
            matcher,
            scanner,
        })
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backup folder of the target directory
    pub fn backup_store(&self) -> BackupStore {
        BackupStore::new(&self.dir, &self.settings.backup_dir)
    }

    /// Stage and, unless `options.dry_run`, apply the ramp
    pub fn run(&self, options: RunOptions) -> Result<RunOutcome> {
        let names = self.scanner.scan(&self.dir)?;

        if names.len() < MIN_SEQUENCE_LEN {
            info!(
                "Not enough {} files found in \"{}\" ({} found, {} needed)",
                self.settings.file_marker,
                self.dir.display(),
                names.len(),
                MIN_SEQUENCE_LEN
            );
            return Ok(RunOutcome::NotEnoughFiles { found: names.len() });
        }

        let staged = self.stage(&names)?;

        if staged.fields.is_empty() {
            info!(
                "First and last file agree on every field, nothing to interpolate across {} files",
                staged.files.len()
            );
            return Ok(RunOutcome::NothingToInterpolate {
                files: staged.files.len(),
            });
        }

        info!(
            "Interpolating {} across {} files",
            staged.fields.join(", "),
            staged.files.len()
        );

        if options.dry_run {
            for file in &staged.files {
                info!("[dry run] {} @ {:.3}: {}", file.name, file.progress, describe(&file.values));
            }
            return Ok(RunOutcome::Completed(RunSummary {
                fields: staged.fields,
                files_processed: staged.files.len(),
                files_written: 0,
                backups_written: 0,
                dry_run: true,
            }));
        }

        self.apply(staged).map(RunOutcome::Completed)
    }

    /// Read the sequence and compute every output without writing
    pub fn stage(&self, names: &[String]) -> Result<StagedRun> {
        let mut contents = Vec::with_capacity(names.len());
        for name in names {
            let path = self.dir.join(name);
            let text = std::fs::read_to_string(&path).map_err(|e| Error::io_at(&path, e))?;
            contents.push((name.clone(), text));
        }

        // Every file is parsed so a malformed value anywhere stops the run
        let mut mappings = Vec::with_capacity(contents.len());
        for (name, text) in &contents {
            mappings.push(extract_fields(&self.matcher, text, &self.dir.join(name))?);
        }

        let (Some(first), Some(last)) = (mappings.first(), mappings.last()) else {
            return Ok(StagedRun {
                fields: Vec::new(),
                files: Vec::new(),
            });
        };

        let ramp = Ramp::between(first, last);
        let len = contents.len();

        let files = contents
            .into_iter()
            .enumerate()
            .map(|(index, (name, original))| {
                let progress = progress(index, len);
                let values = ramp.at(progress);
                let patched = patch_text(&self.matcher, &original, &values);
                debug!("Staged {} at progress {:.3}", name, progress);
                StagedFile {
                    name,
                    progress,
                    values,
                    original,
                    patched,
                }
            })
            .collect();

        Ok(StagedRun {
            fields: ramp.fields(),
            files,
        })
    }

    /// Back up and overwrite every staged file, in order
    pub fn apply(&self, staged: StagedRun) -> Result<RunSummary> {
        let store = self.backup_store();
        store.ensure_dir()?;

        let mut backups_written = 0;
        let mut files_written = 0;

        for file in &staged.files {
            if store.backup_once(&file.name, file.original.as_bytes())? {
                info!("Backing up \"{}\"", file.name);
                backups_written += 1;
            }

            info!("Writing new settings to \"{}\"", file.name);
            let path = self.dir.join(&file.name);
            std::fs::write(&path, &file.patched).map_err(|e| Error::io_at(&path, e))?;
            files_written += 1;
        }

        Ok(RunSummary {
            fields: staged.fields,
            files_processed: staged.files.len(),
            files_written,
            backups_written,
            dry_run: false,
        })
    }
}

fn describe(values: &ValueMap) -> String {
    values
        .iter()
        .map(|(field, value)| format!("{}={}", field, format_value(*value)))
        .collect::<Vec<_>>()
        .join(" ")
}
