//! Runs the organize pipeline end to end: scan, per-file resolution,
//! collision handling, and the copy or move into the destination tree.

use crate::config::OrganizerConfig;
use crate::error::OrganizerError;
use crate::geocode::{GeoPlace, PlaceLookup, ReverseGeocoder};
use crate::gps::normalize_coordinate;
use crate::lock::SourceLock;
use crate::metadata::{MetadataError, MetadataRecord, MetadataSource};
use crate::pathgen::{build_destination, extract_discriminator};
use crate::time::normalize_datetime;
use crate::utils::list_media_files;
use bon::bon;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The geocode cache is flushed after this many files, so a crash
/// mid-run loses little lookup work.
const CACHE_FLUSH_INTERVAL: usize = 25;

/// Failure of a single file. These are collected into the run summary and
/// never abort the run.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("Unrecognized date value: {0:?}")]
    UnparseableDate(String),

    #[error("Sanitization left no usable destination filename")]
    PathGeneration,

    #[error("Destination {0} is already occupied by an unknown file")]
    DuplicateDestination(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// What happened to one file.
#[derive(Debug, PartialEq, Eq)]
pub enum FileOutcome {
    Organized { destination: PathBuf },
    /// The file disappeared between listing and processing.
    Skipped,
}

/// Counts and per-file failures for one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failures: Vec<(PathBuf, String)>,
}

/// The per-run orchestrator.
///
/// The index maps every resolved destination back to its source, so a
/// collision can distinguish "same file again" from "a different file
/// wants this name".
pub struct Organizer<L: PlaceLookup> {
    config: OrganizerConfig,
    metadata: Box<dyn MetadataSource>,
    geocoder: ReverseGeocoder<L>,
    index: HashMap<PathBuf, PathBuf>,
}

#[bon]
impl<L: PlaceLookup> Organizer<L> {
    #[builder]
    pub fn new(
        config: OrganizerConfig,
        metadata: Box<dyn MetadataSource>,
        geocoder: ReverseGeocoder<L>,
    ) -> Self {
        Self {
            config,
            metadata,
            geocoder,
            index: HashMap::new(),
        }
    }

    /// Organizes every media file under the source root.
    ///
    /// Per-file failures are recorded in the summary; only precondition
    /// and infrastructure faults abort the run.
    pub async fn run(&mut self) -> Result<RunSummary, OrganizerError> {
        self.check_preconditions()?;

        let source_root = self.config.source_root.clone();
        let files = list_media_files(&source_root, &self.config)?;
        info!(
            "Organizing {} files from {} into {}",
            files.len(),
            self.config.source_root.display(),
            self.config.destination_root.display()
        );

        let mut summary = RunSummary::default();
        for (i, file) in files.iter().enumerate() {
            match self.process_file(file).await {
                Ok(FileOutcome::Organized { destination }) => {
                    debug!("{} -> {}", file.display(), destination.display());
                    summary.processed += 1;
                }
                Ok(FileOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    error!("Failed to process {}: {e}", file.display());
                    summary.failures.push((file.clone(), e.to_string()));
                }
            }
            if (i + 1) % CACHE_FLUSH_INTERVAL == 0 {
                if let Err(e) = self.geocoder.persist() {
                    warn!("Could not flush the geocode cache: {e}");
                }
            }
        }
        self.geocoder.persist()?;

        info!(
            "Done: {} organized, {} skipped, {} failed",
            summary.processed,
            summary.skipped,
            summary.failures.len()
        );
        Ok(summary)
    }

    fn check_preconditions(&self) -> Result<(), OrganizerError> {
        let source = &self.config.source_root;
        if !source.exists() {
            return Err(OrganizerError::SourceMissing(source.clone()));
        }
        if !source.is_dir() {
            return Err(OrganizerError::SourceNotADirectory(source.clone()));
        }
        let destination = &self.config.destination_root;
        if destination.exists() && fs::read_dir(destination)?.next().is_some() {
            return Err(OrganizerError::DestinationNotEmpty(destination.clone()));
        }
        Ok(())
    }

    async fn process_file(&mut self, source: &Path) -> Result<FileOutcome, ProcessError> {
        // Held only for the metadata read, so an external writer is never
        // read mid-write.
        let record = {
            let _lock = SourceLock::acquire(source).await?;
            if !source.exists() {
                return Ok(FileOutcome::Skipped);
            }
            self.metadata.read(source)?
        };
        let raw_date = record.effective_date()?.to_string();
        let date =
            normalize_datetime(&raw_date).ok_or(ProcessError::UnparseableDate(raw_date))?;
        let camera = record.camera_model()?.map(str::to_string);

        let place = if self.config.offline {
            None
        } else {
            self.resolve_place(&record).await
        };

        // Collision loop: bump the discriminator until the name is free or
        // already ours.
        let mut discriminator = None;
        let destination = loop {
            let relative =
                build_destination(source, &date, place.as_ref(), camera.as_deref(), discriminator)
                    .ok_or(ProcessError::PathGeneration)?;
            let candidate = self.config.destination_root.join(relative);
            match self.index.get(&candidate) {
                Some(claimant) if claimant == source => break candidate,
                Some(_) => {
                    let stem = candidate
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or_default();
                    discriminator = Some(extract_discriminator(stem).map_or(1, |n| n + 1));
                }
                None if candidate.exists() => {
                    // On disk but claimed by nobody this run; something
                    // outside the run owns it.
                    return Err(ProcessError::DuplicateDestination(candidate));
                }
                None => break candidate,
            }
        };

        if self.config.dry_run {
            info!("[dry-run] {} -> {}", source.display(), destination.display());
            self.index.insert(destination.clone(), source.to_path_buf());
            return Ok(FileOutcome::Organized { destination });
        }

        let _lock = SourceLock::acquire(source).await?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.config.move_files {
            move_file(source, &destination)?;
        } else {
            fs::copy(source, &destination)?;
        }
        self.index.insert(destination.clone(), source.to_path_buf());
        Ok(FileOutcome::Organized { destination })
    }

    async fn resolve_place(&mut self, record: &MetadataRecord) -> Option<GeoPlace> {
        let gps = record.gps()?;
        let lat = normalize_coordinate(
            gps.get("GPSLatitude")?,
            gps.get("GPSLatitudeRef").map(String::as_str),
        )?;
        let lon = normalize_coordinate(
            gps.get("GPSLongitude")?,
            gps.get("GPSLongitudeRef").map(String::as_str),
        )?;
        self.geocoder.resolve(lat, lon).await
    }
}

/// Renames when possible, falling back to copy-and-remove across
/// filesystem boundaries.
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}
