use std::path::PathBuf;
use thiserror::Error;

/// Run-level failures that abort an organize run before or between files.
///
/// Per-file failures are reported in the run summary instead; see
/// [`crate::organizer::ProcessError`].
#[derive(Error, Debug)]
pub enum OrganizerError {
    // --- Precondition Errors ---
    #[error("Source directory does not exist: {0}")]
    SourceMissing(PathBuf),

    #[error("Source path is not a directory: {0}")]
    SourceNotADirectory(PathBuf),

    #[error("Destination directory is not empty: {0}")]
    DestinationNotEmpty(PathBuf),

    // --- Infrastructure Errors ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Geocode cache failure: {0}")]
    Geocode(#[from] crate::geocode::GeocodeError),

    #[error("Failed to scan the source tree: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("Exiftool failed to start")]
    Exiftool(#[from] exiftool::ExifToolError),

    #[error("HTTP client initialization failed")]
    Http(#[from] reqwest::Error),
}
