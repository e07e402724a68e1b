use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or persisting the on-disk geocode cache.
///
/// Lookup faults never surface here; the service path degrades to `None`
/// instead of erroring.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Failed to read or write the geocode cache")]
    Io(#[from] std::io::Error),

    #[error("Geocode cache at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}
