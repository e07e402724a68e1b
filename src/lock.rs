//! Marker-file lock held while one file is being processed.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// An exclusive per-source-file lock, implemented as a sibling `.lock`
/// marker created with `create_new`. Released on drop.
pub struct SourceLock {
    marker: PathBuf,
}

impl SourceLock {
    /// Acquires the lock for `source`, polling until the marker can be
    /// created. Only a failure other than the marker already existing is
    /// an error.
    pub async fn acquire(source: &Path) -> io::Result<Self> {
        let mut marker = source.as_os_str().to_owned();
        marker.push(".lock");
        let marker = PathBuf::from(marker);

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&marker) {
                Ok(_) => return Ok(Self { marker }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for SourceLock {
    fn drop(&mut self) {
        // Best effort; a leftover marker only delays the next holder.
        let _ = std::fs::remove_file(&self.marker);
    }
}
