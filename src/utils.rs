use crate::config::OrganizerConfig;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively lists the media files under `root`, filtered by the
/// configured extensions and sorted lexicographically so runs are
/// deterministic regardless of directory-walk order.
pub fn list_media_files(
    root: &Path,
    config: &OrganizerConfig,
) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry_result| match entry_result {
            Ok(entry) => {
                if entry.file_type().is_file() && config.matches_extension(entry.path()) {
                    Some(Ok(entry.path().to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}
