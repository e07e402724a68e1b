//! Run configuration for the organizer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default image extensions, lowercase with a leading dot.
const DEFAULT_IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];
const DEFAULT_VIDEO_EXTENSIONS: [&str; 1] = [".mp4"];

/// Everything a run needs to know, fixed before the first file is touched.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub image_extensions: HashSet<String>,
    pub video_extensions: HashSet<String>,
    /// Move files into place instead of copying them.
    pub move_files: bool,
    /// Resolve destinations but leave the filesystem untouched.
    pub dry_run: bool,
    /// Skip reverse geocoding entirely.
    pub offline: bool,
}

impl OrganizerConfig {
    pub fn new(source_root: PathBuf, destination_root: PathBuf) -> Self {
        Self {
            source_root,
            destination_root,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            move_files: false,
            dry_run: false,
            offline: false,
        }
    }

    /// Whether this path carries one of the configured media extensions,
    /// compared case-insensitively.
    pub fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
        self.image_extensions.contains(&ext) || self.video_extensions.contains(&ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_is_case_insensitive() {
        let config = OrganizerConfig::new(PathBuf::from("/src"), PathBuf::from("/dst"));
        assert!(config.matches_extension(Path::new("a.jpg")));
        assert!(config.matches_extension(Path::new("a.JPG")));
        assert!(config.matches_extension(Path::new("a.JpEg")));
        assert!(config.matches_extension(Path::new("clip.MP4")));
        assert!(!config.matches_extension(Path::new("a.gif")));
        assert!(!config.matches_extension(Path::new("no_extension")));
    }
}
