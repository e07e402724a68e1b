//! Persistent place cache keyed by grid-snapped coordinates.

use super::{GeoPlace, GeocodeError};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Degrees of latitude per kilometer is roughly constant; longitude
/// shrinks with the cosine of the latitude.
const KM_PER_DEGREE: f64 = 111.0;

/// Snaps coordinates to the center of their cache cell and renders the
/// cell as a fixed-precision key.
///
/// The cell is a square of `accuracy_km2` square kilometers, so every
/// coordinate pair inside one cell maps to the same key. Keys use six
/// decimal places to stay byte-identical across runs.
pub fn grid_key(lat: f64, lon: f64, accuracy_km2: f64) -> String {
    let side_km = accuracy_km2.sqrt();
    let step_lat = side_km / KM_PER_DEGREE;
    let step_lon = side_km / (KM_PER_DEGREE * lat.to_radians().cos());
    let snapped_lat = (lat / step_lat).round() * step_lat;
    let snapped_lon = (lon / step_lon).round() * step_lon;
    format!("{snapped_lat:.6},{snapped_lon:.6}")
}

/// A JSON-file-backed map from grid cell to resolved place.
///
/// Writes are deferred: [`GeoCache::save_if_dirty`] only touches the disk
/// when an entry was inserted since the last flush.
pub struct GeoCache {
    path: PathBuf,
    accuracy_km2: f64,
    entries: HashMap<String, GeoPlace>,
    dirty: bool,
}

impl GeoCache {
    /// Loads the cache file, creating its parent directory if needed.
    ///
    /// A missing file yields an empty cache; an unreadable or corrupt file
    /// is an error so a typo'd path never silently discards history.
    pub fn load(path: PathBuf, accuracy_km2: f64) -> Result<Self, GeocodeError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text).map_err(|source| GeocodeError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            accuracy_km2,
            entries,
            dirty: false,
        })
    }

    /// The cache key for these coordinates at this cache's accuracy.
    pub fn key(&self, lat: f64, lon: f64) -> String {
        grid_key(lat, lon, self.accuracy_km2)
    }

    pub fn get(&self, key: &str) -> Option<&GeoPlace> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, place: GeoPlace) {
        self.entries.insert(key, place);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the cache back to disk if any entry was added since the last
    /// flush. A clean cache is a no-op.
    pub fn save_if_dirty(&mut self) -> Result<(), GeocodeError> {
        if !self.dirty {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|source| GeocodeError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, text)?;
        self.dirty = false;
        Ok(())
    }
}
