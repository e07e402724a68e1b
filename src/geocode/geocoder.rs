use super::{GeoCache, GeoPlace, GeocodeError, PlaceLookup};
use log::{debug, error};

/// Resolves coordinates to places, consulting the cache first and falling
/// back to the external lookup on a miss.
pub struct ReverseGeocoder<L: PlaceLookup> {
    cache: GeoCache,
    lookup: L,
}

impl<L: PlaceLookup> ReverseGeocoder<L> {
    pub fn new(cache: GeoCache, lookup: L) -> Self {
        Self { cache, lookup }
    }

    /// Resolves a coordinate pair to a place.
    ///
    /// Out-of-range coordinates are rejected before touching the cache or
    /// the network. A lookup fault yields `None` and caches nothing, so
    /// the next file in the same cell retries.
    pub async fn resolve(&mut self, lat: f64, lon: f64) -> Option<GeoPlace> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            error!("Coordinates out of range: [{lat}, {lon}]");
            return None;
        }

        let key = self.cache.key(lat, lon);
        if let Some(place) = self.cache.get(&key) {
            debug!("Geocode cache hit for [{lat}, {lon}]");
            return Some(place.clone());
        }

        debug!("Geocode cache miss for [{lat}, {lon}]");
        let place = self.lookup.lookup(lat, lon).await?;
        self.cache.insert(key, place.clone());
        Some(place)
    }

    /// Flushes newly cached entries to disk; a no-op when nothing changed.
    pub fn persist(&mut self) -> Result<(), GeocodeError> {
        self.cache.save_if_dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeLookup {
        calls: usize,
        place: Option<GeoPlace>,
    }

    impl FakeLookup {
        fn returning(settlement: &str, country: &str) -> Self {
            let mut address = HashMap::new();
            address.insert("city".to_string(), settlement.to_string());
            address.insert("country".to_string(), country.to_string());
            Self {
                calls: 0,
                place: Some(GeoPlace {
                    place_id: Some(7),
                    lat: None,
                    lon: None,
                    display_name: None,
                    address,
                }),
            }
        }

        fn failing() -> Self {
            Self {
                calls: 0,
                place: None,
            }
        }
    }

    impl PlaceLookup for FakeLookup {
        async fn lookup(&mut self, _lat: f64, _lon: f64) -> Option<GeoPlace> {
            self.calls += 1;
            self.place.clone()
        }
    }

    fn empty_cache() -> (tempfile::TempDir, GeoCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = GeoCache::load(dir.path().join("geodata.json"), 4.0).unwrap();
        (dir, cache)
    }

    #[tokio::test]
    async fn same_cell_is_looked_up_at_most_once() {
        let (_dir, cache) = empty_cache();
        let mut geocoder = ReverseGeocoder::new(cache, FakeLookup::returning("Paris", "France"));

        let first = geocoder.resolve(48.8566, 2.3522).await.unwrap();
        let second = geocoder.resolve(48.8570, 2.3530).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(geocoder.lookup.calls, 1);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_never_reach_the_lookup() {
        let (_dir, cache) = empty_cache();
        let mut geocoder = ReverseGeocoder::new(cache, FakeLookup::returning("Paris", "France"));

        assert!(geocoder.resolve(90.5, 2.3522).await.is_none());
        assert!(geocoder.resolve(48.8566, -180.1).await.is_none());
        assert_eq!(geocoder.lookup.calls, 0);
    }

    #[tokio::test]
    async fn lookup_fault_is_not_cached() {
        let (_dir, cache) = empty_cache();
        let mut geocoder = ReverseGeocoder::new(cache, FakeLookup::failing());

        assert!(geocoder.resolve(48.8566, 2.3522).await.is_none());
        assert!(geocoder.resolve(48.8566, 2.3522).await.is_none());
        // No negative caching: every attempt goes back to the lookup.
        assert_eq!(geocoder.lookup.calls, 2);
    }

    #[tokio::test]
    async fn resolved_places_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geodata.json");

        let cache = GeoCache::load(path.clone(), 4.0).unwrap();
        let mut geocoder = ReverseGeocoder::new(cache, FakeLookup::returning("Paris", "France"));
        geocoder.resolve(48.8566, 2.3522).await.unwrap();
        geocoder.persist().unwrap();

        let cache = GeoCache::load(path, 4.0).unwrap();
        let mut geocoder = ReverseGeocoder::new(cache, FakeLookup::failing());
        let place = geocoder.resolve(48.8566, 2.3522).await.unwrap();
        assert_eq!(place.settlement(), Some("Paris"));
        assert_eq!(geocoder.lookup.calls, 0);
    }
}
