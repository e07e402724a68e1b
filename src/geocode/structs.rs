use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Address keys that qualify as a settlement name, in preference order.
const SETTLEMENT_KEYS: [&str; 4] = ["city", "town", "village", "county"];

/// A resolved place, as returned by the reverse-geocoding service.
///
/// Unknown response fields are ignored; a response missing any of the
/// optional fields still produces a storable record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeoPlace {
    #[serde(default)]
    pub place_id: Option<i64>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: HashMap<String, String>,
}

impl GeoPlace {
    /// The first present of city/town/village/county.
    pub fn settlement(&self) -> Option<&str> {
        SETTLEMENT_KEYS
            .iter()
            .find_map(|key| self.address.get(*key))
            .map(String::as_str)
    }

    pub fn country(&self) -> Option<&str> {
        self.address.get("country").map(String::as_str)
    }
}
