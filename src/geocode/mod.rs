//! Resolves coordinates to place records through a persistent,
//! grid-snapped cache backed by a rate-limited Nominatim lookup.

mod cache;
mod client;
mod error;
mod geocoder;
mod structs;

pub use cache::{GeoCache, grid_key};
pub use client::{NominatimClient, PlaceLookup};
pub use error::GeocodeError;
pub use geocoder::ReverseGeocoder;
pub use structs::GeoPlace;
