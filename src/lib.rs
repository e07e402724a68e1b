//! # Media Organizer
//!
//! Sort photo and video collections into a chronological folder tree.
//!
//! Each file's capture time, GPS position, and camera model are read
//! through `exiftool`, coordinates are reverse geocoded through a
//! persistent cache, and the file is copied or moved into a
//! `{year}/{month}-{year}` layout with an extra location level when the
//! place is known.
//!
//! ## Key Features
//!
//! - **Date resolution**: `DateTimeOriginal` with fallbacks to the modify
//!   date and the filesystem mtime, sentinel values filtered out.
//! - **Reverse geocoding**: Nominatim lookups behind a grid-snapped
//!   on-disk cache, rate limited per the service's usage policy.
//! - **Collision handling**: files resolving to the same name get a
//!   numeric discriminator; unknown files are never overwritten.
//! - **Dry runs**: resolve every destination without touching the disk.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use media_organizer::config::OrganizerConfig;
//! use media_organizer::geocode::{GeoCache, NominatimClient, ReverseGeocoder};
//! use media_organizer::metadata::ExifToolSource;
//! use media_organizer::organizer::Organizer;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OrganizerConfig::new(
//!         PathBuf::from("photos"),
//!         PathBuf::from("organized"),
//!     );
//!     let cache = GeoCache::load(PathBuf::from(".cache/geodata.json"), 4.0)?;
//!     let client = NominatimClient::builder().build()?;
//!
//!     let mut organizer = Organizer::builder()
//!         .config(config)
//!         .metadata(Box::new(ExifToolSource::new()?))
//!         .geocoder(ReverseGeocoder::new(cache, client))
//!         .build();
//!
//!     let summary = organizer.run().await?;
//!     println!("Organized {} files", summary.processed);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod geocode;
pub mod gps;
pub mod lock;
pub mod metadata;
pub mod organizer;
pub mod pathgen;
pub mod time;
pub mod utils;
