//! Builds the chronological destination path for a media file from its
//! normalized date, optional place, and optional camera model.

use crate::geocode::GeoPlace;
use chrono::{DateTime, Datelike, Local};
use log::warn;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Characters stripped from every generated path segment.
const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

static DISCRIMINATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\d+)$").unwrap());

/// Makes a string safe for use as a single path segment: forbidden
/// filesystem characters are removed and spaces become underscores.
pub fn sanitize_segment(raw: &str) -> String {
    raw.chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Extracts the numeric duplicate discriminator from a file stem, if the
/// stem ends in `.N`.
pub fn extract_discriminator(stem: &str) -> Option<u32> {
    DISCRIMINATOR_RE
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Builds the destination path, relative to the destination root.
///
/// Layout is `{year}/{MM}-{year}` with an extra
/// `{MM}-{year}-{settlement}_{country}` level when the place names both a
/// settlement and a country. The filename is the timestamp, then the
/// location, camera, and discriminator parts that apply, keeping the
/// source extension's original case.
///
/// Returns `None` only when sanitization leaves an empty filename.
pub fn build_destination(
    source: &Path,
    date: &DateTime<Local>,
    place: Option<&GeoPlace>,
    camera: Option<&str>,
    discriminator: Option<u32>,
) -> Option<PathBuf> {
    let year = date.year();
    let month = format!("{:02}", date.month());

    let location = place.and_then(|place| match (place.settlement(), place.country()) {
        (Some(settlement), Some(country)) => Some((
            sanitize_segment(settlement),
            sanitize_segment(country),
        )),
        _ => {
            warn!(
                "Place for {} has no settlement/country pair, omitting location",
                source.display()
            );
            None
        }
    });

    let mut dir = PathBuf::from(year.to_string());
    dir.push(format!("{month}-{year}"));
    if let Some((settlement, country)) = &location {
        dir.push(format!("{month}-{year}-{settlement}_{country}"));
    }

    let mut stem = date.format("%Y-%m-%d_T%H-%M-%S").to_string();
    if let Some((settlement, country)) = &location {
        stem.push_str(&format!("_{settlement}_{country}"));
    }
    if let Some(camera) = camera {
        let camera = sanitize_segment(camera);
        if !camera.is_empty() {
            stem.push_str(&format!("_{camera}"));
        }
    }
    if let Some(n) = discriminator {
        stem.push_str(&format!(".{n}"));
    }

    let extension = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let filename = sanitize_segment(&format!("{stem}{extension}"));
    if filename.is_empty() || filename == extension {
        return None;
    }

    Some(dir.join(filename))
}
