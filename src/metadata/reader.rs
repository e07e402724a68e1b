//! Adapts raw exiftool output into a [`MetadataRecord`].

use super::{MetadataRecord, SENTINEL_DATES};
use chrono::{DateTime, Local};
use exiftool::{ExifTool, ExifToolError};
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Date tags taken from the file's embedded metadata, sentinel-filtered.
const DATE_TAGS: [&str; 3] = ["DateTimeOriginal", "CreateDate", "ModifyDate"];

/// GPS tags collected into the nested GPS sub-record.
const GPS_TAGS: [&str; 4] = [
    "GPSLatitude",
    "GPSLongitude",
    "GPSLatitudeRef",
    "GPSLongitudeRef",
];

/// The metadata-reader seam of the pipeline.
///
/// Implementations must not fail for malformed media files (those yield a
/// record with only the file modification date); only literally
/// inaccessible files produce an error.
pub trait MetadataSource {
    fn read(&mut self, path: &Path) -> io::Result<MetadataRecord>;
}

/// Reads metadata through a long-lived `exiftool` process, requesting
/// numeric output (`-n`) so GPS coordinates arrive as decimal degrees.
pub struct ExifToolSource {
    exiftool: ExifTool,
}

impl ExifToolSource {
    pub fn new() -> Result<Self, ExifToolError> {
        Ok(Self {
            exiftool: ExifTool::new()?,
        })
    }

    pub fn with_executable(path: &Path) -> Result<Self, ExifToolError> {
        Ok(Self {
            exiftool: ExifTool::with_executable(path)?,
        })
    }
}

impl MetadataSource for ExifToolSource {
    fn read(&mut self, path: &Path) -> io::Result<MetadataRecord> {
        // An unreadable file is the only hard failure here.
        let modified = fs::metadata(path)?.modified()?;

        let mut record = MetadataRecord::default();
        let mtime: DateTime<Local> = modified.into();
        record.insert_text(
            "FileModifiedDate",
            mtime.format("%Y:%m:%d %H:%M:%S").to_string(),
        );

        match self.exiftool.json(path, &["-n"]) {
            Ok(value) => merge_exiftool_fields(&mut record, &value),
            Err(e) => debug!("No readable metadata in {}: {e}", path.display()),
        }

        Ok(record)
    }
}

/// Merges the consumed fields of one exiftool JSON object into `record`.
///
/// Values are stripped of trailing whitespace and NUL padding, sentinel
/// dates are dropped so a placeholder never displaces a better field in the
/// fallback chain, and GPS tags are gathered into the nested sub-record.
pub fn merge_exiftool_fields(record: &mut MetadataRecord, value: &Value) {
    for tag in DATE_TAGS {
        if let Some(raw) = value.get(tag).and_then(Value::as_str) {
            let cleaned = clean_tag_value(raw);
            if !cleaned.is_empty() && !SENTINEL_DATES.iter().any(|s| cleaned.contains(s)) {
                record.insert_text(tag, cleaned);
            }
        }
    }

    match value.get("Model") {
        Some(Value::String(raw)) => {
            let cleaned = clean_tag_value(raw);
            if !cleaned.is_empty() {
                record.insert_text("Model", cleaned);
            }
        }
        Some(Value::Object(map)) => {
            // Unexpected shape; keep it so the pipeline rejects the file
            // explicitly instead of silently dropping the field.
            let nested: HashMap<String, String> = map
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect();
            record.insert_record("Model", nested);
        }
        _ => {}
    }

    let mut gps = HashMap::new();
    for tag in GPS_TAGS {
        let rendered = match value.get(tag) {
            Some(Value::String(raw)) => clean_tag_value(raw),
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        if !rendered.is_empty() && !rendered.contains("nan") {
            gps.insert(tag.to_string(), rendered);
        }
    }
    if !gps.is_empty() {
        record.insert_record("GPSInfo", gps);
    }
}

fn clean_tag_value(raw: &str) -> String {
    raw.trim_end().trim_end_matches('\0').trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FieldValue;
    use serde_json::json;

    #[test]
    fn merges_dates_model_and_gps() {
        let exif = json!({
            "DateTimeOriginal": "2023:06:15 14:30:00",
            "ModifyDate": "2023:06:16 09:00:00",
            "Model": "Pixel 7",
            "GPSLatitude": 48.8566,
            "GPSLongitude": 2.3522,
            "GPSLatitudeRef": "N",
            "GPSLongitudeRef": "E"
        });
        let mut record = MetadataRecord::default();
        merge_exiftool_fields(&mut record, &exif);

        assert_eq!(record.effective_date(), Ok("2023:06:15 14:30:00"));
        assert_eq!(record.camera_model(), Ok(Some("Pixel 7")));
        let gps = record.gps().unwrap();
        assert_eq!(gps.get("GPSLatitude").map(String::as_str), Some("48.8566"));
        assert_eq!(gps.get("GPSLongitudeRef").map(String::as_str), Some("E"));
    }

    #[test]
    fn sentinel_dates_are_filtered_out() {
        let exif = json!({
            "DateTimeOriginal": "0000:00:00 00:00:00",
            "ModifyDate": "1970-01-01 00:00:00 UTC",
            "CreateDate": "2021:03:01 08:00:00"
        });
        let mut record = MetadataRecord::default();
        merge_exiftool_fields(&mut record, &exif);

        assert!(record.get("DateTimeOriginal").is_none());
        assert!(record.get("ModifyDate").is_none());
        assert_eq!(
            record.get("CreateDate"),
            Some(&FieldValue::Text("2021:03:01 08:00:00".to_string()))
        );
    }

    #[test]
    fn trailing_nul_padding_is_stripped() {
        let exif = json!({
            "DateTimeOriginal": "2023:06:15 14:30:00\u{0}\u{0}",
            "Model": "Pixel 7 \u{0}"
        });
        let mut record = MetadataRecord::default();
        merge_exiftool_fields(&mut record, &exif);

        assert_eq!(record.effective_date(), Ok("2023:06:15 14:30:00"));
        assert_eq!(record.camera_model(), Ok(Some("Pixel 7")));
    }

    #[test]
    fn partial_gps_tags_still_form_a_record() {
        let exif = json!({
            "GPSLatitude": 48.8566,
            "GPSLongitude": 2.3522
        });
        let mut record = MetadataRecord::default();
        merge_exiftool_fields(&mut record, &exif);

        let gps = record.gps().unwrap();
        assert_eq!(gps.len(), 2);
        assert!(gps.get("GPSLatitudeRef").is_none());
    }

    #[test]
    fn structured_model_value_is_kept_as_record() {
        let exif = json!({ "Model": { "weird": "shape" } });
        let mut record = MetadataRecord::default();
        merge_exiftool_fields(&mut record, &exif);

        assert_eq!(
            record.camera_model(),
            Err(crate::metadata::MetadataError::InvalidCameraModel)
        );
    }
}
