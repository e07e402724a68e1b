//! Typed view over the flat per-file metadata record.
//!
//! Each field is either plain text or a nested string record (the GPS
//! sub-record), so unexpected shapes are handled by matching a variant
//! instead of runtime type sniffing.

mod reader;

pub use reader::{ExifToolSource, MetadataSource, merge_exiftool_fields};

use std::collections::HashMap;
use thiserror::Error;

/// Date fields consumed by the pipeline, in fallback order.
pub const DATE_FALLBACK_CHAIN: [&str; 3] = ["DateTimeOriginal", "ModifyDate", "FileModifiedDate"];

/// Placeholder timestamps that must never be treated as real capture data.
pub const SENTINEL_DATES: [&str; 2] = ["0000:00:00 00:00:00", "1970-01-01 00:00:00 UTC"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetadataError {
    #[error("No usable date field found in metadata")]
    InvalidDateField,

    #[error("Camera model field has an unexpected structured value")]
    InvalidCameraModel,
}

/// A single metadata field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Record(HashMap<String, String>),
}

/// The flat metadata record produced once per file by the reader,
/// immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRecord {
    fields: HashMap<String, FieldValue>,
}

impl MetadataRecord {
    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), FieldValue::Text(value.into()));
    }

    pub fn insert_record(&mut self, name: impl Into<String>, value: HashMap<String, String>) {
        self.fields.insert(name.into(), FieldValue::Record(value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Resolves the effective date string through the fallback chain
    /// `DateTimeOriginal -> ModifyDate -> FileModifiedDate`; the first
    /// present non-empty value wins. A field holding a nested record is a
    /// wrong shape and rejected outright.
    pub fn effective_date(&self) -> Result<&str, MetadataError> {
        for field in DATE_FALLBACK_CHAIN {
            match self.fields.get(field) {
                Some(FieldValue::Text(value)) if !value.is_empty() => return Ok(value),
                Some(FieldValue::Record(record)) if !record.is_empty() => {
                    return Err(MetadataError::InvalidDateField);
                }
                _ => {}
            }
        }
        Err(MetadataError::InvalidDateField)
    }

    /// The camera model, if present as plain text. A structured value here
    /// is invalid; absence is not.
    pub fn camera_model(&self) -> Result<Option<&str>, MetadataError> {
        match self.fields.get("Model") {
            Some(FieldValue::Text(value)) if !value.is_empty() => Ok(Some(value)),
            Some(FieldValue::Record(_)) => Err(MetadataError::InvalidCameraModel),
            _ => Ok(None),
        }
    }

    /// The nested GPS sub-record, if any.
    pub fn gps(&self) -> Option<&HashMap<String, String>> {
        match self.fields.get("GPSInfo") {
            Some(FieldValue::Record(record)) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_fallback_prefers_date_time_original() {
        let mut record = MetadataRecord::default();
        record.insert_text("ModifyDate", "2022:01:01 00:00:00");
        record.insert_text("DateTimeOriginal", "2023:06:15 14:30:00");
        record.insert_text("FileModifiedDate", "2024:01:01 00:00:00");

        assert_eq!(record.effective_date(), Ok("2023:06:15 14:30:00"));
    }

    #[test]
    fn date_fallback_skips_empty_values() {
        let mut record = MetadataRecord::default();
        record.insert_text("DateTimeOriginal", "");
        record.insert_text("FileModifiedDate", "2024:01:01 00:00:00");

        assert_eq!(record.effective_date(), Ok("2024:01:01 00:00:00"));
    }

    #[test]
    fn missing_date_fields_are_an_error() {
        let record = MetadataRecord::default();
        assert_eq!(record.effective_date(), Err(MetadataError::InvalidDateField));
    }

    #[test]
    fn structured_date_field_is_rejected() {
        let mut record = MetadataRecord::default();
        let mut nested = HashMap::new();
        nested.insert("oops".to_string(), "2023".to_string());
        record.insert_record("DateTimeOriginal", nested);

        assert_eq!(record.effective_date(), Err(MetadataError::InvalidDateField));
    }

    #[test]
    fn camera_model_shapes() {
        let mut record = MetadataRecord::default();
        assert_eq!(record.camera_model(), Ok(None));

        record.insert_text("Model", "Pixel 7");
        assert_eq!(record.camera_model(), Ok(Some("Pixel 7")));

        let mut nested = HashMap::new();
        nested.insert("make".to_string(), "Google".to_string());
        record.insert_record("Model", nested);
        assert_eq!(record.camera_model(), Err(MetadataError::InvalidCameraModel));
    }

    #[test]
    fn gps_accessor_requires_record_shape() {
        let mut record = MetadataRecord::default();
        assert!(record.gps().is_none());

        record.insert_text("GPSInfo", "48.85,2.35");
        assert!(record.gps().is_none());

        let mut nested = HashMap::new();
        nested.insert("GPSLatitude".to_string(), "48.85".to_string());
        record.insert_record("GPSInfo", nested);
        assert!(record.gps().is_some());
    }
}
