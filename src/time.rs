//! Normalizes the timestamp strings found in media metadata into a single
//! canonical local-time value.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// The timestamp layouts recognized by [`normalize_datetime`], tried in order.
const FORMATS: [&str; 3] = [
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a metadata timestamp string into a local datetime.
///
/// A literal `UTC` marker anywhere in the input is stripped before parsing
/// and makes the parsed value be interpreted as UTC and converted to the
/// process-local timezone; otherwise the value is taken as already local.
///
/// Returns `None` when no recognized format matches.
pub fn normalize_datetime(raw: &str) -> Option<DateTime<Local>> {
    let is_utc = raw.contains("UTC");
    let cleaned = raw.replace("UTC", "");
    let cleaned = cleaned.trim();

    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cleaned, format) {
            return if is_utc {
                Some(naive.and_utc().with_timezone(&Local))
            } else {
                Local.from_local_datetime(&naive).earliest()
            };
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_exif_colon_format_as_local() {
        let dt = normalize_datetime("2023:06:15 14:30:00").unwrap();
        assert_eq!(dt.naive_local(), naive(2023, 6, 15, 14, 30, 0));
    }

    #[test]
    fn parses_iso_format_with_subseconds() {
        let dt = normalize_datetime("2023-06-15 14:30:00.123456").unwrap();
        assert_eq!(dt.naive_local().date(), naive(2023, 6, 15, 0, 0, 0).date());
        assert_eq!(dt.naive_local().time().format("%H:%M:%S").to_string(), "14:30:00");
    }

    #[test]
    fn parses_iso_format_without_subseconds() {
        let dt = normalize_datetime("2023-06-15 14:30:00").unwrap();
        assert_eq!(dt.naive_local(), naive(2023, 6, 15, 14, 30, 0));
    }

    #[test]
    fn utc_marker_converts_to_local_time() {
        // The value with a UTC marker is interpreted in UTC, so its UTC
        // projection must match the parsed components exactly.
        let dt = normalize_datetime("2023-06-15 14:30:00 UTC").unwrap();
        assert_eq!(dt.naive_utc(), naive(2023, 6, 15, 14, 30, 0));
    }

    #[test]
    fn unrecognized_formats_are_rejected_without_panic() {
        assert!(normalize_datetime("15/06/2023 14:30").is_none());
        assert!(normalize_datetime("June 15th 2023").is_none());
        assert!(normalize_datetime("").is_none());
    }
}
