//! Normalizes the heterogeneous GPS coordinate encodings found in media
//! metadata into signed decimal degrees.

use log::error;
use regex::Regex;
use std::str::FromStr;

/// Hemisphere reference attached to a raw GPS coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateRef {
    North,
    East,
    South,
    West,
}

impl CoordinateRef {
    fn is_latitude(self) -> bool {
        matches!(self, CoordinateRef::North | CoordinateRef::South)
    }

    fn is_negative(self) -> bool {
        matches!(self, CoordinateRef::South | CoordinateRef::West)
    }
}

impl FromStr for CoordinateRef {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(CoordinateRef::North),
            "E" => Ok(CoordinateRef::East),
            "S" => Ok(CoordinateRef::South),
            "W" => Ok(CoordinateRef::West),
            _ => Err(()),
        }
    }
}

/// Normalizes a raw coordinate value into signed decimal degrees.
///
/// The value is either a plain decimal-degree string (returned as-is, the
/// hemisphere reference is ignored) or a string encoding a
/// degree/minute/second tuple such as `"(48.0, 51.0, 23.76)"`, which needs
/// the hemisphere reference to produce a signed result.
///
/// Returns `None` for anything unparseable or out of range.
pub fn normalize_coordinate(raw: &str, reference: Option<&str>) -> Option<f64> {
    if let Ok(decimal) = raw.trim().parse::<f64>() {
        return Some(decimal);
    }

    let reference = CoordinateRef::from_str(reference?)
        .inspect_err(|()| error!("Unrecognized hemisphere reference for coordinate: {raw}"))
        .ok()?;
    let dms = parse_dms_tuple(raw)?;
    dms_to_decimal(dms, reference)
}

/// Converts a degree/minute/second triple plus hemisphere reference into
/// signed decimal degrees, validating the coordinate range.
pub fn dms_to_decimal(dms: (f64, f64, f64), reference: CoordinateRef) -> Option<f64> {
    let (degrees, minutes, seconds) = dms;
    let mut decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    if reference.is_negative() {
        decimal = -decimal;
    }

    let in_range = if reference.is_latitude() {
        (-90.0..=90.0).contains(&decimal)
    } else {
        (-180.0..=180.0).contains(&decimal)
    };
    if !in_range {
        error!("Coordinate out of range: {decimal}");
        return None;
    }

    Some(decimal)
}

/// Parses a string of the form `"(d, m, s)"` into a numeric triple.
///
/// Rejects tuples with the wrong arity, with empty/`None`/`nan` elements,
/// and the all-zero placeholder some cameras write for missing fixes.
fn parse_dms_tuple(raw: &str) -> Option<(f64, f64, f64)> {
    let trimmed = raw.trim();
    if trimmed == "(0.0, 0.0, 0.0)" {
        return None;
    }

    let re = Regex::new(r"^\((.*)\)$").ok()?;
    let inner = match re.captures(trimmed) {
        Some(caps) => caps.get(1)?.as_str(),
        None => {
            error!("Invalid coordinate string: {raw}");
            return None;
        }
    };

    let items: Vec<&str> = inner.split(',').map(str::trim).collect();
    if items.len() != 3 {
        error!("Invalid coordinate tuple: {raw}");
        return None;
    }
    if items
        .iter()
        .any(|item| item.is_empty() || *item == "None" || *item == "nan")
    {
        error!("Invalid value found in coordinate tuple: {raw}");
        return None;
    }

    let mut parsed = [0.0f64; 3];
    for (slot, item) in parsed.iter_mut().zip(&items) {
        match item.parse::<f64>() {
            Ok(v) => *slot = v,
            Err(_) => {
                error!("Invalid coordinate string: {raw}");
                return None;
            }
        }
    }
    Some((parsed[0], parsed[1], parsed[2]))
}
