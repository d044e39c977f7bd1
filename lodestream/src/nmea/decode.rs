//! NMEA sentence to Position decoding.
//!
//! Accepts GGA and RMC sentences from GPS-only (`GP`), combined-talker
//! (`GN`), and bare prefixes. Decoded positions carry `index = 0`; callers
//! assign the real sequence number.

use chrono::{DateTime, NaiveDate, Utc};

use crate::position::Position;

/// Why a sentence failed to decode.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The line does not start with `$`.
    #[error("sentence does not start with '$'")]
    MissingFraming,

    /// The sentence type is not GGA or RMC in a recognized talker form.
    #[error("unsupported sentence type: {0}")]
    UnsupportedSentence(String),

    /// Too few fields for the sentence type.
    #[error("truncated {kind} sentence: {fields} fields")]
    Truncated { kind: &'static str, fields: usize },

    /// The RMC validity flag is not `A`.
    #[error("RMC sentence does not report an active fix")]
    InactiveFix,

    /// A numeric field failed to parse.
    #[error("malformed {field} field in {kind} sentence")]
    MalformedField { kind: &'static str, field: &'static str },

    /// The sentence yields no parseable timestamp.
    #[error("no valid timestamp in {kind} sentence")]
    InvalidTimestamp { kind: &'static str },
}

/// Decode a single NMEA sentence into a position.
///
/// The checksum suffix (everything from `*`) is stripped, not verified.
pub fn decode(sentence: &str) -> Result<Position, DecodeError> {
    if !sentence.starts_with('$') {
        return Err(DecodeError::MissingFraming);
    }
    let body = sentence.trim();
    let body = match body.find('*') {
        Some(star) => &body[..star],
        None => body,
    };
    let fields: Vec<&str> = body[1..].split(',').collect();

    match fields[0] {
        "GPRMC" | "GNRMC" | "RMC" => decode_rmc(&fields),
        "GPGGA" | "GNGGA" | "GGA" => decode_gga(&fields),
        other => Err(DecodeError::UnsupportedSentence(other.to_string())),
    }
}

fn decode_rmc(fields: &[&str]) -> Result<Position, DecodeError> {
    const KIND: &str = "RMC";
    if fields.len() < 10 {
        return Err(DecodeError::Truncated {
            kind: KIND,
            fields: fields.len(),
        });
    }
    if fields[2] != "A" {
        return Err(DecodeError::InactiveFix);
    }

    let lat = parse_lat(fields[3], fields[4]).ok_or(DecodeError::MalformedField {
        kind: KIND,
        field: "latitude",
    })?;
    let lon = parse_lon(fields[5], fields[6]).ok_or(DecodeError::MalformedField {
        kind: KIND,
        field: "longitude",
    })?;

    // Speed over ground arrives in knots
    let speed = if fields[7].is_empty() {
        0.0
    } else {
        let knots: f64 = fields[7].parse().map_err(|_| DecodeError::MalformedField {
            kind: KIND,
            field: "speed",
        })?;
        knots * 1.852
    };

    let time = parse_timestamp(fields[1], Some(fields[9]))
        .ok_or(DecodeError::InvalidTimestamp { kind: KIND })?;

    Ok(Position::new(0, lat, lon, speed, 0.0, time))
}

fn decode_gga(fields: &[&str]) -> Result<Position, DecodeError> {
    const KIND: &str = "GGA";
    if fields.len() < 10 {
        return Err(DecodeError::Truncated {
            kind: KIND,
            fields: fields.len(),
        });
    }

    let lat = parse_lat(fields[2], fields[3]).ok_or(DecodeError::MalformedField {
        kind: KIND,
        field: "latitude",
    })?;
    let lon = parse_lon(fields[4], fields[5]).ok_or(DecodeError::MalformedField {
        kind: KIND,
        field: "longitude",
    })?;

    let elevation = if fields[9].is_empty() {
        0.0
    } else {
        fields[9].parse().map_err(|_| DecodeError::MalformedField {
            kind: KIND,
            field: "elevation",
        })?
    };

    // GGA carries no date - reuse the current one
    let time =
        parse_timestamp(fields[1], None).ok_or(DecodeError::InvalidTimestamp { kind: KIND })?;

    Ok(Position::new(0, lat, lon, 0.0, elevation, time))
}

/// Parse a packed degree-minute coordinate string to decimal degrees.
///
/// The expected layout puts two minute digits directly before the decimal
/// point, so degrees occupy everything up to `dot - 2`. When the decimal
/// point sits closer than four digits in, or is missing entirely, a
/// best-effort fallback takes `max_degrees_digits` (capped at `len - 2`)
/// degree digits and reads the remainder as minutes. The fallback exists for
/// malformed or truncated input only; well-formed sentences never reach it.
fn parse_coordinate(coord: &str, max_degrees_digits: usize) -> Option<f64> {
    if coord.is_empty() {
        return Some(0.0);
    }

    let (deg, minutes) = match coord.find('.') {
        Some(dot) if dot >= 4 => {
            let deg_end = dot - 2;
            let deg: i64 = coord.get(..deg_end)?.parse().ok()?;
            let minutes: f64 = coord.get(deg_end..)?.parse().ok()?;
            (deg, minutes)
        }
        Some(_) => {
            let deg_digits = max_degrees_digits.min(coord.len().saturating_sub(2));
            let deg: i64 = coord.get(..deg_digits)?.parse().ok()?;
            let minutes: f64 = coord.get(deg_digits..)?.parse().ok()?;
            (deg, minutes)
        }
        None => {
            let deg_digits = if coord.len() > 2 {
                max_degrees_digits.min(coord.len() - 2)
            } else {
                max_degrees_digits
            };
            let deg_digits = deg_digits.min(coord.len());
            let deg: i64 = coord.get(..deg_digits)?.parse().ok()?;
            let minutes: f64 = if coord.len() > deg_digits {
                coord.get(deg_digits..)?.parse().ok()?
            } else {
                0.0
            };
            (deg, minutes)
        }
    };

    Some(deg as f64 + minutes / 60.0)
}

fn parse_lat(lat_str: &str, ns: &str) -> Option<f64> {
    if lat_str.is_empty() || ns.is_empty() {
        return Some(0.0);
    }
    let lat = parse_coordinate(lat_str, 2)?;
    Some(if ns == "S" { -lat } else { lat })
}

fn parse_lon(lon_str: &str, ew: &str) -> Option<f64> {
    if lon_str.is_empty() || ew.is_empty() {
        return Some(0.0);
    }
    let lon = parse_coordinate(lon_str, 3)?;
    Some(if ew == "W" { -lon } else { lon })
}

/// Parse `HHMMSS[.fff]` plus an optional `DDMMYY` date into a UTC timestamp.
///
/// With no date (or an empty date field) the current UTC date is reused.
/// Two-digit years are interpreted as `2000 + YY`.
fn parse_timestamp(time_str: &str, date_str: Option<&str>) -> Option<DateTime<Utc>> {
    if time_str.len() < 6 || !time_str.is_char_boundary(6) {
        return None;
    }
    let hour: u32 = time_str.get(0..2)?.parse().ok()?;
    let minute: u32 = time_str.get(2..4)?.parse().ok()?;
    let second: u32 = time_str.get(4..6)?.parse().ok()?;

    let micro: u32 = match time_str.split_once('.') {
        Some((_, frac)) => {
            let frac: f64 = format!("0.{frac}").parse().ok()?;
            (frac * 1e6) as u32
        }
        None => 0,
    };

    let date = match date_str {
        Some(d) if !d.is_empty() => {
            if d.len() < 6 {
                return None;
            }
            let day: u32 = d.get(0..2)?.parse().ok()?;
            let month: u32 = d.get(2..4)?.parse().ok()?;
            let year: i32 = d.get(4..6)?.parse::<i32>().ok()? + 2000;
            NaiveDate::from_ymd_opt(year, month, day)?
        }
        _ => Utc::now().date_naive(),
    };

    Some(date.and_hms_micro_opt(hour, minute, second, micro)?.and_utc())
}
