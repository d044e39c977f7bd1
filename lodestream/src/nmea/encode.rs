//! Position to NMEA sentence encoding.

use crate::position::Position;

use super::checksum;

// Fixed GGA fields - this simulator does not model the satellite
// constellation, so fix quality and geometry are constants.
const GGA_FIX_QUALITY: &str = "1";
const GGA_NUM_SATELLITES: &str = "08";
const GGA_HDOP: &str = "1.0";
const GGA_GEOID_SEPARATION: &str = "0.0";
const GGA_DGPS_AGE: &str = "";
const GGA_DGPS_REF: &str = "";

/// Conversion factor: km/h to knots.
const KMH_TO_KNOTS: f64 = 0.539957;

/// Format latitude and longitude in NMEA degree-minute packing.
///
/// Latitude packs as `DDMM.mmmmmm`, longitude as `DDDMM.mmmmmm`; the sign is
/// carried solely by the hemisphere letter.
///
/// Returns `(lat_str, lat_dir, lon_str, lon_dir)`.
fn format_coords(lat: f64, lon: f64) -> (String, char, String, char) {
    let lat_deg = lat.trunc() as i32;
    let lat_min = ((lat - lat_deg as f64) * 60.0).abs();
    let lat_dir = if lat >= 0.0 { 'N' } else { 'S' };
    let lat_str = format!("{:02}{:09.6}", lat_deg.abs(), lat_min);

    let lon_deg = lon.trunc() as i32;
    let lon_min = ((lon - lon_deg as f64) * 60.0).abs();
    let lon_dir = if lon >= 0.0 { 'E' } else { 'W' };
    let lon_str = format!("{:03}{:09.6}", lon_deg.abs(), lon_min);

    (lat_str, lat_dir, lon_str, lon_dir)
}

/// Frame a sentence body with `$`, checksum, and CRLF.
fn frame(body: String) -> String {
    let sum = checksum(&body);
    format!("${body}*{sum}\r\n")
}

/// Encode a position as a GGA (fix data) sentence.
pub fn encode_gga(data: &Position) -> String {
    let time_str = data.time.format("%H%M%S%.3f");
    let (lat_str, lat_dir, lon_str, lon_dir) = format_coords(data.lat, data.lon);

    frame(format!(
        "GPGGA,{time_str},{lat_str},{lat_dir},{lon_str},{lon_dir},\
         {GGA_FIX_QUALITY},{GGA_NUM_SATELLITES},{GGA_HDOP},{elevation:.1},M,\
         {GGA_GEOID_SEPARATION},M,{GGA_DGPS_AGE},{GGA_DGPS_REF}",
        elevation = data.elevation,
    ))
}

/// Encode a position as an RMC (recommended minimum) sentence.
pub fn encode_rmc(data: &Position) -> String {
    let time_str = data.time.format("%H%M%S%.3f");
    let date_str = data.time.format("%d%m%y");
    let (lat_str, lat_dir, lon_str, lon_dir) = format_coords(data.lat, data.lon);

    let speed_knots = data.speed * KMH_TO_KNOTS;

    frame(format!(
        "GPRMC,{time_str},A,{lat_str},{lat_dir},{lon_str},{lon_dir},\
         {speed_knots:.1},0.0,{date_str},,,A"
    ))
}
