//! NMEA 0183 sentence codec.
//!
//! Pure string transformations between [`Position`](crate::position::Position)
//! and the two sentence types a simulated receiver emits:
//!
//! - **GGA** - fix data: time, coordinates, fixed quality/satellite fields,
//!   elevation
//! - **RMC** - recommended minimum: time, coordinates, speed, date
//!
//! Encode and decode are exact inverses on the fields each sentence carries,
//! so captured sentence files can be replayed through the decoder and
//! re-encoded without drift.

mod decode;
mod encode;

pub use decode::{decode, DecodeError};
pub use encode::{encode_gga, encode_rmc};

use crate::position::Position;

/// One GGA sentence followed by its RMC companion, both `\r\n`-terminated.
///
/// This is the only form in which positions cross into the broadcast server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentencePair {
    /// The fix sentence (GGA).
    pub gga: String,
    /// The recommended-minimum sentence (RMC).
    pub rmc: String,
}

/// Encode a position into its GGA/RMC sentence pair.
pub fn encode_pair(position: &Position) -> SentencePair {
    SentencePair {
        gga: encode_gga(position),
        rmc: encode_rmc(position),
    }
}

/// Calculate the NMEA checksum over a sentence body.
///
/// The body is the text between, but excluding, the leading `$` and the
/// trailing `*`. Returns two uppercase hex digits.
pub fn checksum(body: &str) -> String {
    let sum = body.bytes().fold(0u8, |acc, b| acc ^ b);
    format!("{:02X}", sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn position(lat: f64, lon: f64, speed: f64, elevation: f64) -> Position {
        let time = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap();
        Position::new(1, lat, lon, speed, elevation, time)
    }

    fn verify_checksum(sentence: &str) {
        let body = sentence
            .strip_prefix('$')
            .and_then(|s| s.strip_suffix("\r\n"))
            .unwrap();
        let (body, sum) = body.split_once('*').unwrap();
        assert_eq!(checksum(body), sum, "checksum mismatch in {sentence:?}");
    }

    #[test]
    fn test_pair_contains_both_sentence_types() {
        let pair = encode_pair(&position(59.9343, 30.3351, 10.0, 5.5));
        assert!(pair.gga.starts_with("$GPGGA,"));
        assert!(pair.rmc.starts_with("$GPRMC,"));
    }

    #[test]
    fn test_checksum_known_value() {
        // XOR of "A" is 0x41
        assert_eq!(checksum("A"), "41");
        assert_eq!(checksum(""), "00");
    }

    proptest! {
        /// Checksum property: the trailing hex digits of any generated
        /// sentence reproduce the XOR of the body bytes.
        #[test]
        fn prop_checksum_matches(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            speed in 0.0f64..400.0,
            elevation in -500.0f64..9000.0,
        ) {
            let pair = encode_pair(&position(lat, lon, speed, elevation));
            verify_checksum(&pair.gga);
            verify_checksum(&pair.rmc);
        }

        /// Round-trip property for the fix sentence: coordinates survive to
        /// packed-minute precision, elevation to one decimal.
        #[test]
        fn prop_gga_round_trip(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            elevation in -500.0f64..9000.0,
        ) {
            let original = position(lat, lon, 0.0, elevation);
            let decoded = decode(&encode_gga(&original)).unwrap();

            // Packed minutes carry 6 decimal digits: ~1.7e-8 degrees
            prop_assert!((decoded.lat - lat).abs() < 1e-7);
            prop_assert!((decoded.lon - lon).abs() < 1e-7);
            prop_assert!((decoded.elevation - elevation).abs() < 0.05 + 1e-9);
            prop_assert_eq!(decoded.index, 0);
        }

        /// Round-trip property for the recommended-minimum sentence:
        /// coordinates and speed (to one-decimal-knot rounding) survive.
        #[test]
        fn prop_rmc_round_trip(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            speed in 0.0f64..400.0,
        ) {
            let original = position(lat, lon, speed, 0.0);
            let decoded = decode(&encode_rmc(&original)).unwrap();

            prop_assert!((decoded.lat - lat).abs() < 1e-7);
            prop_assert!((decoded.lon - lon).abs() < 1e-7);
            // One decimal knot of rounding is 0.05kt = 0.0926 km/h
            prop_assert!((decoded.speed - speed).abs() < 0.1);
        }
    }

    #[test]
    fn test_rmc_round_trip_preserves_date() {
        let original = position(48.8566, 2.3522, 25.0, 0.0);
        let decoded = decode(&encode_rmc(&original)).unwrap();

        assert_eq!(decoded.time.date_naive(), original.time.date_naive());
        assert_eq!(
            decoded.time.format("%H%M%S").to_string(),
            original.time.format("%H%M%S").to_string()
        );
    }
}
