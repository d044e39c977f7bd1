//! Route generators.
//!
//! A generator turns an ordered route source into a lazy, exhaustible
//! sequence of positions. Concrete file-backed sources (CSV, GeoJSON, raw
//! NMEA captures) load their whole route eagerly at construction and are
//! exposed through the [`PositionSource`] capability trait; the
//! [`registry`](create_by_name) maps a format name to its loader.
//!
//! All sources accept the common trailing `key=value` override arguments:
//!
//! - `duration=<seconds>` forces every emitted point's dwell duration
//! - `index=<start>` renumbers points contiguously from `start`

mod csv_route;
mod geojson;
mod nmea_file;
mod params;
mod registry;
mod route;

pub use params::CommonParams;
pub use registry::{create, create_by_name, RouteFormat};
pub use route::RouteGenerator;

use std::path::PathBuf;

use crate::position::Position;

/// Anything that produces a finite sequence of positions.
///
/// Pulling past the last point returns `None`; repeated pulls after
/// exhaustion keep returning `None`.
pub trait PositionSource: Send {
    /// Pull the next position, or signal exhaustion.
    fn next_position(&mut self) -> Option<Position>;
}

/// Why a generator could not be constructed.
///
/// Construction failures are fatal: the caller never receives a usable
/// generator from a missing, malformed, or empty route source.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// No loader is registered under this format name.
    #[error("unknown route format: {0:?}")]
    UnknownFormat(String),

    /// No route file path among the construction arguments.
    #[error("route file path must be specified")]
    MissingPath,

    /// A construction argument that neither the override parser nor the
    /// loader recognizes.
    #[error("unexpected argument: {0:?}")]
    UnexpectedArgument(String),

    /// An override argument whose value failed to parse.
    #[error("invalid {name} value: {value:?}")]
    InvalidOverride { name: &'static str, value: String },

    /// The route file could not be read.
    #[error("failed to read route file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The route file is structurally invalid.
    #[error("invalid route in {}: {reason}", path.display())]
    InvalidRoute { path: PathBuf, reason: String },

    /// The route file yielded zero usable points.
    #[error("no usable points in {}", path.display())]
    EmptyRoute { path: PathBuf },
}

/// Check the ranges the data model promises for a loaded point.
///
/// Returns the violation as a human-readable reason.
fn validate(position: &Position) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&position.lat) {
        return Err(format!("latitude {} out of range", position.lat));
    }
    if !(-180.0..=180.0).contains(&position.lon) {
        return Err(format!("longitude {} out of range", position.lon));
    }
    if position.speed < 0.0 {
        return Err(format!("negative speed {}", position.speed));
    }
    if position.duration < 0.0 {
        return Err(format!("negative duration {}", position.duration));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn point(lat: f64, lon: f64) -> Position {
        Position::new(1, lat, lon, 0.0, 0.0, DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(validate(&point(90.0, 180.0)).is_ok());
        assert!(validate(&point(-90.0, -180.0)).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(validate(&point(90.5, 0.0)).is_err());
        assert!(validate(&point(0.0, -180.5)).is_err());

        let mut p = point(0.0, 0.0);
        p.speed = -1.0;
        assert!(validate(&p).is_err());
    }
}
