//! Route format registry.
//!
//! Maps a format name to its loader, replacing inheritance with a tagged set
//! of constructors.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use super::{csv_route, geojson, nmea_file, CommonParams, GeneratorError, RouteGenerator};

/// The route source formats the registry knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFormat {
    /// Tabular `lat,lon,speed,elevation[,...]` rows.
    Csv,
    /// GeoJSON FeatureCollection of Point features.
    GeoJson,
    /// One raw NMEA sentence per line.
    Nmea,
}

impl RouteFormat {
    /// All registered formats, in display order.
    pub const ALL: [RouteFormat; 3] = [RouteFormat::Csv, RouteFormat::GeoJson, RouteFormat::Nmea];

    /// The registry name of this format.
    pub fn name(&self) -> &'static str {
        match self {
            RouteFormat::Csv => "csv",
            RouteFormat::GeoJson => "geojson",
            RouteFormat::Nmea => "nmea",
        }
    }
}

impl fmt::Display for RouteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RouteFormat {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| GeneratorError::UnknownFormat(s.to_string()))
    }
}

/// Construct a generator for a named format.
///
/// See [`create`].
pub fn create_by_name(format: &str, args: &[String]) -> Result<RouteGenerator, GeneratorError> {
    create(format.parse()?, args)
}

/// Construct a generator from a format tag and its construction arguments.
///
/// Arguments are the free-form trailing list: `key=value` overrides are
/// recognized here (any format), the first remaining argument is the route
/// file path, and anything further is rejected. The whole route is loaded
/// eagerly; any load failure fails the construction.
pub fn create(format: RouteFormat, args: &[String]) -> Result<RouteGenerator, GeneratorError> {
    let (params, remaining) = CommonParams::parse(args)?;

    let mut remaining = remaining.into_iter();
    let path = PathBuf::from(remaining.next().ok_or(GeneratorError::MissingPath)?);
    if let Some(extra) = remaining.next() {
        return Err(GeneratorError::UnexpectedArgument(extra));
    }

    let mut positions = match format {
        RouteFormat::Csv => csv_route::load(&path)?,
        RouteFormat::GeoJson => geojson::load(&path)?,
        RouteFormat::Nmea => nmea_file::load(&path)?,
    };

    for (i, position) in positions.iter_mut().enumerate() {
        params.apply(position, i as u32 + 1);
    }

    info!(
        format = %format,
        path = %path.display(),
        points = positions.len(),
        "route loaded"
    );
    Ok(RouteGenerator::new(positions))
}
