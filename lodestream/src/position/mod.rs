//! Position value type shared by the whole pipeline.
//!
//! A [`Position`] is one space-time sample plus route metadata. Route loaders
//! construct them once per file row, the generator re-emits them with a fresh
//! timestamp, and the NMEA codec turns them into wire sentences.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// How the replay driver advances past a route point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Advance automatically after the point's dwell duration.
    #[default]
    Auto,
    /// Advance on operator action.
    Manual,
    /// Advance on a key press.
    Key,
}

/// Error returned when parsing an unknown transition mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transition mode: {0:?}")]
pub struct ParseTransitionError(pub String);

impl FromStr for Transition {
    type Err = ParseTransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Transition::Auto),
            "manual" => Ok(Transition::Manual),
            "key" => Ok(Transition::Key),
            other => Err(ParseTransitionError(other.to_string())),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transition::Auto => "auto",
            Transition::Manual => "manual",
            Transition::Key => "key",
        };
        f.write_str(s)
    }
}

/// A single point in space with navigation metrics and timing information.
///
/// `time` is always a fixed-offset UTC timestamp; loaders store a placeholder
/// and the generator stamps the real emission time on every pull.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Sequence number of this point within its route (0 = not yet assigned).
    pub index: u32,
    /// Latitude in decimal degrees, -90 to +90.
    pub lat: f64,
    /// Longitude in decimal degrees, -180 to +180.
    pub lon: f64,
    /// Speed over ground in km/h.
    pub speed: f64,
    /// Elevation above sea level in meters.
    pub elevation: f64,
    /// UTC timestamp of the position sample.
    pub time: DateTime<Utc>,
    /// Recommended dwell at this point in seconds (0 = no pause).
    pub duration: f64,
    /// Transition mode to the next point.
    pub transition: Transition,
    /// Optional description or comment.
    pub description: String,
}

impl Position {
    /// Create a position with default route metadata (no dwell, auto
    /// transition, empty description).
    pub fn new(
        index: u32,
        lat: f64,
        lon: f64,
        speed: f64,
        elevation: f64,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            index,
            lat,
            lon,
            speed,
            elevation,
            time,
            duration: 0.0,
            transition: Transition::Auto,
            description: String::new(),
        }
    }

    /// Set the dwell duration in seconds.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the transition mode.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
