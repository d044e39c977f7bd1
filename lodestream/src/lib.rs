//! Lodestream - a simulated GPS receiver.
//!
//! Reads a sequence of waypoints from a route description (CSV, GeoJSON, or
//! a raw NMEA capture), advances through them over time, renders each
//! waypoint as a GGA/RMC sentence pair, and streams the pairs continuously
//! to any number of TCP clients - typically navigation software under test.
//!
//! # Pipeline
//!
//! ```text
//! route file ──► generator ──► replay driver ──► broadcast server ──► clients
//!                (eager load,   (encode + pace)   (accept + fan-out)
//!                 lazy emit)
//! ```
//!
//! The three core pieces are the [`nmea`] codec (pure position-to-wire
//! transformations), the [`generator`] contract (lazy, exhaustible position
//! sequences with uniform override semantics), and the [`broadcast`] server
//! (concurrent accept and fan-out that never blocks the producer).

pub mod app;
pub mod broadcast;
pub mod config;
pub mod generator;
pub mod logging;
pub mod nmea;
pub mod position;
pub mod replay;

pub use position::{Position, Transition};

/// Crate version, for CLI banners and logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
