//! Concurrent sentence broadcast server.
//!
//! The [`BroadcastServer`] owns a listening TCP socket and relays every
//! enqueued [`SentencePair`](crate::nmea::SentencePair) to all connected
//! clients, accepting new connections concurrently with sentence
//! production. Producers never block on a slow or disconnected client.
//!
//! # Architecture
//!
//! ```text
//! producer ──enqueue──► unbounded FIFO ──► relay loop ──► client 1
//!                                              │    └───► client 2
//! CancellationToken ──stop──────────────────────┘    └───► ...
//! ```
//!
//! The relay loop is a single task: it multiplexes accept, queue drain, and
//! shutdown with `tokio::select!`, so the client set needs no lock. A client
//! whose write fails or times out is pruned; the server itself never fails
//! because of a client.

mod server;

pub use server::{BroadcastError, BroadcastHandle, BroadcastServer, CLIENT_WRITE_TIMEOUT};
