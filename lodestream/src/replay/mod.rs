//! Route replay driver.
//!
//! Pulls positions one at a time from a [`PositionSource`], encodes each
//! into its NMEA sentence pair, hands the pair to a [`SentenceSink`], and
//! dwells for the position's recommended duration before moving on. The
//! driver is the producer side of the broadcast handoff; it never blocks on
//! clients because the sink's publish is non-blocking.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::broadcast::BroadcastHandle;
use crate::generator::PositionSource;
use crate::nmea::{self, SentencePair};
use crate::position::Transition;

/// Where the driver publishes encoded sentence pairs.
///
/// Implemented by [`BroadcastHandle`]; tests substitute a recording sink.
pub trait SentenceSink: Send + Sync {
    /// Hand over one encoded pair. Must not block.
    fn publish(&self, pair: SentencePair);
}

impl SentenceSink for BroadcastHandle {
    fn publish(&self, pair: SentencePair) {
        self.enqueue(pair);
    }
}

impl<T: SentenceSink + ?Sized> SentenceSink for std::sync::Arc<T> {
    fn publish(&self, pair: SentencePair) {
        (**self).publish(pair);
    }
}

/// Drives a route from source to sink at the route's own pace.
pub struct ReplayDriver<S> {
    source: Box<dyn PositionSource>,
    sink: S,
}

impl<S: SentenceSink> ReplayDriver<S> {
    pub fn new(source: Box<dyn PositionSource>, sink: S) -> Self {
        Self { source, sink }
    }

    /// Replay the route until exhaustion or cancellation.
    ///
    /// Cancellation is observed between points and mid-dwell. Returns the
    /// number of positions published.
    pub async fn run(mut self, shutdown: CancellationToken) -> usize {
        let mut published = 0usize;

        while let Some(position) = self.source.next_position() {
            if shutdown.is_cancelled() {
                break;
            }

            debug!(
                index = position.index,
                lat = position.lat,
                lon = position.lon,
                dwell_secs = position.duration,
                "publishing position"
            );
            if position.transition != Transition::Auto {
                // Interactive stepping lives outside this driver; timed
                // pacing applies to every transition mode
                debug!(transition = %position.transition, "transition paced as auto");
            }

            self.sink.publish(nmea::encode_pair(&position));
            published += 1;

            // Non-positive or nonsensical durations mean no dwell
            if let Ok(dwell) = Duration::try_from_secs_f64(position.duration) {
                if !dwell.is_zero() {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(dwell) => {}
                    }
                }
            }
        }

        info!(published, "route replay finished");
        published
    }
}
