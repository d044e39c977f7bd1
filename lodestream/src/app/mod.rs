//! Application wiring.
//!
//! [`App::start`] connects the three halves of the pipeline: a route
//! generator feeding the replay driver, and the broadcast server fanning the
//! driver's sentence pairs out to TCP clients.

mod config;
mod error;

pub use config::{AppConfig, RouteConfig, ServerConfig};
pub use error::AppError;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::broadcast::{BroadcastHandle, BroadcastServer};
use crate::generator;
use crate::replay::ReplayDriver;

/// A running lodestream instance.
pub struct App {
    broadcast: Arc<BroadcastHandle>,
    replay: Option<JoinHandle<usize>>,
    shutdown: CancellationToken,
    local_addr: SocketAddr,
}

impl App {
    /// Load the route, bind the server, and start replaying.
    ///
    /// Fails fast - before any client can connect - when the route cannot be
    /// loaded or the port cannot be bound.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        let source = generator::create(config.route.format, &config.route.args)?;

        let server = BroadcastServer::bind(&config.server.addr()).await?;
        let local_addr = server.local_addr();
        let broadcast = Arc::new(server.serve());

        let shutdown = CancellationToken::new();
        let driver = ReplayDriver::new(Box::new(source), Arc::clone(&broadcast));
        let replay = tokio::spawn(driver.run(shutdown.clone()));

        info!(addr = %local_addr, "lodestream serving");
        Ok(Self {
            broadcast,
            replay: Some(replay),
            shutdown,
            local_addr,
        })
    }

    /// The address the broadcast server is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait until the route is exhausted.
    ///
    /// Returns the number of positions published. Cancel-safe: dropping this
    /// future leaves the replay running.
    pub async fn wait_route(&mut self) -> usize {
        let Some(handle) = self.replay.as_mut() else {
            return 0;
        };
        let result = handle.await;
        self.replay = None;
        match result {
            Ok(published) => published,
            Err(err) => {
                warn!(error = %err, "replay task ended abnormally");
                0
            }
        }
    }

    /// Stop replaying and serving, waiting for both to wind down.
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.replay.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "replay task ended abnormally");
            }
        }
        self.broadcast.stop().await;
    }
}
