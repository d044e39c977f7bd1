//! TCP broadcast server implementation.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::nmea::SentencePair;

/// Upper bound on a single client write.
///
/// A stalled peer counts as disconnected once this elapses, so it can never
/// hold up the broadcast to the remaining clients.
pub const CLIENT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur while starting the broadcast server.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    /// The listening socket could not be bound.
    #[error("failed to bind broadcast server on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

/// A bound-but-not-yet-serving broadcast server.
///
/// Lifecycle: [`BroadcastServer::bind`] enters the bound state (bind
/// failures surface here, before any client can connect), [`serve`] starts
/// the relay loop, and [`BroadcastHandle::stop`] tears it down. The final
/// state is terminal - serving again requires a fresh `bind`.
///
/// [`serve`]: BroadcastServer::serve
pub struct BroadcastServer {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl BroadcastServer {
    /// Bind the listening socket.
    pub async fn bind(addr: &str) -> Result<Self, BroadcastError> {
        let bind_error = |source| BroadcastError::Bind {
            addr: addr.to_string(),
            source,
        };
        let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// The address the listener actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the relay loop and return the handle producers use.
    pub fn serve(self) -> BroadcastHandle {
        let (pair_tx, pair_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(relay_loop(self.listener, pair_rx, shutdown.clone()));

        info!(addr = %self.local_addr, "broadcast server listening");
        BroadcastHandle {
            pair_tx,
            shutdown,
            task: Mutex::new(Some(task)),
            local_addr: self.local_addr,
        }
    }
}

/// Producer-side handle to a running broadcast server.
///
/// Cloneable via reference from any thread: `enqueue` is non-blocking and
/// preserves FIFO order end-to-end.
pub struct BroadcastHandle {
    pair_tx: mpsc::UnboundedSender<SentencePair>,
    shutdown: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
    local_addr: SocketAddr,
}

impl BroadcastHandle {
    /// Queue a sentence pair for broadcast to every connected client.
    ///
    /// Never blocks. After `stop` the pair is silently dropped.
    pub fn enqueue(&self, pair: SentencePair) {
        if self.pair_tx.send(pair).is_err() {
            debug!("broadcast loop stopped, sentence pair dropped");
        }
    }

    /// The address the server is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the server and wait for the relay loop to exit.
    ///
    /// Closes the listening socket and every client connection. Idempotent:
    /// callers after the first return once the loop is already down.
    pub async fn stop(&self) {
        self.shutdown.cancel();
        let task = self.task.lock().await.take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(error = %err, "broadcast loop ended abnormally");
            }
        }
    }
}

impl Drop for BroadcastHandle {
    fn drop(&mut self) {
        // A dropped handle can no longer enqueue or stop - shut the loop
        // down rather than leaving it serving an unreachable queue.
        self.shutdown.cancel();
    }
}

/// One connected client.
struct Client {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Client {
    /// Write both sentences of a pair, fix sentence first, back-to-back.
    async fn send_pair(&mut self, pair: &SentencePair) -> io::Result<()> {
        self.write_with_timeout(pair.gga.as_bytes()).await?;
        self.write_with_timeout(pair.rmc.as_bytes()).await
    }

    async fn write_with_timeout(&mut self, bytes: &[u8]) -> io::Result<()> {
        match tokio::time::timeout(CLIENT_WRITE_TIMEOUT, self.stream.write_all(bytes)).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "client write timed out",
            )),
        }
    }
}

/// The accept/relay loop.
///
/// Runs until the shutdown token fires. All client-set mutation happens
/// here, on one task: accepts add, broadcast failures prune.
async fn relay_loop(
    listener: TcpListener,
    mut pair_rx: mpsc::UnboundedReceiver<SentencePair>,
    shutdown: CancellationToken,
) {
    let mut clients: Vec<Client> = Vec::new();

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("broadcast server shutting down");
                break;
            }

            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!(%peer, clients = clients.len() + 1, "client connected");
                    clients.push(Client { stream, peer });
                }
                // Accept failures are transient (e.g. fd exhaustion); record
                // and keep serving
                Err(err) => warn!(error = %err, "failed to accept connection"),
            },

            Some(pair) = pair_rx.recv() => {
                broadcast(&mut clients, &pair).await;
            }
        }
    }

    // Stopping: close every client connection, then the listener
    for client in &mut clients {
        let _ = client.stream.shutdown().await;
    }
    drop(listener);
    info!("broadcast server stopped");
}

/// Send one pair to every connected client, pruning the ones that fail.
async fn broadcast(clients: &mut Vec<Client>, pair: &SentencePair) {
    let mut i = 0;
    while i < clients.len() {
        match clients[i].send_pair(pair).await {
            Ok(()) => i += 1,
            Err(err) => {
                let client = clients.swap_remove(i);
                warn!(
                    peer = %client.peer,
                    error = %err,
                    clients = clients.len(),
                    "dropping client after failed write"
                );
            }
        }
    }
}
