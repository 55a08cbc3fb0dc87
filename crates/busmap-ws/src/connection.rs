//! WebSocket connection manager.
//!
//! Owns one outbound socket at a time and reconnects with exponential
//! backoff. Frames are forwarded opaque; decoding happens downstream.

use crate::error::{WsError, WsResult};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// WebSocket URL.
    pub url: String,
    /// Maximum reconnection attempts (0 = infinite).
    pub max_reconnect_attempts: u32,
    /// Retry interval after the first connection loss.
    pub initial_retry_ms: u64,
    /// Upper bound the retry interval doubles towards.
    pub max_retry_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_reconnect_attempts: 0, // Infinite
            initial_retry_ms: 1_000,
            max_retry_ms: 300_000, // 5 minutes
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Event emitted towards the reconciliation loop.
///
/// All events travel on a single channel in strict socket order, so the
/// consumer sees connectivity transitions interleaved consistently with
/// the frames around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// The socket opened; the server follows up with a full reset.
    Connected,
    /// The socket closed; a reconnect is scheduled.
    Disconnected,
    /// One binary frame, opaque to the transport.
    Frame(Vec<u8>),
}

/// WebSocket connection manager.
///
/// `connect()` runs the whole lifecycle: open the socket, pump frames, and
/// on any close (clean or error) schedule a reconnect after the current
/// retry interval, doubling it up to the configured cap. A successful open
/// resets the interval. There is never more than one live socket: the
/// previous stream is dropped before a new connect, which is what
/// invalidates any in-flight reads on it. Messages lost during a drop are
/// not queued; the server's fresh reset after reconnect recovers the state.
pub struct ConnectionManager {
    config: ConnectionConfig,
    state: Arc<RwLock<ConnectionState>>,
    event_tx: mpsc::Sender<SocketEvent>,
    shutdown_token: CancellationToken,
}

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new(config: ConnectionConfig, event_tx: mpsc::Sender<SocketEvent>) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            event_tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Get current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Signal graceful shutdown.
    ///
    /// Cancels the shutdown token; the socket loop and any backoff sleep
    /// exit promptly.
    pub fn shutdown(&self) {
        info!("ConnectionManager shutdown requested");
        self.shutdown_token.cancel();
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Connect and run the reconnect loop until shutdown (or until the
    /// configured attempt limit is exhausted).
    pub async fn connect(&self) -> WsResult<()> {
        self.connect_with_retry().await
    }

    async fn connect_with_retry(&self) -> WsResult<()> {
        let initial = Duration::from_millis(self.config.initial_retry_ms);
        let max = Duration::from_millis(self.config.max_retry_ms.max(self.config.initial_retry_ms));
        let mut retry_interval = initial;
        let mut attempt = 0u32;

        loop {
            if self.is_shutdown() {
                *self.state.write() = ConnectionState::Disconnected;
                return Ok(());
            }

            *self.state.write() = ConnectionState::Connecting;

            let result = self.run_socket().await;
            let was_connected = self.state() == ConnectionState::Connected;
            *self.state.write() = ConnectionState::Disconnected;

            match result {
                Ok(()) => info!("WebSocket connection closed"),
                Err(ref e) => error!(error = %e, "WebSocket connection error"),
            }

            if was_connected {
                self.emit(SocketEvent::Disconnected).await;
                // A successful open reset the backoff; start over from the
                // initial interval.
                retry_interval = initial;
                attempt = 0;
            }

            if self.is_shutdown() {
                info!("Shutdown requested after disconnect, not reconnecting");
                return Ok(());
            }

            attempt += 1;
            if self.config.max_reconnect_attempts > 0 && attempt > self.config.max_reconnect_attempts
            {
                error!(attempt, "Max reconnection attempts reached");
                return Err(WsError::ConnectionFailed(
                    "max reconnection attempts reached".to_string(),
                ));
            }

            *self.state.write() = ConnectionState::Reconnecting;
            warn!(
                attempt,
                delay_ms = retry_interval.as_millis() as u64,
                "Reconnecting"
            );

            // Wait for the backoff delay OR shutdown (cancellation-aware).
            tokio::select! {
                () = tokio::time::sleep(retry_interval) => {}
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown requested during backoff, exiting");
                    *self.state.write() = ConnectionState::Disconnected;
                    return Ok(());
                }
            }

            retry_interval = next_retry_interval(retry_interval, max);
        }
    }

    /// Open one socket and pump it until it closes.
    async fn run_socket(&self) -> WsResult<()> {
        info!(url = %self.config.url, "Connecting to WebSocket");

        // TCP_NODELAY so small frames are not held back by Nagle.
        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        *self.state.write() = ConnectionState::Connected;
        info!("WebSocket connected");
        self.emit(SocketEvent::Connected).await;

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in socket loop");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!(error = %e, "Failed to send Close frame during shutdown");
                    }
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Binary(payload))) => {
                            self.emit(SocketEvent::Frame(payload)).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            debug!("Received ping, sending pong");
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Pong(_))) => {}
                        Some(Ok(Message::Text(text))) => {
                            // The feed is binary-only; stray text frames are
                            // ignored rather than treated as an error.
                            debug!(len = text.len(), "Ignoring text frame");
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            warn!(code, %reason, "WebSocket closed by server");
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket read error");
                            return Err(e.into());
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    async fn emit(&self, event: SocketEvent) {
        if self.event_tx.send(event).await.is_err() {
            warn!("Socket event receiver dropped");
        }
    }
}

/// Next reconnect delay: double the current interval, bounded at `max`.
fn next_retry_interval(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}
