//! Application orchestration.
//!
//! Coordinates the components:
//! - WebSocket connection (own task, reconnect loop)
//! - Frame decoding and marker reconciliation (this task, in arrival order)
//! - Connectivity indicator and metrics

use crate::config::AppConfig;
use crate::console::{TraceOverlay, TraceSurface};
use crate::error::AppResult;
use crate::session::Session;
use busmap_ws::{ConnectionConfig, ConnectionManager, SocketEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Event channel depth between the socket task and the session loop.
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    /// Create a new application.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> AppResult<()> {
        let url = self.config.endpoint.feed_url();
        info!(url = %url, "Starting busmap client");

        let (event_tx, mut event_rx) = mpsc::channel::<SocketEvent>(EVENT_CHANNEL_CAPACITY);

        let mut ws_config: ConnectionConfig = self.config.websocket.clone().into();
        ws_config.url = url;

        let manager = Arc::new(ConnectionManager::new(ws_config, event_tx));
        let manager_task = manager.clone();
        let ws_handle = tokio::spawn(async move {
            if let Err(e) = manager_task.connect().await {
                error!(error = %e, "WebSocket connection task failed");
            }
        });

        let zoom = self.config.map.zoom;
        let mut session = Session::new(TraceSurface::new(zoom), TraceOverlay::default(), zoom);

        info!("Entering main event loop");
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        warn!("Socket event channel closed");
                        break;
                    };
                    session.handle_event(event);
                }
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, shutting down");
                    manager.shutdown();
                    break;
                }
            }
        }

        // Drain whatever the socket task already queued, then wait for it.
        while let Ok(event) = event_rx.try_recv() {
            session.handle_event(event);
        }
        if let Err(e) = ws_handle.await {
            warn!(error = %e, "WebSocket task join error");
        }

        info!(
            markers = session.marker_count(),
            status = %session.status_line(),
            "Shutdown complete"
        );
        match busmap_telemetry::gather() {
            Ok(text) => debug!(metrics = %text, "Final metrics"),
            Err(e) => warn!(error = %e, "Failed to gather metrics"),
        }

        Ok(())
    }
}
