//! One live feed session against a concrete pair of render surfaces.
//!
//! Embeddings drive `handle_event` from the socket channel and
//! `zoom_changed`/`pointer_pick` from their map widget; the bundled binary
//! does the same with the headless trace surfaces.

use busmap_feed::{decode_frame, MarkerReconciler};
use busmap_telemetry::Metrics;
use busmap_view::{update_time, MapSurface, OverlaySurface, OverlayTracker, ZoomWatcher};
use busmap_ws::SocketEvent;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// A feed session: reconciler, overlay tracker and connectivity indicator
/// bound to one pair of surfaces.
pub struct Session<S: MapSurface, O: OverlaySurface> {
    surface: S,
    overlay: OverlayTracker<O>,
    reconciler: MarkerReconciler,
    zoom_watcher: ZoomWatcher,
    connected: bool,
}

impl<S: MapSurface, O: OverlaySurface> Session<S, O> {
    pub fn new(surface: S, overlay_surface: O, zoom: f64) -> Self {
        Self {
            surface,
            overlay: OverlayTracker::new(overlay_surface),
            reconciler: MarkerReconciler::new(zoom),
            zoom_watcher: ZoomWatcher::new(zoom),
            connected: false,
        }
    }

    /// Whether the feed connection is currently up.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Number of live markers.
    pub fn marker_count(&self) -> usize {
        self.reconciler.len()
    }

    /// Timestamp of the last publishable marker-set change.
    pub fn last_published(&self) -> Option<DateTime<Utc>> {
        self.reconciler.last_published()
    }

    /// Status line for the drawer: connectivity plus last update time.
    pub fn status_line(&self) -> String {
        let indicator = if self.connected { "connected" } else { "offline" };
        let updated = update_time(self.reconciler.last_published());
        if updated.is_empty() {
            indicator.to_string()
        } else {
            format!("{indicator} | {updated}")
        }
    }

    /// Apply one socket event, in arrival order.
    pub fn handle_event(&mut self, event: SocketEvent) {
        match event {
            SocketEvent::Connected => {
                self.connected = true;
                Metrics::ws_connected();
                info!("Feed connected");
            }
            SocketEvent::Disconnected => {
                self.connected = false;
                Metrics::ws_disconnected();
                Metrics::ws_reconnect();
                warn!("Feed disconnected, reconnect scheduled");
            }
            SocketEvent::Frame(frame) => self.handle_frame(&frame),
        }
    }

    fn handle_frame(&mut self, frame: &[u8]) {
        let message = match decode_frame(frame) {
            Ok(message) => message,
            Err(e) => {
                // One corrupt frame never costs established state.
                Metrics::decode_error();
                warn!(error = %e, len = frame.len(), "Dropping undecodable frame");
                return;
            }
        };

        Metrics::frame_decoded(message.kind());
        let applied = self
            .reconciler
            .apply(message, &mut self.surface, &mut self.overlay);

        Metrics::markers_active(self.reconciler.len());
        if applied.created > 0 {
            Metrics::markers_created(applied.created);
        }
        if applied.removed > 0 {
            Metrics::markers_expired(applied.removed);
        }
        debug!(
            created = applied.created,
            updated = applied.updated,
            removed = applied.removed,
            live = self.reconciler.len(),
            "Applied feed message"
        );
    }

    /// Map view zoom changed; restyle only when the scale band changed.
    pub fn zoom_changed(&mut self, zoom: f64) {
        self.reconciler.set_zoom(zoom);
        if let Some(scale) = self.zoom_watcher.observe(zoom) {
            debug!(zoom, scale, "Zoom band changed, restyling markers");
            self.reconciler.restyle(&mut self.surface);
        }
    }

    /// Pointer pick on the map: select the hit marker or close the popup.
    pub fn pointer_pick(&mut self, pixel: (f64, f64)) {
        let hit = self
            .surface
            .hit_test(pixel)
            .and_then(|id| self.reconciler.get(id));
        match hit {
            Some(marker) => self.overlay.select(marker, self.reconciler.zoom()),
            None => self.overlay.close(),
        }
    }

    /// Explicit popup close action.
    pub fn close_overlay(&mut self) {
        self.overlay.close();
    }
}
