//! Selection and popup tracking.
//!
//! Two states: no selection, or exactly one selected vehicle whose popup
//! content follows that vehicle's reconciliation updates.

use crate::format::update_time;
use crate::style::popup_offset_px;
use crate::surface::OverlaySurface;
use busmap_core::{Marker, VehicleId};
use tracing::debug;

/// Tracks which single marker, if any, has an open detail popup.
pub struct OverlayTracker<S: OverlaySurface> {
    surface: S,
    selected: Option<VehicleId>,
}

impl<S: OverlaySurface> OverlayTracker<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            selected: None,
        }
    }

    /// Currently selected vehicle, if any.
    pub fn selected(&self) -> Option<VehicleId> {
        self.selected
    }

    /// Access the underlying overlay surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Select a marker (pointer pick hit) and open its popup.
    pub fn select(&mut self, marker: &Marker, zoom: f64) {
        self.selected = Some(marker.id);
        self.render(marker, zoom);
    }

    /// Close the popup (pick miss or explicit close action).
    pub fn close(&mut self) {
        if self.selected.take().is_some() {
            self.surface.hide();
        }
    }

    /// Keep the popup fresh while its marker updates. No-op unless
    /// `marker` is the selected one.
    pub fn refresh(&mut self, marker: &Marker, zoom: f64) {
        if self.selected == Some(marker.id) {
            self.render(marker, zoom);
        }
    }

    /// The selected vehicle left the feed: close rather than keep stale
    /// content.
    pub fn marker_expired(&mut self, id: VehicleId) {
        if self.selected == Some(id) {
            debug!(%id, "Selected vehicle expired, closing popup");
            self.close();
        }
    }

    fn render(&mut self, marker: &Marker, zoom: f64) {
        self.surface.set_content(&popup_content(marker));
        self.surface
            .show_at(marker.position, popup_offset_px(zoom));
    }
}

/// Popup body for one marker.
fn popup_content(marker: &Marker) -> String {
    format!(
        "Bus no. {}\n{}",
        marker.line,
        update_time(Some(marker.updated_at))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use busmap_core::ProjectedPoint;
    use chrono::Utc;

    #[derive(Debug, Default)]
    struct RecordingOverlay {
        content: Option<String>,
        position: Option<ProjectedPoint>,
        offset: Option<f64>,
        visible: bool,
    }

    impl OverlaySurface for RecordingOverlay {
        fn set_content(&mut self, content: &str) {
            self.content = Some(content.to_string());
        }

        fn show_at(&mut self, position: ProjectedPoint, offset_px: f64) {
            self.position = Some(position);
            self.offset = Some(offset_px);
            self.visible = true;
        }

        fn hide(&mut self) {
            self.visible = false;
        }
    }

    fn marker(id: i64, line: &str, x: f64) -> Marker {
        Marker {
            id: VehicleId::new(id),
            line: line.to_string(),
            position: ProjectedPoint::new(x, 100.0),
            updated_at: Utc::now(),
            icon_scale: 0.05,
        }
    }

    #[test]
    fn test_select_opens_popup() {
        let mut tracker = OverlayTracker::new(RecordingOverlay::default());
        tracker.select(&marker(7, "5", 10.0), 17.0);

        assert_eq!(tracker.selected(), Some(VehicleId::new(7)));
        assert!(tracker.surface.visible);
        assert!(tracker.surface.content.as_deref().unwrap().contains("Bus no. 5"));
        assert_eq!(tracker.surface.offset, Some(popup_offset_px(17.0)));
    }

    #[test]
    fn test_close_hides_popup() {
        let mut tracker = OverlayTracker::new(RecordingOverlay::default());
        tracker.select(&marker(7, "5", 10.0), 17.0);
        tracker.close();

        assert_eq!(tracker.selected(), None);
        assert!(!tracker.surface.visible);
    }

    #[test]
    fn test_refresh_tracks_selected_marker_only() {
        let mut tracker = OverlayTracker::new(RecordingOverlay::default());
        tracker.select(&marker(7, "5", 10.0), 17.0);

        // An update to some other vehicle does not touch the popup.
        tracker.refresh(&marker(8, "9", 50.0), 17.0);
        assert_eq!(tracker.surface.position.unwrap().x, 10.0);

        // An update to the selected one moves it.
        tracker.refresh(&marker(7, "5", 20.0), 17.0);
        assert_eq!(tracker.surface.position.unwrap().x, 20.0);
    }

    #[test]
    fn test_expiry_of_selected_closes_popup() {
        let mut tracker = OverlayTracker::new(RecordingOverlay::default());
        tracker.select(&marker(7, "5", 10.0), 17.0);

        tracker.marker_expired(VehicleId::new(3));
        assert_eq!(tracker.selected(), Some(VehicleId::new(7)));

        tracker.marker_expired(VehicleId::new(7));
        assert_eq!(tracker.selected(), None);
        assert!(!tracker.surface.visible);
    }
}
