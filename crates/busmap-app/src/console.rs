//! Headless render surfaces.
//!
//! Stand-ins for the external map widget so the client runs end-to-end
//! without one. A real embedding provides its own `MapSurface` and
//! `OverlaySurface` implementations and drives the session from its map
//! events.

use busmap_core::{Marker, ProjectedPoint, VehicleId};
use busmap_view::{IconRasterizer, IconStyle, MapSurface, OverlaySurface, ViewResult};
use std::collections::HashSet;
use tracing::debug;

/// Rasterizer that accepts every label and produces no pixels.
#[derive(Debug, Default)]
pub struct NullRasterizer;

impl IconRasterizer for NullRasterizer {
    type Image = ();

    fn rasterize(&self, _label: &str) -> ViewResult<()> {
        Ok(())
    }
}

/// Map surface that logs feature changes instead of drawing them.
#[derive(Debug)]
pub struct TraceSurface {
    rasterizer: NullRasterizer,
    zoom: f64,
    features: HashSet<VehicleId>,
}

impl TraceSurface {
    pub fn new(zoom: f64) -> Self {
        Self {
            rasterizer: NullRasterizer,
            zoom,
            features: HashSet::new(),
        }
    }

    /// Number of point features currently on the surface.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }
}

impl MapSurface for TraceSurface {
    fn upsert_marker(&mut self, marker: &Marker, style: &IconStyle) -> ViewResult<()> {
        self.rasterizer.rasterize(&style.label)?;
        self.features.insert(marker.id);
        debug!(
            id = %marker.id,
            line = %marker.line,
            x = marker.position.x,
            y = marker.position.y,
            scale = style.scale,
            "Feature upserted"
        );
        Ok(())
    }

    fn remove_marker(&mut self, id: VehicleId) -> ViewResult<()> {
        self.features.remove(&id);
        debug!(%id, "Feature removed");
        Ok(())
    }

    fn clear_markers(&mut self) -> ViewResult<()> {
        self.features.clear();
        debug!("Features cleared");
        Ok(())
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn hit_test(&self, _pixel: (f64, f64)) -> Option<VehicleId> {
        // No geometry without a real render layer.
        None
    }
}

/// Popup surface that logs content instead of rendering it.
#[derive(Debug, Default)]
pub struct TraceOverlay {
    visible: bool,
}

impl TraceOverlay {
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl OverlaySurface for TraceOverlay {
    fn set_content(&mut self, content: &str) {
        debug!(%content, "Popup content");
    }

    fn show_at(&mut self, position: ProjectedPoint, offset_px: f64) {
        self.visible = true;
        debug!(x = position.x, y = position.y, offset_px, "Popup shown");
    }

    fn hide(&mut self) {
        self.visible = false;
        debug!("Popup hidden");
    }
}
