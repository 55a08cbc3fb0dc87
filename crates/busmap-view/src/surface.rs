//! Collaborator interfaces towards the render layer.
//!
//! The map widget, popup element and icon rasterizer live outside this
//! workspace; these traits are the whole contract against them.

use crate::error::ViewResult;
use crate::style::IconStyle;
use busmap_core::{Marker, ProjectedPoint, VehicleId};

/// Point-feature surface of the map widget.
///
/// The surface is a passive observer of reconciliation: it is handed every
/// marker change but never mutates marker state itself.
pub trait MapSurface {
    /// Add or update the point feature for a marker.
    fn upsert_marker(&mut self, marker: &Marker, style: &IconStyle) -> ViewResult<()>;

    /// Remove the point feature for a vehicle, if present.
    fn remove_marker(&mut self, id: VehicleId) -> ViewResult<()>;

    /// Drop every point feature (full reset).
    fn clear_markers(&mut self) -> ViewResult<()>;

    /// Current zoom level of the view.
    fn zoom(&self) -> f64;

    /// Which marker, if any, sits under a device pixel.
    fn hit_test(&self, pixel: (f64, f64)) -> Option<VehicleId>;
}

/// Rasterizes a route label into the bus glyph.
pub trait IconRasterizer {
    type Image;

    fn rasterize(&self, label: &str) -> ViewResult<Self::Image>;
}

/// Detail popup anchored to the map.
///
/// An injected capability rather than a concrete popup element, so the
/// tracker has no coupling to any particular rendering surface.
pub trait OverlaySurface {
    /// Replace the popup content.
    fn set_content(&mut self, content: &str);

    /// Show the popup anchored at a projected position, raised by a screen
    /// pixel offset above the icon tip.
    fn show_at(&mut self, position: ProjectedPoint, offset_px: f64);

    /// Hide the popup.
    fn hide(&mut self);
}
