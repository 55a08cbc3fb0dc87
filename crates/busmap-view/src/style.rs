//! Zoom-dependent marker styling.
//!
//! Pure functions of (route label, zoom level). Scale and popup offset are
//! step functions over discrete zoom bands, so styling work is redone only
//! when the band changes, not on every fractional zoom step.

/// Icon anchor within the glyph, as fractions of its size.
pub const ICON_ANCHOR: (f32, f32) = (0.5, 0.75);

/// Raster dimensions of the bus glyph the rasterizer produces.
pub const ICON_SIZE_PX: (u32, u32) = (794, 934);

/// Icon scale for a zoom level.
pub fn icon_scale(zoom: f64) -> f32 {
    if zoom > 20.0 {
        0.085
    } else if zoom > 18.0 {
        0.065
    } else if zoom > 16.0 {
        0.05
    } else {
        0.04
    }
}

/// Vertical popup offset in screen pixels for a zoom level.
///
/// Finer-grained than the icon scale bands so the popup stays near the
/// icon tip while zooming.
pub fn popup_offset_px(zoom: f64) -> f64 {
    if zoom > 20.0 {
        85.0
    } else if zoom > 19.0 {
        72.0
    } else if zoom > 18.0 {
        64.0
    } else if zoom > 17.0 {
        60.0
    } else if zoom > 15.0 {
        55.0
    } else if zoom > 13.0 {
        48.0
    } else {
        40.0
    }
}

/// Everything the render surface needs to draw one marker's icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    /// Route label rendered into the glyph.
    pub label: String,
    pub scale: f32,
    pub anchor: (f32, f32),
    pub size_px: (u32, u32),
}

/// Compute the icon style for a route label at a zoom level.
pub fn style_for(line: &str, zoom: f64) -> IconStyle {
    IconStyle {
        label: line.to_string(),
        scale: icon_scale(zoom),
        anchor: ICON_ANCHOR,
        size_px: ICON_SIZE_PX,
    }
}

/// Reports zoom changes only when they cross a scale band boundary.
#[derive(Debug, Clone, Copy)]
pub struct ZoomWatcher {
    zoom: f64,
}

impl ZoomWatcher {
    pub fn new(zoom: f64) -> Self {
        Self { zoom }
    }

    /// Record a new zoom level. Returns the new scale when the band
    /// changed, `None` when restyling can be skipped.
    pub fn observe(&mut self, zoom: f64) -> Option<f32> {
        let previous = icon_scale(self.zoom);
        let next = icon_scale(zoom);
        self.zoom = zoom;
        (next != previous).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_scale_bands() {
        assert_eq!(icon_scale(21.0), 0.085);
        assert_eq!(icon_scale(19.0), 0.065);
        assert_eq!(icon_scale(17.0), 0.05);
        assert_eq!(icon_scale(16.0), 0.04);
        assert_eq!(icon_scale(10.0), 0.04);
    }

    #[test]
    fn test_band_edges_are_exclusive() {
        // The boundary zoom itself belongs to the band below.
        assert_eq!(icon_scale(20.0), 0.065);
        assert_eq!(icon_scale(18.0), 0.05);
        assert_eq!(icon_scale(16.0), 0.04);
    }

    #[test]
    fn test_popup_offset_is_finer_than_scale() {
        // Two zooms within the same scale band can still differ in offset.
        assert_eq!(icon_scale(18.5), icon_scale(19.5));
        assert_ne!(popup_offset_px(18.5), popup_offset_px(19.5));
    }

    #[test]
    fn test_style_for_carries_label() {
        let style = style_for("21A", 17.0);
        assert_eq!(style.label, "21A");
        assert_eq!(style.scale, 0.05);
        assert_eq!(style.anchor, ICON_ANCHOR);
        assert_eq!(style.size_px, ICON_SIZE_PX);
    }

    #[test]
    fn test_zoom_watcher_fires_only_on_band_change() {
        let mut watcher = ZoomWatcher::new(16.5);
        // Same band: 16.5 -> 17.9 both map to 0.05.
        assert_eq!(watcher.observe(17.9), None);
        // Crossing into the next band.
        assert_eq!(watcher.observe(18.1), Some(0.065));
        // And back down two bands.
        assert_eq!(watcher.observe(15.0), Some(0.04));
        // No-op when the zoom did not move at all.
        assert_eq!(watcher.observe(15.0), None);
    }
}
