//! Presentation layer for the busmap client.
//!
//! Everything here is either a pure function of (marker, zoom) or a small
//! state machine over injected render capabilities:
//! - zoom-band icon styling and popup offsets
//! - the selection/overlay tracker
//! - the collaborator traits the external map widget implements
//! - update-time labels

pub mod error;
pub mod format;
pub mod overlay;
pub mod style;
pub mod surface;

pub use error::{ViewError, ViewResult};
pub use format::{distance_in_words, update_time};
pub use overlay::OverlayTracker;
pub use style::{icon_scale, popup_offset_px, style_for, IconStyle, ZoomWatcher};
pub use surface::{IconRasterizer, MapSurface, OverlaySurface};
