//! busmap client application.
//!
//! Wires the transport, decoder, reconciler and view components into a
//! single-threaded event loop, and provides headless trace surfaces so the
//! client runs without a real map widget.

pub mod app;
pub mod config;
pub mod console;
pub mod error;
pub mod session;

pub use app::Application;
pub use config::{AppConfig, EndpointConfig, MapConfig, WsConfig};
pub use console::{NullRasterizer, TraceOverlay, TraceSurface};
pub use error::{AppError, AppResult};
pub use session::Session;
