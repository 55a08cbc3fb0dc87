//! WebSocket transport for the busmap feed.
//!
//! Provides robust connectivity with:
//! - One live socket at a time with an explicit connection state machine
//! - Automatic reconnection with exponential backoff (doubling, capped,
//!   reset on every successful open)
//! - Opaque binary frame forwarding in strict arrival order
//! - Feed endpoint URL derivation from the hosting environment

pub mod connection;
pub mod endpoint;
pub mod error;

pub use connection::{ConnectionConfig, ConnectionManager, ConnectionState, SocketEvent};
pub use endpoint::{FeedEndpoint, FEED_PATH};
pub use error::{WsError, WsResult};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
