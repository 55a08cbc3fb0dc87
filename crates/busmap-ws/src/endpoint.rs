//! Feed endpoint URL derivation.
//!
//! Mirrors how the hosting page locates the feed: secure transport iff the
//! page itself is served over a secure origin, a fixed `/feed` path, and an
//! alternate port when running against a local development server.

/// Path suffix the feed is served under.
pub const FEED_PATH: &str = "/feed";

/// Where the feed lives, before URL assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoint {
    /// Host of the hosting page, optionally with a port
    /// (e.g. "bus.example.net" or "ufo.local:8000").
    pub host: String,
    /// Whether the hosting origin is secure (`wss` vs `ws`).
    pub secure: bool,
    /// Development mode: the websocket is served on this port on the bare
    /// hostname instead of the page's own host:port.
    pub dev_port: Option<u16>,
}

impl FeedEndpoint {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            secure: false,
            dev_port: None,
        }
    }

    /// Build the WebSocket URL for the feed.
    pub fn url(&self) -> String {
        let proto = if self.secure { "wss" } else { "ws" };
        match self.dev_port {
            Some(port) => {
                let hostname = self.host.split(':').next().unwrap_or(&self.host);
                format!("{proto}://{hostname}:{port}{FEED_PATH}")
            }
            None => format!("{proto}://{}{FEED_PATH}", self.host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_host() {
        let ep = FeedEndpoint::new("bus.example.net");
        assert_eq!(ep.url(), "ws://bus.example.net/feed");
    }

    #[test]
    fn test_secure_origin_uses_wss() {
        let mut ep = FeedEndpoint::new("bus.example.net");
        ep.secure = true;
        assert_eq!(ep.url(), "wss://bus.example.net/feed");
    }

    #[test]
    fn test_host_port_is_kept_outside_development() {
        let ep = FeedEndpoint::new("ufo.local:8000");
        assert_eq!(ep.url(), "ws://ufo.local:8000/feed");
    }

    #[test]
    fn test_dev_port_replaces_page_port() {
        let mut ep = FeedEndpoint::new("localhost:3000");
        ep.dev_port = Some(8000);
        assert_eq!(ep.url(), "ws://localhost:8000/feed");
    }
}
