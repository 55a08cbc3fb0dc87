//! Application configuration.

use crate::error::{AppError, AppResult};
use busmap_ws::{ConnectionConfig, FeedEndpoint};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feed endpoint configuration.
///
/// Either an explicit `url`, or derivation mirroring the hosting page:
/// secure origin selects `wss`, an optional development port replaces the
/// page's own port, and the fixed `/feed` path is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Explicit WebSocket URL; overrides derivation when set.
    #[serde(default)]
    pub url: Option<String>,
    /// Host of the hosting page, optionally with port.
    #[serde(default = "default_host")]
    pub host: String,
    /// Whether the hosting origin is secure.
    #[serde(default)]
    pub secure: bool,
    /// Development websocket port (served separately from the page).
    #[serde(default)]
    pub dev_port: Option<u16>,
}

fn default_host() -> String {
    "localhost".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            secure: false,
            dev_port: None,
        }
    }
}

impl EndpointConfig {
    /// Resolve the feed URL.
    pub fn feed_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        FeedEndpoint {
            host: self.host.clone(),
            secure: self.secure,
            dev_port: self.dev_port,
        }
        .url()
    }
}

/// WebSocket retry configuration subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsConfig {
    /// Maximum reconnection attempts (0 = infinite).
    #[serde(default)]
    pub max_reconnect_attempts: u32,
    /// Retry interval after the first connection loss (ms).
    #[serde(default = "default_initial_retry_ms")]
    pub initial_retry_ms: u64,
    /// Cap the retry interval doubles towards (ms).
    #[serde(default = "default_max_retry_ms")]
    pub max_retry_ms: u64,
}

fn default_initial_retry_ms() -> u64 {
    1_000
}

fn default_max_retry_ms() -> u64 {
    300_000 // 5 minutes
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: 0,
            initial_retry_ms: default_initial_retry_ms(),
            max_retry_ms: default_max_retry_ms(),
        }
    }
}

impl From<WsConfig> for ConnectionConfig {
    fn from(cfg: WsConfig) -> Self {
        Self {
            url: String::new(), // Set separately
            max_reconnect_attempts: cfg.max_reconnect_attempts,
            initial_retry_ms: cfg.initial_retry_ms,
            max_retry_ms: cfg.max_retry_ms,
        }
    }
}

/// Initial map view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_center_lon() -> f64 {
    24.7536
}

fn default_center_lat() -> f64 {
    59.437
}

fn default_zoom() -> f64 {
    16.0
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lon: default_center_lon(),
            center_lat: default_center_lat(),
            zoom: default_zoom(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Feed endpoint.
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// WebSocket retry behavior.
    #[serde(default)]
    pub websocket: WsConfig,
    /// Initial map view.
    #[serde(default)]
    pub map: MapConfig,
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// Uses `BUSMAP_CONFIG` when set, otherwise `config/default.toml`, and
    /// falls back to built-in defaults when the file does not exist.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("BUSMAP_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint.feed_url(), "ws://localhost/feed");
        assert_eq!(config.websocket.initial_retry_ms, 1_000);
        assert_eq!(config.websocket.max_retry_ms, 300_000);
        assert_eq!(config.map.zoom, 16.0);
    }

    #[test]
    fn test_explicit_url_overrides_derivation() {
        let config: AppConfig = toml::from_str(
            r#"
            [endpoint]
            url = "ws://ufo.local:8000/feed"
            host = "ignored.example.net"
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint.feed_url(), "ws://ufo.local:8000/feed");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [endpoint]
            host = "bus.example.net"
            secure = true

            [websocket]
            initial_retry_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint.feed_url(), "wss://bus.example.net/feed");
        assert_eq!(config.websocket.initial_retry_ms, 500);
        assert_eq!(config.websocket.max_retry_ms, 300_000);
        assert_eq!(config.map.center_lat, 59.437);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("host"));
        assert!(toml_str.contains("initial_retry_ms"));
    }

    #[test]
    fn test_ws_config_into_connection_config() {
        let ws = WsConfig {
            max_reconnect_attempts: 3,
            initial_retry_ms: 250,
            max_retry_ms: 4_000,
        };
        let conn: ConnectionConfig = ws.into();
        assert_eq!(conn.max_reconnect_attempts, 3);
        assert_eq!(conn.initial_retry_ms, 250);
        assert_eq!(conn.max_retry_ms, 4_000);
        assert!(conn.url.is_empty());
    }
}
