//! Telemetry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Logging initialization failed: {0}")]
    Init(String),

    #[error("Metrics encoding failed: {0}")]
    Encode(#[from] prometheus::Error),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
