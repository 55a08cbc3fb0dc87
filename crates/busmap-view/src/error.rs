//! View error types.

use thiserror::Error;

/// Error reported by a render surface.
///
/// Surface failures are isolated per marker: reconciliation logs them and
/// keeps processing the rest of the batch.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Surface error: {0}")]
    Surface(String),
}

pub type ViewResult<T> = Result<T, ViewError>;
