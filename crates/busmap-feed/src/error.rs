//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Frame decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Frame encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
