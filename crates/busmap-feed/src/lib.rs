//! Feed decoding and marker reconciliation.
//!
//! Turns each inbound binary frame into a typed `FeedMessage` and applies
//! it against the live marker set, keeping the set consistent across an
//! unreliable, reconnecting push feed.

pub mod codec;
pub mod error;
pub mod reconciler;

pub use codec::{decode_frame, encode_frame, FeedMessage};
pub use error::{FeedError, FeedResult};
pub use reconciler::{Applied, MarkerReconciler};
