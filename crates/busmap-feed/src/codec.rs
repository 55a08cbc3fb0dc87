//! Wire frame decoding.
//!
//! Each binary frame is an independently deserializable MessagePack map
//! with a `type` discriminator selecting one of three payload shapes.
//! A frame that fails to deserialize is dropped by the caller; it never
//! takes down the pipeline or rolls back reconciled state.

use crate::error::{FeedError, FeedResult};
use busmap_core::{PositionUpdate, VehicleId};
use serde::{Deserialize, Serialize};

/// One decoded inbound message.
///
/// `INI` replaces the whole marker set, `POS` is an incremental batch and
/// `EXP` lists vehicles that left the feed. An earlier protocol revision
/// had no discriminator at all; it is not supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedMessage {
    /// Full reset: the positions are the complete current fleet.
    #[serde(rename = "INI")]
    Reset {
        area: String,
        positions: Vec<PositionUpdate>,
    },
    /// Incremental position batch.
    #[serde(rename = "POS")]
    Batch {
        area: String,
        positions: Vec<PositionUpdate>,
    },
    /// Vehicles to remove from the map.
    #[serde(rename = "EXP")]
    Expiry {
        area: String,
        expired: Vec<VehicleId>,
    },
}

impl FeedMessage {
    /// Message kind label for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reset { .. } => "INI",
            Self::Batch { .. } => "POS",
            Self::Expiry { .. } => "EXP",
        }
    }

    /// Area tag carried by the message (a single global area today).
    pub fn area(&self) -> &str {
        match self {
            Self::Reset { area, .. } | Self::Batch { area, .. } | Self::Expiry { area, .. } => area,
        }
    }
}

/// Decode one binary frame.
///
/// A frame that fails to deserialize, or whose `type` value is unknown,
/// is a decode error.
pub fn decode_frame(frame: &[u8]) -> FeedResult<FeedMessage> {
    rmp_serde::from_slice(frame).map_err(FeedError::from)
}

/// Encode a message the way the producer does (named-field map).
///
/// The client itself only decodes; this is for the test harnesses.
pub fn encode_frame(message: &FeedMessage) -> FeedResult<Vec<u8>> {
    rmp_serde::to_vec_named(message).map_err(FeedError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(id: i64, line: &str, lat: f64, lon: f64) -> PositionUpdate {
        PositionUpdate {
            id: VehicleId::new(id),
            line: line.to_string(),
            lat,
            lon,
            kind: 2,
            tag: None,
        }
    }

    #[test]
    fn test_decode_reset() {
        let message = FeedMessage::Reset {
            area: "tallinn".to_string(),
            positions: vec![position(1, "5", 59.43, 24.75)],
        };
        let frame = encode_frame(&message).unwrap();

        let decoded = decode_frame(&frame).unwrap();
        assert_eq!(decoded.kind(), "INI");
        assert_eq!(decoded.area(), "tallinn");
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_decode_batch_with_optional_tag() {
        let mut with_tag = position(2, "7", 59.40, 24.70);
        with_tag.tag = Some(11);
        let message = FeedMessage::Batch {
            area: "tallinn".to_string(),
            positions: vec![position(1, "5", 59.43, 24.75), with_tag],
        };
        let frame = encode_frame(&message).unwrap();

        match decode_frame(&frame).unwrap() {
            FeedMessage::Batch { positions, .. } => {
                assert_eq!(positions.len(), 2);
                assert_eq!(positions[0].tag, None);
                assert_eq!(positions[1].tag, Some(11));
            }
            other => panic!("Expected Batch, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_expiry() {
        let message = FeedMessage::Expiry {
            area: "tallinn".to_string(),
            expired: vec![VehicleId::new(1), VehicleId::new(9)],
        };
        let frame = encode_frame(&message).unwrap();

        match decode_frame(&frame).unwrap() {
            FeedMessage::Expiry { expired, .. } => {
                assert_eq!(expired, vec![VehicleId::new(1), VehicleId::new(9)]);
            }
            other => panic!("Expected Expiry, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_discriminator_is_a_decode_error() {
        // Same shape as a reset, but an unknown type tag.
        #[derive(Serialize)]
        struct Bogus {
            r#type: &'static str,
            area: &'static str,
            positions: Vec<PositionUpdate>,
        }
        let frame = rmp_serde::to_vec_named(&Bogus {
            r#type: "XXX",
            area: "tallinn",
            positions: vec![],
        })
        .unwrap();

        assert!(matches!(decode_frame(&frame), Err(FeedError::Decode(_))));
    }

    #[test]
    fn test_garbage_frame_is_a_decode_error() {
        assert!(decode_frame(&[0xc1, 0xff, 0x00]).is_err());
        assert!(decode_frame(b"").is_err());
    }

    #[test]
    fn test_truncated_frame_is_a_decode_error() {
        let message = FeedMessage::Reset {
            area: "tallinn".to_string(),
            positions: vec![position(1, "5", 59.43, 24.75)],
        };
        let frame = encode_frame(&message).unwrap();
        assert!(decode_frame(&frame[..frame.len() / 2]).is_err());
    }
}
