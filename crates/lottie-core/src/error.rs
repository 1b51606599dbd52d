use lottie_data::{ConfigError, TextDecodeError};
use thiserror::Error;

use crate::object::{ObjectId, ObjectType};

/// Errors raised while building a composition. Per-frame evaluation never
/// fails; out-of-range frames clamp and mismatched operands fall back.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("keyframe segment starting at {start} overlaps the previous segment ending at {previous_end}")]
    OverlappingSegment { start: f32, previous_end: f32 },
    #[error("keyframe segment ends at {end} before it starts at {start}")]
    InvertedSegment { start: f32, end: f32 },
    #[error("object {0:?} is not allocated in this arena")]
    UnknownObject(ObjectId),
    #[error("object {id:?} is a {actual:?}, expected {expected:?}")]
    TypeMismatch {
        id: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Text(#[from] TextDecodeError),
}
