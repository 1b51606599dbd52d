//! In-memory animation model and per-frame evaluation engine for Lottie
//! documents.
//!
//! A decoder fills a [`CompositionBuilder`](lottie_core::CompositionBuilder)
//! with layers, shapes and keyframed properties. `build()` freezes it into a
//! [`Composition`](lottie_core::Composition) that renderers query by frame
//! number, from as many threads as they like.

pub use lottie_core;
pub use lottie_data;

pub use glam;
pub use kurbo;

pub mod prelude {
    pub use lottie_core::{
        Arena, Composition, CompositionBuilder, Easing, KeyFrames, Layer, LayerType, Linear,
        ModelError, Object, ObjectId, ObjectKind, Property, Segment, Spatial, Timeline, Transform,
        TransformData, Trim, TrimSegment,
    };
    pub use lottie_data::model::{Color, GradientData, PathData, TextDocument};
    pub use lottie_data::{CompositionConfig, Unicode};
}
