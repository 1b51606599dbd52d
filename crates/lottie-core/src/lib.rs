pub mod animatable;
pub mod composition;
pub mod error;
pub mod gradient;
pub mod keyframes;
pub mod layer;
pub mod object;
pub mod path;
pub mod property;
pub mod shapes;
pub mod text;
pub mod transform;
pub mod trim;

pub use animatable::{Easing, Interpolatable};
pub use composition::{
    Asset, AssetType, Composition, CompositionBuilder, FontDb, FontInfo, Glyph, LayerInfo, Stats,
    Timeline,
};
pub use error::ModelError;
pub use gradient::{Gradient, GradientFill, GradientStop, GradientStroke, GradientType};
pub use keyframes::{KeyFrames, Linear, Segment, SegmentValue, Spatial};
pub use layer::{Layer, LayerExtra, LayerType};
pub use object::{Arena, Object, ObjectId, ObjectKind, ObjectName, ObjectType};
pub use property::Property;
pub use shapes::{
    Dash, Ellipse, Fill, Group, Mask, MaskMode, PathShape, PolyType, Polystar, Rect, Repeater,
    RepeaterTransform, RoundedCorner, ShapeDirection, Stroke,
};
pub use text::{
    range_progress, CharAnimatedProperties, RangeSelector, RangeUnit, TextAnimatedProperty,
    TextAnimator, TextData, TextLayerData,
};
pub use transform::{Transform, TransformData, TransformExtra};
pub use trim::{Trim, TrimSegment, TrimType};
