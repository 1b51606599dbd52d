use kurbo::BezPath;
use lottie_data::model::PathData;

use crate::animatable::Interpolatable;
use crate::keyframes::{KeyFrames, Linear, Lookup, SegmentValue};
use crate::path;

/// A value that is either constant or driven by a keyframe track.
///
/// Properties start out static. [`Property::animation_mut`] promotes a static
/// property to an animated one the first time it is called; there is no way
/// back. Promotion needs `&mut self`, so once a composition is built and
/// shared it can no longer happen.
#[derive(Debug, Clone)]
pub enum Property<T, V = Linear<T>> {
    Static(T),
    Animated(Box<KeyFrames<V>>),
}

impl<T: Default, V> Default for Property<T, V> {
    fn default() -> Self {
        Property::Static(T::default())
    }
}

impl<T, V> From<T> for Property<T, V> {
    fn from(value: T) -> Self {
        Property::Static(value)
    }
}

impl<T, V> Property<T, V>
where
    T: Clone + Default,
    V: SegmentValue<Output = T>,
{
    pub fn new(value: T) -> Self {
        Property::Static(value)
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Property::Static(_))
    }

    pub fn as_static(&self) -> Option<&T> {
        match self {
            Property::Static(v) => Some(v),
            Property::Animated(_) => None,
        }
    }

    pub fn animation(&self) -> Option<&KeyFrames<V>> {
        match self {
            Property::Static(_) => None,
            Property::Animated(track) => Some(track),
        }
    }

    /// Mutable access to the keyframe track, promoting a static property to
    /// an empty animated one first.
    pub fn animation_mut(&mut self) -> &mut KeyFrames<V> {
        if let Property::Static(_) = self {
            *self = Property::Animated(Box::default());
        }
        match self {
            Property::Animated(track) => track,
            Property::Static(_) => unreachable!("promoted above"),
        }
    }

    /// The static value.
    ///
    /// Calling this on an animated property is a bug; debug builds panic,
    /// release builds return the value the track starts with.
    pub fn value(&self) -> T {
        match self {
            Property::Static(v) => v.clone(),
            Property::Animated(track) => {
                debug_assert!(false, "static value read from an animated property");
                track.value(i32::MIN)
            }
        }
    }

    pub fn value_at(&self, frame: i32) -> T {
        match self {
            Property::Static(v) => v.clone(),
            Property::Animated(track) => track.value(frame),
        }
    }

    pub fn angle(&self, frame: i32) -> f32 {
        match self {
            Property::Static(_) => 0.0,
            Property::Animated(track) => track.angle(frame),
        }
    }

    pub fn changed(&self, prev_frame: i32, cur_frame: i32) -> bool {
        match self {
            Property::Static(_) => false,
            Property::Animated(track) => track.changed(prev_frame, cur_frame),
        }
    }

    /// Resolves tangent caches of every segment. Runs once at build time.
    pub fn cache(&mut self) {
        if let Property::Animated(track) = self {
            track.cache();
        }
    }
}

impl Property<PathData> {
    /// Writes the path geometry at `frame` into `out`, reusing its storage.
    pub fn path_at(&self, frame: i32, out: &mut BezPath) {
        out.truncate(0);
        let track = match self {
            Property::Static(data) => return path::to_path(data, out),
            Property::Animated(track) => track,
        };
        match track.lookup(frame) {
            Lookup::Empty => {}
            Lookup::Before(s) => path::to_path(&s.value.start, out),
            Lookup::After(s) => path::to_path(&s.value.end, out),
            Lookup::Within(s) => {
                let t = s.progress(frame);
                path::lerp(&s.value.start, &s.value.end, t, out);
            }
        }
    }
}

/// Number properties blend through their [`Interpolatable`] impl.
impl<T: Interpolatable + Default> Property<T> {
    pub fn from_keyframes(track: KeyFrames<Linear<T>>) -> Self {
        Property::Animated(Box::new(track))
    }
}
