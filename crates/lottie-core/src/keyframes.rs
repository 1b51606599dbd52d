//! Keyframe tracks: ordered time segments, each blending between two values
//! under an optional easing curve.

use std::sync::Arc;

use glam::Vec2;
use kurbo::{CubicBez, ParamCurve, ParamCurveArclen, ParamCurveDeriv, Point};
use lottie_data::model::fuzzy_is_zero;
use tracing::warn;

use crate::animatable::{Easing, Interpolatable};
use crate::error::ModelError;

const ARCLEN_ACCURACY: f64 = 1e-3;

/// Endpoints of one keyframe segment and the rule for blending them.
pub trait SegmentValue {
    type Output: Clone + Default;

    fn start(&self) -> &Self::Output;
    fn end(&self) -> &Self::Output;
    fn at(&self, t: f32) -> Self::Output;

    /// Direction of travel in degrees at progress `t`. Only spatial values
    /// have one.
    fn angle(&self, _t: f32) -> f32 {
        0.0
    }

    /// Resolves build-time caches. Must be idempotent.
    fn cache(&mut self) {}
}

/// Plain `start + t * (end - start)` blending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear<T> {
    pub start: T,
    pub end: T,
}

impl<T> Linear<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }
}

impl<T: Interpolatable + Default> SegmentValue for Linear<T> {
    type Output = T;

    fn start(&self) -> &T {
        &self.start
    }

    fn end(&self) -> &T {
        &self.end
    }

    fn at(&self, t: f32) -> T {
        self.start.lerp(&self.end, t)
    }
}

#[inline]
fn to_point(v: Vec2) -> Point {
    Point::new(f64::from(v.x), f64::from(v.y))
}

#[inline]
fn to_vec2(p: Point) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32)
}

/// A position segment that may travel along a cubic curve.
///
/// Tangents are given as offsets from the segment endpoints and resolved to
/// absolute control points by [`SegmentValue::cache`], which also measures
/// the curve. Until then, or when the curve has no length, the segment
/// blends linearly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spatial {
    pub start: Vec2,
    pub end: Vec2,
    in_tangent: Vec2,
    out_tangent: Vec2,
    length: f32,
    has_tangent: bool,
    resolved: bool,
}

impl Spatial {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            ..Default::default()
        }
    }

    /// `out_tangent` leaves `start`, `in_tangent` arrives at `end`; both are
    /// relative to their endpoint.
    pub fn with_tangents(start: Vec2, end: Vec2, out_tangent: Vec2, in_tangent: Vec2) -> Self {
        Self {
            start,
            end,
            in_tangent,
            out_tangent,
            length: 0.0,
            has_tangent: true,
            resolved: false,
        }
    }

    pub fn has_tangent(&self) -> bool {
        self.has_tangent
    }

    /// Arc length of the resolved curve, 0 before caching.
    pub fn length(&self) -> f32 {
        self.length
    }

    fn follows_curve(&self) -> bool {
        self.resolved && self.has_tangent
    }

    fn curve(&self) -> CubicBez {
        CubicBez::new(
            to_point(self.start),
            to_point(self.out_tangent),
            to_point(self.in_tangent),
            to_point(self.end),
        )
    }

    /// Curve parameter at which `t` of the total length has been travelled.
    fn param_at(&self, curve: &CubicBez, t: f32) -> f64 {
        let target = f64::from(t.clamp(0.0, 1.0)) * f64::from(self.length);
        curve.inv_arclen(target, ARCLEN_ACCURACY)
    }
}

impl SegmentValue for Spatial {
    type Output = Vec2;

    fn start(&self) -> &Vec2 {
        &self.start
    }

    fn end(&self) -> &Vec2 {
        &self.end
    }

    fn at(&self, t: f32) -> Vec2 {
        if self.follows_curve() {
            let curve = self.curve();
            return to_vec2(curve.eval(self.param_at(&curve, t)));
        }
        self.start.lerp(self.end, t)
    }

    fn angle(&self, t: f32) -> f32 {
        if !self.follows_curve() {
            return 0.0;
        }
        let curve = self.curve();
        let d = curve.deriv().eval(self.param_at(&curve, t));
        if d.x == 0.0 && d.y == 0.0 {
            return 0.0;
        }
        let degrees = d.y.atan2(d.x).to_degrees() as f32;
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    }

    fn cache(&mut self) {
        if self.resolved {
            return;
        }
        self.resolved = true;
        if !self.has_tangent {
            return;
        }
        self.in_tangent += self.end;
        self.out_tangent += self.start;
        self.length = self.curve().arclen(ARCLEN_ACCURACY) as f32;
        if fuzzy_is_zero(self.length) {
            self.has_tangent = false;
        }
    }
}

/// One keyframe interval `[start, end)`.
///
/// A segment without an easing curve holds its start value for its whole
/// duration.
#[derive(Debug, Clone)]
pub struct Segment<V> {
    pub start: f32,
    pub end: f32,
    pub easing: Option<Arc<Easing>>,
    pub value: V,
}

impl<V: SegmentValue> Segment<V> {
    pub fn new(start: f32, end: f32, easing: Option<Arc<Easing>>, value: V) -> Self {
        Self {
            start,
            end,
            easing,
            value,
        }
    }

    /// Eased local progress in `[0, 1]` for a frame inside the segment.
    pub fn progress(&self, frame: i32) -> f32 {
        match &self.easing {
            Some(easing) => easing.value((frame as f32 - self.start) / (self.end - self.start)),
            None => 0.0,
        }
    }

    pub fn value(&self, frame: i32) -> V::Output {
        self.value.at(self.progress(frame))
    }

    pub fn angle(&self, frame: i32) -> f32 {
        self.value.angle(self.progress(frame))
    }
}

/// Where a frame falls relative to a track.
pub(crate) enum Lookup<'a, V> {
    Empty,
    /// At or before the first segment start.
    Before(&'a Segment<V>),
    /// At or after the end of this segment, with no later segment covering
    /// the frame.
    After(&'a Segment<V>),
    Within(&'a Segment<V>),
}

/// An ordered, non-overlapping list of keyframe segments.
#[derive(Debug, Clone)]
pub struct KeyFrames<V> {
    segments: Vec<Segment<V>>,
}

impl<V> Default for KeyFrames<V> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
        }
    }
}

impl<V: SegmentValue> KeyFrames<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment. Segments must arrive in time order and must not
    /// overlap the previous one.
    pub fn push(&mut self, segment: Segment<V>) -> Result<(), ModelError> {
        if segment.end < segment.start {
            warn!(start = segment.start, end = segment.end, "rejected inverted keyframe segment");
            return Err(ModelError::InvertedSegment {
                start: segment.start,
                end: segment.end,
            });
        }
        if let Some(last) = self.segments.last() {
            if segment.start < last.end {
                warn!(
                    start = segment.start,
                    previous_end = last.end,
                    "rejected overlapping keyframe segment"
                );
                return Err(ModelError::OverlappingSegment {
                    start: segment.start,
                    previous_end: last.end,
                });
            }
        }
        self.segments.push(segment);
        Ok(())
    }

    pub fn segments(&self) -> &[Segment<V>] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn lookup(&self, frame: i32) -> Lookup<'_, V> {
        let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
            return Lookup::Empty;
        };
        let f = frame as f32;
        if first.start >= f {
            return Lookup::Before(first);
        }
        if last.end <= f {
            return Lookup::After(last);
        }
        // first.start < f, so at least one segment starts at or before f.
        let idx = self.segments.partition_point(|s| s.start <= f);
        let segment = &self.segments[idx - 1];
        if f < segment.end {
            Lookup::Within(segment)
        } else {
            Lookup::After(segment)
        }
    }

    pub fn value(&self, frame: i32) -> V::Output {
        match self.lookup(frame) {
            Lookup::Empty => V::Output::default(),
            Lookup::Before(s) => s.value.start().clone(),
            Lookup::After(s) => s.value.end().clone(),
            Lookup::Within(s) => s.value(frame),
        }
    }

    pub fn angle(&self, frame: i32) -> f32 {
        match self.lookup(frame) {
            Lookup::Within(s) => s.angle(frame),
            _ => 0.0,
        }
    }

    /// `false` when both frames lie before the first segment or both at or
    /// after the last segment end, where the track cannot move.
    pub fn changed(&self, prev_frame: i32, cur_frame: i32) -> bool {
        let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
            return false;
        };
        let (prev, cur) = (prev_frame as f32, cur_frame as f32);
        let both_before = prev < first.start && cur < first.start;
        let both_after = prev >= last.end && cur >= last.end;
        !(both_before || both_after)
    }

    pub fn cache(&mut self) {
        for segment in &mut self.segments {
            segment.value.cache();
        }
    }
}
