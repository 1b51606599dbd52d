//! Shape, paint and container nodes.

use glam::{Mat4, Vec2, Vec3};
use kurbo::BezPath;
use lottie_data::model::{CapStyle, Color, FillRule, JoinStyle, PathData};

use crate::object::{Arena, ObjectId};
use crate::property::Property;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl ShapeDirection {
    /// Maps the document's direction code; only `3` reverses.
    pub fn from_raw(raw: i32) -> Self {
        if raw == 3 {
            ShapeDirection::CounterClockwise
        } else {
            ShapeDirection::Clockwise
        }
    }
}

/// Dash pattern entries: alternating dash and gap lengths followed by the
/// pattern offset.
#[derive(Debug, Clone, Default)]
pub struct Dash {
    pub entries: Vec<Property<f32>>,
}

impl Dash {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes `[dash, gap, .., offset]` at `frame` into `out`. A pattern with
    /// an even entry count lacks its final gap, which repeats the last dash.
    /// Fewer than two entries leave `out` empty.
    pub fn dash_info(&self, frame: i32, out: &mut Vec<f32>) {
        out.clear();
        let n = self.entries.len();
        if n < 2 {
            return;
        }
        out.reserve(n + 1);
        out.extend(self.entries.iter().map(|e| e.value_at(frame)));
        if n % 2 == 0 {
            out.push(out[n - 1]);
            out[n - 1] = out[n - 2];
        }
    }

    pub fn is_static(&self) -> bool {
        self.entries.iter().all(Property::is_static)
    }

    pub fn cache(&mut self) {
        self.entries.iter_mut().for_each(Property::cache);
    }
}

#[derive(Debug, Clone)]
pub struct Fill {
    pub color: Property<Color>,
    pub opacity: Property<f32>,
    pub fill_rule: FillRule,
    pub enabled: bool,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            color: Property::default(),
            opacity: Property::new(100.0),
            fill_rule: FillRule::Winding,
            enabled: true,
        }
    }
}

impl Fill {
    pub fn color(&self, frame: i32) -> Color {
        self.color.value_at(frame)
    }

    pub fn opacity(&self, frame: i32) -> f32 {
        self.opacity.value_at(frame) / 100.0
    }

    pub fn is_static(&self) -> bool {
        self.color.is_static() && self.opacity.is_static()
    }

    pub fn cache(&mut self) {
        self.color.cache();
        self.opacity.cache();
    }
}

#[derive(Debug, Clone)]
pub struct Stroke {
    pub color: Property<Color>,
    pub opacity: Property<f32>,
    pub width: Property<f32>,
    pub cap: CapStyle,
    pub join: JoinStyle,
    pub miter_limit: f32,
    pub dash: Dash,
    pub enabled: bool,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Property::default(),
            opacity: Property::new(100.0),
            width: Property::new(0.0),
            cap: CapStyle::Flat,
            join: JoinStyle::Miter,
            miter_limit: 0.0,
            dash: Dash::default(),
            enabled: true,
        }
    }
}

impl Stroke {
    pub fn color(&self, frame: i32) -> Color {
        self.color.value_at(frame)
    }

    pub fn opacity(&self, frame: i32) -> f32 {
        self.opacity.value_at(frame) / 100.0
    }

    pub fn width(&self, frame: i32) -> f32 {
        self.width.value_at(frame)
    }

    pub fn is_static(&self) -> bool {
        self.color.is_static()
            && self.opacity.is_static()
            && self.width.is_static()
            && self.dash.is_static()
    }

    pub fn cache(&mut self) {
        self.color.cache();
        self.opacity.cache();
        self.width.cache();
        self.dash.cache();
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoundedCorner {
    pub radius: Property<f32>,
}

impl RoundedCorner {
    pub fn radius(&self, frame: i32) -> f32 {
        self.radius.value_at(frame)
    }

    pub fn is_static(&self) -> bool {
        self.radius.is_static()
    }

    pub fn cache(&mut self) {
        self.radius.cache();
    }
}

#[derive(Debug, Clone, Default)]
pub struct Rect {
    pub direction: ShapeDirection,
    pub position: Property<Vec2>,
    pub size: Property<Vec2>,
    pub roundness: Property<f32>,
    /// A rounded-corner node in the same group overrides `roundness`.
    pub rounded_corner: Option<ObjectId>,
}

impl Rect {
    fn corner<'a>(&self, arena: &'a Arena) -> Option<&'a RoundedCorner> {
        self.rounded_corner.and_then(|id| arena.rounded_corner(id).ok())
    }

    pub fn roundness(&self, frame: i32, arena: &Arena) -> f32 {
        match self.corner(arena) {
            Some(corner) => corner.radius(frame),
            None => self.roundness.value_at(frame),
        }
    }

    pub fn roundness_changed(&self, prev_frame: i32, cur_frame: i32, arena: &Arena) -> bool {
        match self.corner(arena) {
            Some(corner) => corner.radius.changed(prev_frame, cur_frame),
            None => self.roundness.changed(prev_frame, cur_frame),
        }
    }

    /// Own channels only; a linked rounded corner is a separate node.
    pub fn is_static(&self) -> bool {
        self.position.is_static() && self.size.is_static() && self.roundness.is_static()
    }

    pub fn cache(&mut self) {
        self.position.cache();
        self.size.cache();
        self.roundness.cache();
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ellipse {
    pub direction: ShapeDirection,
    pub position: Property<Vec2>,
    pub size: Property<Vec2>,
}

impl Ellipse {
    pub fn is_static(&self) -> bool {
        self.position.is_static() && self.size.is_static()
    }

    pub fn cache(&mut self) {
        self.position.cache();
        self.size.cache();
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathShape {
    pub direction: ShapeDirection,
    pub shape: Property<PathData>,
}

impl PathShape {
    pub fn path_at(&self, frame: i32, out: &mut BezPath) {
        self.shape.path_at(frame, out);
    }

    pub fn is_static(&self) -> bool {
        self.shape.is_static()
    }

    pub fn cache(&mut self) {
        self.shape.cache();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolyType {
    Star,
    #[default]
    Polygon,
}

#[derive(Debug, Clone, Default)]
pub struct Polystar {
    pub direction: ShapeDirection,
    pub poly_type: PolyType,
    pub position: Property<Vec2>,
    pub point_count: Property<f32>,
    pub inner_radius: Property<f32>,
    pub outer_radius: Property<f32>,
    pub inner_roundness: Property<f32>,
    pub outer_roundness: Property<f32>,
    pub rotation: Property<f32>,
}

impl Polystar {
    pub fn is_static(&self) -> bool {
        self.position.is_static()
            && self.point_count.is_static()
            && self.inner_radius.is_static()
            && self.outer_radius.is_static()
            && self.inner_roundness.is_static()
            && self.outer_roundness.is_static()
            && self.rotation.is_static()
    }

    pub fn cache(&mut self) {
        self.position.cache();
        self.point_count.cache();
        self.inner_radius.cache();
        self.outer_radius.cache();
        self.inner_roundness.cache();
        self.outer_roundness.cache();
        self.rotation.cache();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMode {
    None,
    #[default]
    Add,
    Subtract,
    Intersect,
    Difference,
}

#[derive(Debug, Clone)]
pub struct Mask {
    pub shape: Property<PathData>,
    pub opacity: Property<f32>,
    pub inverted: bool,
    pub mode: MaskMode,
}

impl Default for Mask {
    fn default() -> Self {
        Self {
            shape: Property::default(),
            opacity: Property::new(100.0),
            inverted: false,
            mode: MaskMode::Add,
        }
    }
}

impl Mask {
    pub fn opacity(&self, frame: i32) -> f32 {
        self.opacity.value_at(frame) / 100.0
    }

    pub fn path_at(&self, frame: i32, out: &mut BezPath) {
        self.shape.path_at(frame, out);
    }

    pub fn is_static(&self) -> bool {
        self.shape.is_static() && self.opacity.is_static()
    }

    pub fn cache(&mut self) {
        self.shape.cache();
        self.opacity.cache();
    }
}

/// Ordered container of shape nodes with an optional transform node.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub children: Vec<ObjectId>,
    pub transform: Option<ObjectId>,
}

#[derive(Debug, Clone)]
pub struct RepeaterTransform {
    pub rotation: Property<f32>,
    pub scale: Property<Vec2>,
    pub position: Property<Vec2>,
    pub anchor: Property<Vec2>,
    pub start_opacity: Property<f32>,
    pub end_opacity: Property<f32>,
}

impl Default for RepeaterTransform {
    fn default() -> Self {
        Self {
            rotation: Property::new(0.0),
            scale: Property::new(Vec2::splat(100.0)),
            position: Property::default(),
            anchor: Property::default(),
            start_opacity: Property::new(100.0),
            end_opacity: Property::new(100.0),
        }
    }
}

impl RepeaterTransform {
    /// Transform of the copy at `multiplier` steps from the original:
    /// position and rotation scale linearly with it, scale compounds.
    pub fn matrix(&self, frame: i32, multiplier: f32) -> Mat4 {
        let scale = self.scale.value_at(frame) / 100.0;
        let scale = Vec3::new(scale.x.powf(multiplier), scale.y.powf(multiplier), 1.0);
        let anchor = self.anchor.value_at(frame).extend(0.0);

        Mat4::from_translation((self.position.value_at(frame) * multiplier).extend(0.0))
            * Mat4::from_translation(anchor)
            * Mat4::from_scale(scale)
            * Mat4::from_rotation_z((self.rotation.value_at(frame) * multiplier).to_radians())
            * Mat4::from_translation(-anchor)
    }

    pub fn start_opacity(&self, frame: i32) -> f32 {
        self.start_opacity.value_at(frame) / 100.0
    }

    pub fn end_opacity(&self, frame: i32) -> f32 {
        self.end_opacity.value_at(frame) / 100.0
    }

    pub fn is_static(&self) -> bool {
        self.rotation.is_static()
            && self.scale.is_static()
            && self.position.is_static()
            && self.anchor.is_static()
            && self.start_opacity.is_static()
            && self.end_opacity.is_static()
    }

    pub fn cache(&mut self) {
        self.rotation.cache();
        self.scale.cache();
        self.position.cache();
        self.anchor.cache();
        self.start_opacity.cache();
        self.end_opacity.cache();
    }
}

#[derive(Debug, Clone, Default)]
pub struct Repeater {
    /// Group holding the shapes to repeat.
    pub content: Option<ObjectId>,
    pub transform: RepeaterTransform,
    pub copies: Property<f32>,
    pub offset: Property<f32>,
    pub max_copies: f32,
    /// Set once the shapes preceding the repeater have been moved into
    /// `content`.
    pub processed: bool,
}

impl Repeater {
    pub fn copies(&self, frame: i32) -> f32 {
        self.copies.value_at(frame)
    }

    pub fn offset(&self, frame: i32) -> f32 {
        self.offset.value_at(frame)
    }

    pub fn max_copies(&self) -> i32 {
        self.max_copies as i32
    }

    pub fn is_static(&self) -> bool {
        self.transform.is_static() && self.copies.is_static() && self.offset.is_static()
    }

    pub fn cache(&mut self) {
        self.transform.cache();
        self.copies.cache();
        self.offset.cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dash(values: &[f32]) -> Dash {
        Dash {
            entries: values.iter().copied().map(Property::new).collect(),
        }
    }

    #[test]
    fn odd_dash_patterns_pass_through() {
        let mut out = vec![42.0];
        dash(&[4.0, 2.0, 1.0]).dash_info(0, &mut out);
        assert_eq!(out, vec![4.0, 2.0, 1.0]);
    }

    #[test]
    fn even_dash_patterns_repeat_the_last_dash_as_gap() {
        let mut out = Vec::new();
        dash(&[4.0, 2.0, 3.0, 7.0]).dash_info(0, &mut out);
        assert_eq!(out, vec![4.0, 2.0, 3.0, 3.0, 7.0]);
    }

    #[test]
    fn short_dash_patterns_are_empty() {
        let mut out = vec![1.0];
        dash(&[5.0]).dash_info(0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn direction_code_three_is_counter_clockwise() {
        assert_eq!(ShapeDirection::from_raw(3), ShapeDirection::CounterClockwise);
        assert_eq!(ShapeDirection::from_raw(1), ShapeDirection::Clockwise);
        assert_eq!(ShapeDirection::from_raw(2), ShapeDirection::Clockwise);
    }

    #[test]
    fn repeater_matrix_scales_with_the_copy_index() {
        let transform = RepeaterTransform {
            position: Property::new(Vec2::new(10.0, 0.0)),
            scale: Property::new(Vec2::new(50.0, 50.0)),
            ..Default::default()
        };
        let m = transform.matrix(0, 2.0);
        let p = m.transform_point3(Vec3::new(8.0, 0.0, 0.0));
        // 8 * 0.5^2 + 10 * 2
        assert!(p.distance(Vec3::new(22.0, 0.0, 0.0)) < 1e-4);
        assert_eq!(transform.matrix(0, 0.0), Mat4::IDENTITY);
    }

    #[test]
    fn paint_opacity_is_normalised() {
        let fill = Fill {
            opacity: Property::new(40.0),
            ..Default::default()
        };
        assert_eq!(fill.opacity(0), 0.4);
        assert_eq!(fill.color(0), Color::WHITE);
        assert_eq!(Stroke::default().opacity(3), 1.0);
    }

    #[test]
    fn mask_writes_its_shape_and_normalises_opacity() {
        let mask = Mask {
            shape: Property::new(PathData::new(
                vec![Vec2::ZERO, Vec2::ZERO, Vec2::X, Vec2::X],
                true,
            )),
            opacity: Property::new(25.0),
            inverted: true,
            mode: MaskMode::Subtract,
        };
        let mut out = BezPath::new();
        mask.path_at(0, &mut out);
        assert_eq!(out.elements().len(), 3);
        assert_eq!(mask.opacity(0), 0.25);
        assert!(mask.is_static());
        assert_eq!(Mask::default().mode, MaskMode::Add);
    }
}
