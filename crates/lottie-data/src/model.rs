use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::unicode::Unicode;

const FUZZY_EPSILON: f32 = f32::EPSILON;
const ZERO_EPSILON: f32 = 0.000_001;

/// Float equality within machine epsilon.
#[inline]
pub fn fuzzy_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < FUZZY_EPSILON
}

#[inline]
pub fn fuzzy_is_zero(v: f32) -> bool {
    v.abs() <= ZERO_EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatteType {
    #[default]
    None,
    Alpha,
    AlphaInv,
    Luma,
    LumaInv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    EvenOdd,
    #[default]
    Winding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CapStyle {
    #[default]
    Flat,
    Square,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinStyle {
    #[default]
    Miter,
    Bevel,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
}

/// RGB color with channels in `[0, 1]`. Alpha travels separately as opacity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Quantizes to 8-bit RGBA.
    pub fn to_rgba8(self, alpha: f32) -> [u8; 4] {
        [
            (255.0 * self.r) as u8,
            (255.0 * self.g) as u8,
            (255.0 * self.b) as u8,
            (255.0 * alpha) as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        fuzzy_eq(self.r, other.r) && fuzzy_eq(self.g, other.g) && fuzzy_eq(self.b, other.b)
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Sub for Color {
    type Output = Color;
    fn sub(self, rhs: Color) -> Color {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul<f32> for Color {
    type Output = Color;
    fn mul(self, m: f32) -> Color {
        Color::new(self.r * m, self.g * m, self.b * m)
    }
}

impl Mul<Color> for f32 {
    type Output = Color;
    fn mul(self, c: Color) -> Color {
        c * self
    }
}

/// Cubic bezier point list: one `moveTo` point followed by `cubicTo`
/// triples (control 1, control 2, end point).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub points: Vec<Vec2>,
    #[serde(default)]
    pub closed: bool,
}

impl PathData {
    pub fn new(points: Vec<Vec2>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.points.reserve(additional);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of complete cubic segments after the leading point.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1) / 3
    }
}

/// Flat gradient stop array as stored in the document: `color_points`
/// quads of `(position, r, g, b)` followed by `(position, opacity)` pairs.
///
/// Arithmetic between two arrays of different lengths returns the left
/// operand unchanged. Keyframe endpoints of one animated gradient are
/// expected to share a length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientData {
    pub stops: Vec<f32>,
}

impl GradientData {
    pub fn new(stops: Vec<f32>) -> Self {
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    fn zip_with(&self, other: &GradientData, op: impl Fn(f32, f32) -> f32) -> GradientData {
        if self.stops.len() != other.stops.len() {
            return self.clone();
        }
        GradientData {
            stops: self
                .stops
                .iter()
                .zip(&other.stops)
                .map(|(a, b)| op(*a, *b))
                .collect(),
        }
    }
}

impl Add for &GradientData {
    type Output = GradientData;
    fn add(self, rhs: &GradientData) -> GradientData {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for &GradientData {
    type Output = GradientData;
    fn sub(self, rhs: &GradientData) -> GradientData {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul<f32> for &GradientData {
    type Output = GradientData;
    fn mul(self, m: f32) -> GradientData {
        GradientData {
            stops: self.stops.iter().map(|v| v * m).collect(),
        }
    }
}

impl Mul<&GradientData> for f32 {
    type Output = GradientData;
    fn mul(self, g: &GradientData) -> GradientData {
        g * self
    }
}

/// Full text style and content snapshot, effective from `time` onwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextDocument {
    pub time: i32,
    pub size: i32,
    pub font: String,
    pub text: Unicode,
    pub justification: Justification,
    pub tracking: f32,
    pub line_height: f32,
    pub baseline_shift: f32,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub stroke_over_fill: bool,
}

impl PartialEq for TextDocument {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.font == other.font
            && self.text == other.text
            && self.justification == other.justification
            && fuzzy_eq(self.tracking, other.tracking)
            && fuzzy_eq(self.line_height, other.line_height)
            && fuzzy_eq(self.baseline_shift, other.baseline_shift)
            && self.fill_color == other.fill_color
            && self.stroke_color == other.stroke_color
            && fuzzy_eq(self.stroke_width, other.stroke_width)
            && self.stroke_over_fill == other.stroke_over_fill
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub start_frame: i32,
    pub end_frame: i32,
}
