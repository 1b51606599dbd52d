//! Gradient paints and the decoding of their flat stop arrays.

use glam::Vec2;
use lottie_data::model::{CapStyle, Color, FillRule, GradientData, JoinStyle};

use crate::property::Property;
use crate::shapes::Dash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
}

/// One decoded color stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub position: f32,
    pub color: Color,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct Gradient {
    pub gradient_type: GradientType,
    pub start_point: Property<Vec2>,
    pub end_point: Property<Vec2>,
    pub highlight_length: Property<f32>,
    pub highlight_angle: Property<f32>,
    pub opacity: Property<f32>,
    pub stops: Property<GradientData>,
    /// Number of `(position, r, g, b)` quads at the head of the stop array;
    /// `-1` when the document predates the field and every value belongs to
    /// a color quad.
    pub color_points: i32,
    pub enabled: bool,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            gradient_type: GradientType::Linear,
            start_point: Property::default(),
            end_point: Property::default(),
            highlight_length: Property::new(0.0),
            highlight_angle: Property::new(0.0),
            opacity: Property::new(100.0),
            stops: Property::default(),
            color_points: -1,
            enabled: true,
        }
    }
}

impl Gradient {
    pub fn opacity(&self, frame: i32) -> f32 {
        self.opacity.value_at(frame) / 100.0
    }

    /// Decodes the stop array at `frame` into color stops, each with its alpha
    /// sampled from the trailing opacity pairs.
    pub fn stops(&self, frame: i32) -> Vec<GradientStop> {
        let data = self.stops.value_at(frame);
        let values = data.stops.as_slice();

        let quads = values.len() / 4;
        let color_points = match usize::try_from(self.color_points) {
            Ok(n) => n.min(quads),
            Err(_) => quads,
        };
        let (colors, opacities) = values.split_at(color_points * 4);
        let opacities = if opacities.len() % 2 != 0 {
            &[][..]
        } else {
            opacities
        };

        colors
            .chunks_exact(4)
            .map(|q| GradientStop {
                position: q[0],
                color: Color::new(q[1], q[2], q[3]),
                alpha: if opacities.is_empty() {
                    1.0
                } else {
                    opacity_at(opacities, q[0])
                },
            })
            .collect()
    }

    pub fn is_static(&self) -> bool {
        self.start_point.is_static()
            && self.end_point.is_static()
            && self.highlight_length.is_static()
            && self.highlight_angle.is_static()
            && self.opacity.is_static()
            && self.stops.is_static()
    }

    pub fn cache(&mut self) {
        self.start_point.cache();
        self.end_point.cache();
        self.highlight_length.cache();
        self.highlight_angle.cache();
        self.opacity.cache();
        self.stops.cache();
    }
}

/// Opacity at `position` from `(position, opacity)` pairs sorted by position.
///
/// Positions before the first pair take its opacity. Positions past the last
/// pair have no bracketing pair and are transparent.
fn opacity_at(pairs: &[f32], position: f32) -> f32 {
    if let [_, only] = pairs {
        return *only;
    }
    for w in pairs.windows(4).step_by(2) {
        let (last_pos, last_opacity, pos, opacity) = (w[0], w[1], w[2], w[3]);
        if pos >= position {
            let span = pos - last_pos;
            let progress = if span > 0.0 {
                ((position - last_pos) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            return last_opacity + progress * (opacity - last_opacity);
        }
    }
    0.0
}

#[derive(Debug, Clone, Default)]
pub struct GradientFill {
    pub gradient: Gradient,
    pub fill_rule: FillRule,
}

impl GradientFill {
    pub fn is_static(&self) -> bool {
        self.gradient.is_static()
    }

    pub fn cache(&mut self) {
        self.gradient.cache();
    }
}

#[derive(Debug, Clone, Default)]
pub struct GradientStroke {
    pub gradient: Gradient,
    pub width: Property<f32>,
    pub cap: CapStyle,
    pub join: JoinStyle,
    pub miter_limit: f32,
    pub dash: Dash,
}

impl GradientStroke {
    pub fn width(&self, frame: i32) -> f32 {
        self.width.value_at(frame)
    }

    pub fn is_static(&self) -> bool {
        self.gradient.is_static() && self.width.is_static() && self.dash.is_static()
    }

    pub fn cache(&mut self) {
        self.gradient.cache();
        self.width.cache();
        self.dash.cache();
    }
}
