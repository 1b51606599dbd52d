//! Text layers: document snapshots over time and per-character animators.

use glam::Vec2;
use lottie_data::model::{Color, Justification, TextDocument};
use serde::Serialize;

use crate::animatable::Interpolatable;
use crate::property::Property;

/// One channel an animator drives, with its target value.
#[derive(Debug, Clone)]
pub enum TextAnimatedProperty {
    Opacity(Property<f32>),
    Rotation(Property<f32>),
    Tracking(Property<f32>),
    StrokeWidth(Property<f32>),
    Position(Property<Vec2>),
    Scale(Property<Vec2>),
    Anchor(Property<Vec2>),
    StrokeColor(Property<Color>),
    FillColor(Property<Color>),
}

fn blend<T: Interpolatable>(current: &mut T, target: &T, progress: f32) {
    *current = current.lerp(target, progress);
}

impl TextAnimatedProperty {
    /// Moves the matching channel of `chr` towards this property's value by
    /// `progress`.
    fn apply(&self, frame: i32, chr: &mut CharAnimatedProperties, progress: f32) {
        match self {
            Self::Opacity(p) => blend(&mut chr.opacity, &p.value_at(frame), progress),
            Self::Rotation(p) => blend(&mut chr.rotation, &p.value_at(frame), progress),
            Self::Tracking(p) => blend(&mut chr.tracking, &p.value_at(frame), progress),
            Self::StrokeWidth(p) => blend(&mut chr.stroke_width, &p.value_at(frame), progress),
            Self::Position(p) => blend(&mut chr.position, &p.value_at(frame), progress),
            Self::Scale(p) => blend(&mut chr.scale, &p.value_at(frame), progress),
            Self::Anchor(p) => blend(&mut chr.anchor, &p.value_at(frame), progress),
            Self::StrokeColor(p) => blend(&mut chr.stroke_color, &p.value_at(frame), progress),
            Self::FillColor(p) => blend(&mut chr.fill_color, &p.value_at(frame), progress),
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Self::Opacity(p) | Self::Rotation(p) | Self::Tracking(p) | Self::StrokeWidth(p) => {
                p.is_static()
            }
            Self::Position(p) | Self::Scale(p) | Self::Anchor(p) => p.is_static(),
            Self::StrokeColor(p) | Self::FillColor(p) => p.is_static(),
        }
    }

    pub fn cache(&mut self) {
        match self {
            Self::Opacity(p) | Self::Rotation(p) | Self::Tracking(p) | Self::StrokeWidth(p) => {
                p.cache()
            }
            Self::Position(p) | Self::Scale(p) | Self::Anchor(p) => p.cache(),
            Self::StrokeColor(p) | Self::FillColor(p) => p.cache(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeUnit {
    /// Bounds are percentages of the text length.
    Percentage,
    /// Bounds are character indices.
    #[default]
    Index,
}

#[derive(Debug, Clone)]
pub struct RangeSelector {
    pub unit: RangeUnit,
    pub start: Property<f32>,
    pub end: Property<f32>,
}

impl Default for RangeSelector {
    fn default() -> Self {
        Self {
            unit: RangeUnit::Index,
            start: Property::new(0.0),
            end: Property::new(100.0),
        }
    }
}

impl RangeSelector {
    /// Range bounds at `frame` in character index units.
    pub fn bounds(&self, frame: i32, text_len: usize) -> (f32, f32) {
        let start = self.start.value_at(frame);
        let end = self.end.value_at(frame);
        match self.unit {
            RangeUnit::Index => (start, end),
            RangeUnit::Percentage => {
                let len = text_len as f32;
                (start / 100.0 * len, end / 100.0 * len)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextAnimator {
    pub name: String,
    pub properties: Vec<TextAnimatedProperty>,
    pub range: RangeSelector,
    /// Whether the document declared a range selector at all.
    pub has_range: bool,
}

impl TextAnimator {
    pub fn is_static(&self) -> bool {
        self.range.start.is_static()
            && self.range.end.is_static()
            && self.properties.iter().all(TextAnimatedProperty::is_static)
    }

    pub fn cache(&mut self) {
        self.range.start.cache();
        self.range.end.cache();
        self.properties.iter_mut().for_each(TextAnimatedProperty::cache);
    }
}

/// How much of character `index`, the interval `[index, index + 1)`, lies
/// inside the selected range `[start, end)`.
pub fn range_progress(index: usize, start: f32, end: f32) -> f32 {
    let i = index as f32;
    let next = i + 1.0;
    if start <= i && next <= end {
        1.0
    } else if start >= i && end <= next {
        end - start
    } else if start <= i && end >= i && end <= next {
        end - i
    } else if start >= i && start <= next && end >= next {
        next - start
    } else {
        0.0
    }
}

/// Animated appearance of one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharAnimatedProperties {
    pub opacity: f32,
    pub rotation: f32,
    pub tracking: f32,
    pub stroke_width: f32,
    pub position: Vec2,
    pub scale: Vec2,
    pub anchor: Vec2,
    pub fill_color: Color,
    pub stroke_color: Color,
}

impl Default for CharAnimatedProperties {
    fn default() -> Self {
        Self {
            opacity: 100.0,
            rotation: 0.0,
            tracking: 0.0,
            stroke_width: 0.0,
            position: Vec2::ZERO,
            scale: Vec2::splat(100.0),
            anchor: Vec2::ZERO,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
        }
    }
}

/// Text state of a layer at one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextData {
    pub stroke_over_fill: bool,
    pub justification: Justification,
    pub font_size: i32,
    pub ascent: f32,
    pub line_height: f32,
    pub baseline_shift: f32,
    /// One entry per character, or a single entry for the whole text when
    /// no animator selects a range.
    pub chars: Vec<CharAnimatedProperties>,
}

#[derive(Debug, Clone, Default)]
pub struct TextLayerData {
    /// Ordered by time; each is in effect from its time until the next.
    pub documents: Vec<TextDocument>,
    pub animators: Vec<TextAnimator>,
}

impl TextLayerData {
    /// The document in effect at `frame`: the last one whose time is not
    /// after `frame`, or the first one for frames before all of them.
    pub fn text_document(&self, frame: i32) -> Option<&TextDocument> {
        let idx = self.documents.partition_point(|d| d.time <= frame);
        self.documents.get(idx.saturating_sub(1))
    }

    pub fn is_static(&self) -> bool {
        self.animators.is_empty() && self.documents.len() <= 1
    }

    pub fn has_range(&self) -> bool {
        self.animators.iter().any(|a| a.has_range)
    }

    pub fn get_text_data(&self, frame: i32) -> TextData {
        let mut data = TextData::default();
        self.fill_text_data(frame, &mut data);
        data
    }

    /// Writes the snapshot at `frame` into `out`, reusing its character list.
    pub fn fill_text_data(&self, frame: i32, out: &mut TextData) {
        out.chars.clear();
        let Some(doc) = self.text_document(frame) else {
            return;
        };

        out.font_size = doc.size;
        out.justification = doc.justification;
        out.line_height = doc.line_height;
        out.baseline_shift = doc.baseline_shift;
        out.stroke_over_fill = doc.stroke_over_fill;

        let len = if self.is_static() || !self.has_range() {
            1
        } else {
            doc.text.len()
        };

        out.chars.extend((0..len).map(|i| {
            let mut chr = CharAnimatedProperties {
                stroke_width: doc.stroke_width,
                fill_color: doc.fill_color,
                stroke_color: doc.stroke_color,
                ..Default::default()
            };
            for animator in &self.animators {
                let (start, end) = animator.range.bounds(frame, len);
                let progress = range_progress(i, start, end);
                if progress > 0.0 {
                    for property in &animator.properties {
                        property.apply(frame, &mut chr, progress);
                    }
                }
            }
            chr
        }));
    }

    pub fn cache(&mut self) {
        self.animators.iter_mut().for_each(TextAnimator::cache);
    }
}
