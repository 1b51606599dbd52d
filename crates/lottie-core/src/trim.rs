use lottie_data::model::fuzzy_eq;

use crate::property::Property;

/// Portion of a path to draw, as fractions of its length.
///
/// `start <= end` is one range. `start > end` is a range that wraps around
/// the end of the path and stands for `[start, 1]` followed by `[0, end]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimSegment {
    pub start: f32,
    pub end: f32,
}

impl TrimSegment {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    fn no_loop(start: f32, end: f32) -> Self {
        debug_assert!(start >= 0.0 && end >= 0.0);
        Self::new(start.min(end), start.max(end))
    }

    fn wrapped(start: f32, end: f32) -> Self {
        debug_assert!(start >= 0.0 && end >= 0.0);
        Self::new(start.max(end), start.min(end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimType {
    /// Trim all paths of the group as one.
    #[default]
    Simultaneously,
    /// Trim each path on its own.
    Individually,
}

#[derive(Debug, Clone, Default)]
pub struct Trim {
    /// Percent.
    pub start: Property<f32>,
    /// Percent.
    pub end: Property<f32>,
    /// Degrees; a full turn shifts the range by the whole path length.
    pub offset: Property<f32>,
    pub trim_type: TrimType,
}

impl Trim {
    pub fn segment(&self, frame: i32) -> TrimSegment {
        let mut start = self.start.value_at(frame) / 100.0;
        let mut end = self.end.value_at(frame) / 100.0;
        let offset = (self.offset.value_at(frame) % 360.0) / 360.0;

        let diff = (start - end).abs();
        if fuzzy_eq(diff, 0.0) {
            return TrimSegment::new(0.0, 0.0);
        }
        if fuzzy_eq(diff, 1.0) {
            return TrimSegment::new(0.0, 1.0);
        }

        start += offset;
        end += offset;
        if offset > 0.0 {
            if start <= 1.0 && end <= 1.0 {
                TrimSegment::no_loop(start, end)
            } else if start > 1.0 && end > 1.0 {
                TrimSegment::no_loop(start - 1.0, end - 1.0)
            } else if start > 1.0 {
                TrimSegment::wrapped(start - 1.0, end)
            } else {
                TrimSegment::wrapped(start, end - 1.0)
            }
        } else if start >= 0.0 && end >= 0.0 {
            TrimSegment::no_loop(start, end)
        } else if start < 0.0 && end < 0.0 {
            TrimSegment::no_loop(1.0 + start, 1.0 + end)
        } else if start < 0.0 {
            TrimSegment::wrapped(1.0 + start, end)
        } else {
            TrimSegment::wrapped(start, 1.0 + end)
        }
    }

    pub fn is_static(&self) -> bool {
        self.start.is_static() && self.end.is_static() && self.offset.is_static()
    }

    pub fn cache(&mut self) {
        self.start.cache();
        self.end.cache();
        self.offset.cache();
    }
}
