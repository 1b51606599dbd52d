//! Conversion of stored point lists into path buffers.

use glam::Vec2;
use kurbo::{BezPath, Point};
use lottie_data::model::PathData;

#[inline]
fn pt(v: Vec2) -> Point {
    Point::new(f64::from(v.x), f64::from(v.y))
}

fn emit(points: impl Iterator<Item = Vec2>, closed: bool, out: &mut BezPath) {
    let mut points = points;
    let Some(first) = points.next() else {
        return;
    };
    out.move_to(pt(first));
    while let (Some(c1), Some(c2), Some(end)) = (points.next(), points.next(), points.next()) {
        out.curve_to(pt(c1), pt(c2), pt(end));
    }
    if closed {
        out.close_path();
    }
}

/// Appends `data` to `out`: a `moveTo`, one `cubicTo` per complete triple of
/// the remaining points, and a close when the data is closed.
pub fn to_path(data: &PathData, out: &mut BezPath) {
    emit(data.points.iter().copied(), data.closed, out);
}

/// Appends the blend of `start` and `end` at `t` to `out`.
///
/// Point lists of different lengths are truncated to the shorter one. The
/// result is closed when `start` is.
pub fn lerp(start: &PathData, end: &PathData, t: f32, out: &mut BezPath) {
    let points = start
        .points
        .iter()
        .zip(&end.points)
        .map(|(a, b)| a.lerp(*b, t));
    emit(points, start.closed, out);
}

#[cfg(test)]
mod tests {
    use kurbo::PathEl;

    use super::*;

    fn data(points: &[(f32, f32)], closed: bool) -> PathData {
        PathData::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(), closed)
    }

    fn points_of(path: &BezPath) -> Vec<Point> {
        path.elements()
            .iter()
            .flat_map(|el| match *el {
                PathEl::MoveTo(p) => vec![p],
                PathEl::CurveTo(a, b, c) => vec![a, b, c],
                _ => vec![],
            })
            .collect()
    }

    #[test]
    fn lerp_endpoints_reproduce_inputs() {
        let a = data(&[(0.0, 0.0), (1.0, 2.0), (3.0, 4.0), (5.0, 6.0)], true);
        let b = data(&[(10.0, 0.0), (11.0, 12.0), (13.0, 14.0), (15.0, 16.0)], false);

        let mut out = BezPath::new();
        lerp(&a, &b, 0.0, &mut out);
        assert_eq!(points_of(&out), a.points.iter().map(|v| pt(*v)).collect::<Vec<_>>());
        assert_eq!(out.elements().last(), Some(&PathEl::ClosePath));

        let mut out = BezPath::new();
        lerp(&a, &b, 1.0, &mut out);
        assert_eq!(points_of(&out), b.points.iter().map(|v| pt(*v)).collect::<Vec<_>>());
        // Closed flag follows the start path.
        assert_eq!(out.elements().last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn lerp_truncates_to_the_shorter_input() {
        let a = data(
            &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (5.0, 5.0), (6.0, 6.0)],
            false,
        );
        let b = data(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)], false);
        let mut out = BezPath::new();
        lerp(&a, &b, 0.5, &mut out);
        assert_eq!(out.elements().len(), 2);
    }

    #[test]
    fn empty_input_produces_an_empty_path() {
        let mut out = BezPath::new();
        lerp(&PathData::default(), &data(&[(1.0, 1.0)], true), 0.5, &mut out);
        assert!(out.elements().is_empty());
        to_path(&PathData::default(), &mut out);
        assert!(out.elements().is_empty());
    }

    #[test]
    fn incomplete_trailing_triples_are_dropped() {
        let mut out = BezPath::new();
        to_path(&data(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)], false), &mut out);
        assert_eq!(out.elements().len(), 2);
    }
}
