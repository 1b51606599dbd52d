//! Trim range resolution across offsets and wrap-around.

use lottie_core::{Property, Trim, TrimSegment, TrimType};

fn segment(start: f32, end: f32, offset: f32) -> TrimSegment {
    Trim {
        start: Property::new(start),
        end: Property::new(end),
        offset: Property::new(offset),
        trim_type: TrimType::Simultaneously,
    }
    .segment(0)
}

/// Fraction of the path a segment draws.
fn coverage(s: TrimSegment) -> f32 {
    if s.wraps() {
        (1.0 - s.start) + s.end
    } else {
        s.end - s.start
    }
}

#[test]
fn untrimmed_path_is_the_full_range() {
    assert_eq!(segment(0.0, 100.0, 0.0), TrimSegment::new(0.0, 1.0));
}

#[test]
fn reversed_full_range_still_covers_everything() {
    let s = segment(100.0, 0.0, 0.0);
    assert_eq!(coverage(s), 1.0);
}

#[test]
fn collapsed_range_draws_nothing() {
    for offset in [-720.0, -45.0, 0.0, 30.0, 359.0] {
        assert_eq!(segment(50.0, 50.0, offset), TrimSegment::new(0.0, 0.0));
    }
}

mod positive_offset {
    use super::*;

    #[test]
    fn both_bounds_stay_below_one() {
        assert_eq!(segment(12.5, 50.0, 90.0), TrimSegment::new(0.375, 0.75));
    }

    #[test]
    fn both_bounds_pass_one() {
        assert_eq!(segment(75.0, 87.5, 180.0), TrimSegment::new(0.25, 0.375));
    }

    #[test]
    fn start_passes_one() {
        let s = segment(75.0, 25.0, 180.0);
        assert_eq!(s, TrimSegment::new(0.75, 0.25));
        assert!(s.wraps());
    }

    #[test]
    fn end_passes_one() {
        let s = segment(25.0, 75.0, 180.0);
        assert_eq!(s, TrimSegment::new(0.75, 0.25));
        assert!(s.wraps());
    }

    #[test]
    fn whole_turns_are_discarded() {
        assert_eq!(segment(12.5, 50.0, 450.0), segment(12.5, 50.0, 90.0));
    }
}

mod non_positive_offset {
    use super::*;

    #[test]
    fn both_bounds_stay_above_zero() {
        assert_eq!(segment(50.0, 75.0, -90.0), TrimSegment::new(0.25, 0.5));
    }

    #[test]
    fn both_bounds_drop_below_zero() {
        assert_eq!(segment(12.5, 25.0, -180.0), TrimSegment::new(0.625, 0.75));
    }

    #[test]
    fn start_drops_below_zero() {
        let s = segment(12.5, 75.0, -90.0);
        assert_eq!(s, TrimSegment::new(0.875, 0.5));
        assert!(s.wraps());
        assert_eq!(coverage(s), 0.625);
    }

    #[test]
    fn end_drops_below_zero() {
        let s = segment(75.0, 12.5, -90.0);
        assert_eq!(s, TrimSegment::new(0.875, 0.5));
        assert!(s.wraps());
    }

    #[test]
    fn whole_turns_keep_the_sign() {
        assert_eq!(segment(50.0, 75.0, -450.0), segment(50.0, 75.0, -90.0));
    }
}
