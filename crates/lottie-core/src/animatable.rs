use glam::Vec2;
use lottie_data::model::{Color, GradientData, PathData};

/// Values a keyframe segment can blend between.
pub trait Interpolatable: Sized + Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolatable for Vec2 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec2::lerp(*self, *other, t)
    }
}

impl Interpolatable for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

// Endpoints with different stop counts hold the start value.
impl Interpolatable for GradientData {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if self.len() != other.len() {
            return self.clone();
        }
        let delta = other - self;
        self + &(&delta * t)
    }
}

impl Interpolatable for PathData {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let points = self
            .points
            .iter()
            .zip(&other.points)
            .map(|(a, b)| a.lerp(b, t))
            .collect();
        PathData {
            points,
            closed: self.closed,
        }
    }
}

const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP: f32 = 1.0 / (SPLINE_TABLE_SIZE as f32 - 1.0);
const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f32 = 0.02;
const SUBDIVISION_PRECISION: f32 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;

#[inline]
fn coeff_a(a1: f32, a2: f32) -> f32 {
    1.0 - 3.0 * a2 + 3.0 * a1
}

#[inline]
fn coeff_b(a1: f32, a2: f32) -> f32 {
    3.0 * a2 - 6.0 * a1
}

#[inline]
fn coeff_c(a1: f32) -> f32 {
    3.0 * a1
}

/// Value of one coordinate of the timing curve at parameter `t`.
#[inline]
fn calc_bezier(t: f32, a1: f32, a2: f32) -> f32 {
    ((coeff_a(a1, a2) * t + coeff_b(a1, a2)) * t + coeff_c(a1)) * t
}

#[inline]
fn slope(t: f32, a1: f32, a2: f32) -> f32 {
    3.0 * coeff_a(a1, a2) * t * t + 2.0 * coeff_b(a1, a2) * t + coeff_c(a1)
}

/// Cubic-bezier timing curve from `(0, 0)` to `(1, 1)` through the control
/// points `p1` and `p2`.
///
/// The curve x-coordinate is sampled once at construction; evaluation
/// refines the sampled guess with Newton-Raphson, or bisection where the
/// curve is too flat for Newton steps to converge.
#[derive(Debug, Clone, PartialEq)]
pub struct Easing {
    p1: Vec2,
    p2: Vec2,
    samples: [f32; SPLINE_TABLE_SIZE],
}

impl Easing {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        let p1 = Vec2::new(p1.x.clamp(0.0, 1.0), p1.y);
        let p2 = Vec2::new(p2.x.clamp(0.0, 1.0), p2.y);
        let mut samples = [0.0; SPLINE_TABLE_SIZE];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = calc_bezier(i as f32 * SAMPLE_STEP, p1.x, p2.x);
        }
        Self { p1, p2, samples }
    }

    pub fn linear() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE)
    }

    pub fn control_points(&self) -> (Vec2, Vec2) {
        (self.p1, self.p2)
    }

    fn is_linear(&self) -> bool {
        self.p1.x == self.p1.y && self.p2.x == self.p2.y
    }

    /// Eased progress for the linear progress `x`, clamped to `[0, 1]` on input.
    pub fn value(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if self.is_linear() {
            return x;
        }
        calc_bezier(self.t_for_x(x), self.p1.y, self.p2.y)
    }

    fn t_for_x(&self, x: f32) -> f32 {
        let mut interval_start = 0.0;
        let mut current = 1;
        let last = SPLINE_TABLE_SIZE - 1;
        while current != last && self.samples[current] <= x {
            interval_start += SAMPLE_STEP;
            current += 1;
        }
        current -= 1;

        let span = self.samples[current + 1] - self.samples[current];
        let dist = if span > 0.0 {
            (x - self.samples[current]) / span
        } else {
            0.0
        };
        let guess = interval_start + dist * SAMPLE_STEP;

        let initial_slope = slope(guess, self.p1.x, self.p2.x);
        if initial_slope >= NEWTON_MIN_SLOPE {
            self.newton_raphson(x, guess)
        } else if initial_slope == 0.0 {
            guess
        } else {
            self.binary_subdivide(x, interval_start, interval_start + SAMPLE_STEP)
        }
    }

    fn newton_raphson(&self, x: f32, mut t: f32) -> f32 {
        for _ in 0..NEWTON_ITERATIONS {
            let s = slope(t, self.p1.x, self.p2.x);
            if s == 0.0 {
                return t;
            }
            let err = calc_bezier(t, self.p1.x, self.p2.x) - x;
            t -= err / s;
        }
        t
    }

    fn binary_subdivide(&self, x: f32, mut a: f32, mut b: f32) -> f32 {
        let mut t = a;
        for _ in 0..SUBDIVISION_MAX_ITERATIONS {
            t = a + (b - a) / 2.0;
            let err = calc_bezier(t, self.p1.x, self.p2.x) - x;
            if err.abs() <= SUBDIVISION_PRECISION {
                break;
            }
            if err > 0.0 {
                b = t;
            } else {
                a = t;
            }
        }
        t
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::linear()
    }
}
