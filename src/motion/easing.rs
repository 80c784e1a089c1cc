//! Timing curves.

use serde::{Deserialize, Serialize};

/// Control points of the site's standard curve (a soft ease-out).
pub const SITE_CURVE: [f32; 4] = [0.25, 0.46, 0.45, 0.94];

/// Maps linear progress to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// CSS `ease-out`.
    #[default]
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
    CubicBezier([f32; 4]),
}

impl Easing {
    /// The curve every section uses unless told otherwise.
    pub const fn site() -> Self {
        Easing::CubicBezier(SITE_CURVE)
    }

    /// Control points, if this is a bezier curve.
    fn points(&self) -> Option<[f32; 4]> {
        match *self {
            Easing::Linear => None,
            Easing::EaseOut => Some([0.0, 0.0, 0.58, 1.0]),
            Easing::EaseInOut => Some([0.42, 0.0, 0.58, 1.0]),
            Easing::CubicBezier(points) => Some(points),
        }
    }

    /// A bezier is usable only if both x control points lie in [0, 1] and
    /// every coordinate is finite.
    pub fn is_valid(&self) -> bool {
        match self.points() {
            None => true,
            Some([x1, y1, x2, y2]) => {
                [x1, y1, x2, y2].iter().all(|v| v.is_finite())
                    && (0.0..=1.0).contains(&x1)
                    && (0.0..=1.0).contains(&x2)
            }
        }
    }

    /// Eased progress for linear progress `t`, clamped to [0, 1].
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self.points() {
            None => t,
            Some(_) if t == 0.0 || t == 1.0 => t,
            Some([x1, y1, x2, y2]) => {
                let s = solve_bezier_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }
}

/// One axis of a cubic bezier anchored at 0 and 1.
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`.
///
/// Newton first, bisection if the slope flattens out.
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < 1e-6 {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < 1e-6 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}
