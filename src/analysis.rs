//! Spread of walkers over a sphere, measured along great circles.

use std::f64::consts::PI;

use crate::errors::{ErrorKind, Result};
use crate::math::Point;

/// How a geodesic distance is reported.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AngleUnit {
    Radians,
    Degrees,
    /// Arc length on a sphere of the given radius.
    Arc(f64),
}

impl AngleUnit {
    #[inline]
    pub fn express(&self, angle: f64) -> f64 {
        match *self {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle * 180.0 / PI,
            AngleUnit::Arc(radius) => angle * radius,
        }
    }
}

/// Angle in `[0, pi]` between `a` and `b` as seen from `center`.
pub fn geodesic_angle(a: &Point, b: &Point, center: &Point) -> Result<f64> {
    let (a, b) = (*a - *center, *b - *center);
    let (norm_a, norm_b) = (a.norm(), b.norm());
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(ErrorKind::DegenerateVector.into());
    }

    let (a, b) = (a / norm_a, b / norm_b);
    let cos = a.dot(&b).max(-1.0).min(1.0);
    Ok(a.cross(&b).norm().atan2(cos))
}

pub fn geodesic_distance(a: &Point, b: &Point, center: &Point, unit: AngleUnit) -> Result<f64> {
    geodesic_angle(a, b, center).map(|angle| unit.express(angle))
}

/// Mean squared angle (radians) from `start` to each of `points`.
pub fn angular_variance(points: &[Point], start: &Point, center: &Point) -> Result<f64> {
    if points.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for point in points {
        let angle = geodesic_angle(point, start, center)?;
        total += angle * angle;
    }
    Ok(total / points.len() as f64)
}
