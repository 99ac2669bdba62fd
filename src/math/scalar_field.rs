use crate::math::Point;

/// An implicit surface: negative inside, positive outside, zero on the boundary.
///
/// Implementations must be pure; the gradient estimate evaluates the field up
/// to one step outside the sampled domain.
pub trait ScalarField {
    fn value_at(&self, x: f64, y: f64, z: f64) -> f64;

    #[inline]
    fn value_at_point(&self, p: &Point) -> f64 {
        self.value_at(p.x, p.y, p.z)
    }

    /// Central difference estimate of the gradient with step `h`.
    #[inline]
    fn gradient_at(&self, x: f64, y: f64, z: f64, h: f64) -> [f64; 3] {
        let inv_2h = 1.0 / (2.0 * h);
        let dx = self.value_at(x + h, y, z) - self.value_at(x - h, y, z);
        let dy = self.value_at(x, y + h, z) - self.value_at(x, y - h, z);
        let dz = self.value_at(x, y, z + h) - self.value_at(x, y, z - h);
        [dx * inv_2h, dy * inv_2h, dz * inv_2h]
    }
}

impl<F> ScalarField for F
    where F: Fn(f64, f64, f64) -> f64
{
    #[inline]
    fn value_at(&self, x: f64, y: f64, z: f64) -> f64 {
        self(x, y, z)
    }
}

/// Signed distance to a sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereField {
    pub center: Point,
    pub radius: f64,
}

impl SphereField {
    pub fn new(center: Point, radius: f64) -> Self {
        SphereField {
            center: center,
            radius: radius,
        }
    }
}

impl ScalarField for SphereField {
    #[inline]
    fn value_at(&self, x: f64, y: f64, z: f64) -> f64 {
        (Point::new(x, y, z) - self.center).norm() - self.radius
    }
}
