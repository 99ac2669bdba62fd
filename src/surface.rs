use std::fmt;
use std::mem;
use std::ops::Index;
use std::slice;
use std::sync::Arc;
use std::time::Instant;

use itertools::iproduct;

use crate::errors::{Error, ErrorKind, Result};
use crate::math::{Interval, Nodes, Point, ScalarField};

/// Multiplier on `sqrt(3) * h`, the farthest a lattice node can sit from the
/// level set while its cell still straddles it.
pub const NARROW_BAND_FACTOR: f64 = 1.1;

pub type SharedField = Arc<dyn ScalarField + Send + Sync>;

/// Half-width of the narrow band kept around the zero level set for spacing `h`.
#[inline]
pub fn narrow_band_half_width(h: f64) -> f64 {
    NARROW_BAND_FACTOR * 3f64.sqrt() * h
}

/// Whether a surface can evaluate its field: the field and the spacing it was
/// sampled with always travel together.
#[derive(Clone)]
pub enum Sampling {
    Unbound,
    Bound { field: SharedField, spacing: f64 },
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling::Unbound
    }
}

impl fmt::Debug for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Sampling::Unbound => write!(f, "Unbound"),
            Sampling::Bound { spacing, .. } => write!(f, "Bound {{ spacing: {} }}", spacing),
        }
    }
}

/// A point cloud approximating the zero level set of a scalar field.
///
/// Read-only once built; share it by reference across walkers.
#[derive(Debug, Default)]
pub struct Surface {
    points: Vec<Point>,
    sampling: Sampling,
}

impl Surface {
    /// A surface made of an explicit list of points. It cannot `project` or `snap`.
    pub fn from_points(points: Vec<Point>) -> Self {
        Surface {
            points: points,
            sampling: Sampling::Unbound,
        }
    }

    /// A surface of `num_points` copies of `point`.
    pub fn filled(num_points: usize, point: Point) -> Self {
        Surface::from_points(vec![point; num_points])
    }

    /// Samples the lattice nodes of `x * y * z` with spacing `spacing` whose
    /// field value is within the narrow band around zero.
    pub fn from_field<F>(field: F, x: Interval, y: Interval, z: Interval, spacing: f64) -> Result<Self>
        where F: ScalarField + Send + Sync + 'static
    {
        Surface::from_shared_field(Arc::new(field), x, y, z, spacing)
    }

    pub fn from_shared_field(field: SharedField,
                             x: Interval,
                             y: Interval,
                             z: Interval,
                             spacing: f64)
                             -> Result<Self> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(ErrorKind::InvalidSpacing(spacing).into());
        }

        let time = Instant::now();
        let half_width = narrow_band_half_width(spacing);
        let (xs, ys, zs) = (lattice(&x, spacing)?, lattice(&y, spacing)?, lattice(&z, spacing)?);
        let num_candidates = candidate_bound(&xs, &ys, &zs)?;
        debug!("Sampling {} x {} x {} with spacing {}: at most {} candidate nodes.",
               x,
               y,
               z,
               spacing,
               num_candidates);

        let mut scratch = Vec::new();
        scratch.try_reserve(num_candidates)
            .map_err(|_| Error::from(ErrorKind::ResourceExhausted(num_candidates)))?;
        for (i, j, k) in iproduct!(xs, ys, zs) {
            let value = field.value_at(i, j, k);
            if value > -half_width && value < half_width {
                scratch.push(Point::new(i, j, k));
            }
        }

        let mut points = Vec::new();
        points.try_reserve_exact(scratch.len())
            .map_err(|_| Error::from(ErrorKind::ResourceExhausted(scratch.len())))?;
        points.extend_from_slice(&scratch);
        drop(scratch);

        info!("Sampled {} of {} candidate nodes within +/-{:.4} of the level set in {:.2}s.",
              points.len(),
              num_candidates,
              half_width,
              time.elapsed().as_secs_f64());
        if points.is_empty() {
            warn!("No lattice node lies in the narrow band; the surface is empty.");
        }

        Ok(Surface {
            points: points,
            sampling: Sampling::Bound {
                field: field,
                spacing: spacing,
            },
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<Point> {
        self.points.iter()
    }

    #[inline]
    pub fn sampling(&self) -> &Sampling {
        &self.sampling
    }

    #[inline]
    pub fn spacing(&self) -> Option<f64> {
        match self.sampling {
            Sampling::Bound { spacing, .. } => Some(spacing),
            Sampling::Unbound => None,
        }
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.spacing().is_some()
    }

    /// Moves the contents out, leaving `self` empty and unbound.
    pub fn take(&mut self) -> Surface {
        mem::replace(self, Surface::default())
    }

    /// One gradient step from `p` towards the zero level set.
    ///
    /// The gradient is estimated by central differences with the sampling
    /// spacing and `p` moves by `-phi(p)` along its normalised direction. A
    /// vanishing gradient leaves `p` where it is. Call repeatedly for tighter
    /// accuracy.
    pub fn project(&self, p: Point) -> Result<Point> {
        let (field, h) = self.bound()?;
        let [dx, dy, dz] = field.gradient_at(p.x, p.y, p.z, h);
        if dx == 0.0 && dy == 0.0 && dz == 0.0 {
            return Ok(p);
        }

        let gradient = Point::new(dx, dy, dz);
        let distance = field.value_at_point(&p);
        Ok(p - gradient * (distance / gradient.norm()))
    }

    /// Rounds each coordinate of `p` half-up to the nearest multiple of the
    /// sampling spacing.
    ///
    /// This snaps to the sampling lattice, not to the nearest stored point.
    pub fn snap(&self, p: Point) -> Result<Point> {
        if self.points.is_empty() {
            return Err(ErrorKind::EmptySurface.into());
        }
        let (_, h) = self.bound()?;
        Ok(p.map(|v| (v / h + 0.5).floor() * h))
    }

    #[inline]
    fn bound(&self) -> Result<(&SharedField, f64)> {
        match self.sampling {
            Sampling::Bound { ref field, spacing } => Ok((field, spacing)),
            Sampling::Unbound => Err(ErrorKind::UnboundField.into()),
        }
    }
}

impl Clone for Surface {
    fn clone(&self) -> Self {
        Surface {
            points: self.points.clone(),
            sampling: self.sampling.clone(),
        }
    }

    /// Reuses the existing point buffer when it is large enough.
    fn clone_from(&mut self, source: &Self) {
        self.points.clone_from(&source.points);
        self.sampling = source.sampling.clone();
    }
}

impl Index<usize> for Surface {
    type Output = Point;

    #[inline]
    fn index(&self, index: usize) -> &Point {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a Surface {
    type Item = &'a Point;
    type IntoIter = slice::Iter<'a, Point>;

    #[inline]
    fn into_iter(self) -> slice::Iter<'a, Point> {
        self.points.iter()
    }
}

/// `x y z` per line, in stored order.
impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for point in &self.points {
            writeln!(f, "{}", point)?;
        }
        Ok(())
    }
}

fn lattice(axis: &Interval, spacing: f64) -> Result<Nodes> {
    axis.nodes(spacing).ok_or_else(|| ErrorKind::ResourceExhausted(::std::usize::MAX).into())
}

/// Upper bound on the number of lattice nodes: the domain volume over the
/// cell volume, rounded up along each axis.
fn candidate_bound(x: &Nodes, y: &Nodes, z: &Nodes) -> Result<usize> {
    let (nx, ny, nz) = (x.len(), y.len(), z.len());
    nx.checked_mul(ny)
        .and_then(|nxy| nxy.checked_mul(nz))
        .ok_or_else(|| ErrorKind::ResourceExhausted(::std::usize::MAX).into())
}
