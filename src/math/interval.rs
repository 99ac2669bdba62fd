use std::fmt;

use crate::errors::{ErrorKind, Result};

const MAX_CORRECTIONS: usize = 2;

/// A closed range `[min, max]` along one axis.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ErrorKind::InvalidInterval(min, max).into());
        }
        Ok(Interval { min: min, max: max })
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Number of lattice nodes `min + n * step` lying strictly below `max`,
    /// or `None` if it does not fit in a `usize`.
    pub fn num_nodes(&self, step: f64) -> Option<usize> {
        let steps = (self.length() / step).ceil();
        if !(steps < ::std::usize::MAX as f64) {
            return None;
        }
        let mut count = steps as usize;
        // `ceil` lands at most a node or two past or short of `max`.
        for _ in 0..MAX_CORRECTIONS {
            if count > 0 && self.node(count - 1, step) >= self.max {
                count -= 1;
            }
        }
        for _ in 0..MAX_CORRECTIONS {
            if self.node(count, step) < self.max {
                count = count.checked_add(1)?;
            }
        }
        Some(count)
    }

    /// The lattice coordinates `min, min + step, ...` strictly below `max`.
    pub fn nodes(&self, step: f64) -> Option<Nodes> {
        self.num_nodes(step).map(|len| {
            Nodes {
                min: self.min,
                step: step,
                index: 0,
                len: len,
            }
        })
    }

    #[inline]
    fn node(&self, index: usize, step: f64) -> f64 {
        self.min + index as f64 * step
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Iterator over the lattice nodes of an `Interval`.
///
/// Nodes are computed as `min + n * step` rather than accumulated, so there is
/// no drift over long axes.
#[derive(Clone, Debug)]
pub struct Nodes {
    min: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Iterator for Nodes {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index < self.len {
            let value = self.min + self.index as f64 * self.step;
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Nodes {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(Interval::new(1.0, 1.0).is_err());
        assert!(Interval::new(2.0, 1.0).is_err());
        assert!(Interval::new(0.0, ::std::f64::INFINITY).is_err());
        assert!(Interval::new(::std::f64::NAN, 1.0).is_err());
        assert!(Interval::new(-1.0, 1.0).is_ok());
    }

    #[test]
    fn nodes_stay_strictly_below_max() {
        let interval = Interval::new(0.0, 1.0).unwrap();
        let nodes: Vec<f64> = interval.nodes(0.25).unwrap().collect();
        assert_eq!(nodes, vec![0.0, 0.25, 0.5, 0.75]);

        let nodes: Vec<f64> = interval.nodes(0.3).unwrap().collect();
        assert_eq!(nodes.len(), 4);
        assert!(nodes.iter().all(|&v| v < 1.0));
    }

    #[test]
    fn node_count_matches_iteration() {
        let interval = Interval::new(0.0, 10.0).unwrap();
        for &step in &[0.06, 0.1, 0.7, 3.0, 20.0] {
            let nodes = interval.nodes(step).unwrap();
            assert_eq!(Some(nodes.len()), interval.num_nodes(step));
            assert_eq!(Some(nodes.count()), interval.num_nodes(step));
        }
        assert_eq!(interval.num_nodes(20.0), Some(1));
    }

    #[test]
    fn tiny_steps_overflow_the_node_count() {
        let interval = Interval::new(0.0, 10.0).unwrap();
        assert_eq!(interval.num_nodes(1e-300), None);
        assert!(interval.nodes(1e-300).is_none());
        let count = interval.num_nodes(1e-7).unwrap();
        assert!(count >= 99_999_999 && count <= 100_000_001, "{}", count);
    }

    #[test]
    fn contains_is_closed() {
        let interval = Interval::new(-2.0, 3.0).unwrap();
        assert!(interval.contains(-2.0));
        assert!(interval.contains(3.0));
        assert!(!interval.contains(3.5));
        assert_eq!(interval.length(), 5.0);
    }
}
