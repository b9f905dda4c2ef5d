//! Points, distances, and the two-sided instance.
//!
//! Side membership is positional: vertices `0..a` form side A, vertices
//! `a..a+b` form side B. Nothing per-point records the side.

use std::ops::Range;

use nalgebra::Vector2;

use crate::error::{EdgeCoverError, Result};

/// A point in the plane.
pub type Point = Vector2<f64>;

/// Euclidean distance between two points.
#[inline]
pub fn distance(p: &Point, q: &Point) -> f64 {
    (p - q).norm()
}

/// Two finite point sets, A first then B.
///
/// Invariants:
/// - `a >= 1`, `b >= 1`, `points.len() == a + b`.
/// - All coordinates are finite.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    a: usize,
    b: usize,
    points: Vec<Point>,
}

impl Instance {
    /// Validate and build an instance.
    pub fn new(a: usize, b: usize, points: Vec<Point>) -> Result<Self> {
        if a == 0 || b == 0 {
            return Err(EdgeCoverError::malformed(format!(
                "both sides must be non-empty (a={a}, b={b})"
            )));
        }
        if points.len() != a + b {
            return Err(EdgeCoverError::malformed(format!(
                "expected {} points, got {}",
                a + b,
                points.len()
            )));
        }
        if let Some(v) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(EdgeCoverError::malformed(format!(
                "point {v} has a non-finite coordinate"
            )));
        }
        Ok(Self { a, b, points })
    }

    /// Build from separate A and B point lists.
    pub fn from_sides(side_a: &[Point], side_b: &[Point]) -> Result<Self> {
        let mut points = Vec::with_capacity(side_a.len() + side_b.len());
        points.extend_from_slice(side_a);
        points.extend_from_slice(side_b);
        Self::new(side_a.len(), side_b.len(), points)
    }

    #[inline]
    pub fn a(&self) -> usize {
        self.a
    }

    #[inline]
    pub fn b(&self) -> usize {
        self.b
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.a + self.b
    }

    #[inline]
    pub fn a_range(&self) -> Range<usize> {
        0..self.a
    }

    #[inline]
    pub fn b_range(&self) -> Range<usize> {
        self.a..self.a + self.b
    }

    #[inline]
    pub fn is_a(&self, v: usize) -> bool {
        v < self.a
    }

    #[inline]
    pub fn point(&self, v: usize) -> &Point {
        &self.points[v]
    }

    /// Distance between vertices `u` and `v`.
    #[inline]
    pub fn dist(&self, u: usize, v: usize) -> f64 {
        distance(&self.points[u], &self.points[v])
    }
}
