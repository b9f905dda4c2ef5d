//! Additively-weighted nearest-site indices.
//!
//! A site `s` scores `‖q − s.at‖ − s.weight` against a query `q`; `nearest`
//! returns the id of the minimum-score site, ties to the lowest id. Sites
//! carry a snapshot of their weight taken at insertion.
//!
//! Two interchangeable realizations:
//! - [`LinearScan`]: O(n) query, no preprocessing.
//! - [`KdTree`]: 2-d tree with per-subtree bounding boxes and maximum weight;
//!   subtrees whose lower bound exceeds the incumbent are pruned.

mod kdtree;
mod linear;

pub use kdtree::KdTree;
pub use linear::LinearScan;

use crate::geometry::{distance, Point};

/// A weighted site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub id: usize,
    pub at: Point,
    pub weight: f64,
}

impl Site {
    #[inline]
    pub fn score(&self, q: &Point) -> f64 {
        distance(q, &self.at) - self.weight
    }
}

/// Which index realization the solver builds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OracleKind {
    #[default]
    LinearScan,
    KdTree,
}

/// Nearest-site capability used by the alternating-tree search.
pub trait NearestSite: Sized {
    /// Build an index over `sites`.
    fn build(sites: Vec<Site>) -> Self;

    /// Add sites to the index.
    fn insert<I: IntoIterator<Item = Site>>(&mut self, sites: I);

    /// Id of the minimum-score site, or `None` when the index is empty.
    fn nearest(&self, q: &Point) -> Option<usize>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deterministic comparison on `(score, id)`.
#[inline]
pub(crate) fn better(score: f64, id: usize, best: Option<(f64, usize)>) -> bool {
    match best {
        None => true,
        Some((s, b)) => score < s || (score == s && id < b),
    }
}
