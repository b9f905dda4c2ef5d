//! Edge covers: completing a matching with nearest-neighbor fallback edges.

use crate::dual::Baseline;
use crate::geometry::Instance;
use crate::matching::Matching;

/// A set of A–B edges, each stored as `(i, j)` with `i < a <= j`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cover {
    pub edges: Vec<(usize, usize)>,
    /// Sum of the edge lengths.
    pub total: f64,
}

impl Cover {
    /// The matched pairs as edges.
    pub fn from_matching(inst: &Instance, matching: &Matching) -> Self {
        let mut cover = Self::default();
        for (i, j) in matching.pairs() {
            cover.push(inst, i, j);
        }
        cover
    }

    /// Matching edges plus fallback edges for every vertex they miss.
    pub fn complete(inst: &Instance, matching: &Matching, base: &Baseline) -> Self {
        let mut cover = Self::from_matching(inst, matching);
        let added = cover.attach_uncovered(inst, base);
        tracing::debug!(
            matched = matching.len(),
            fallback = added,
            total = cover.total,
            "cover completed"
        );
        cover
    }

    /// Add the edge `{u, v}`, stored as `(A, B)`.
    pub(crate) fn push(&mut self, inst: &Instance, u: usize, v: usize) {
        let (i, j) = if inst.is_a(u) { (u, v) } else { (v, u) };
        self.total += inst.dist(i, j);
        self.edges.push((i, j));
    }

    /// Connect each uncovered vertex, in index order, to its nearest opposite
    /// vertex. Returns the number of edges added; zero on a full cover.
    pub fn attach_uncovered(&mut self, inst: &Instance, base: &Baseline) -> usize {
        let mut covered = self.covered(inst.vertex_count());
        let before = self.edges.len();
        for v in 0..inst.vertex_count() {
            if covered[v] {
                continue;
            }
            let u = base.closest[v];
            self.push(inst, v, u);
            covered[v] = true;
            covered[u] = true;
        }
        self.edges.len() - before
    }

    /// Per-vertex coverage flags.
    pub fn covered(&self, vertex_count: usize) -> Vec<bool> {
        let mut covered = vec![false; vertex_count];
        for &(i, j) in &self.edges {
            covered[i] = true;
            covered[j] = true;
        }
        covered
    }

    /// True if every vertex is an endpoint and every edge crosses the sides.
    pub fn is_cover(&self, inst: &Instance) -> bool {
        let crossing = self
            .edges
            .iter()
            .all(|&(i, j)| inst.is_a(i) && j < inst.vertex_count() && !inst.is_a(j));
        crossing && self.covered(inst.vertex_count()).into_iter().all(|c| c)
    }
}
