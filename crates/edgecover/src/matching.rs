//! Partial A–B matching and alternating-path augmentation.

use crate::error::{EdgeCoverError, Result};

/// Symmetric partner table over all vertices.
///
/// Invariant: `partner(partner(v)) == Some(v)` whenever `partner(v)` is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
    partner: Vec<Option<usize>>,
    pairs: usize,
}

impl Matching {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            partner: vec![None; vertex_count],
            pairs: 0,
        }
    }

    #[inline]
    pub fn partner(&self, v: usize) -> Option<usize> {
        self.partner[v]
    }

    /// Number of matched pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    fn unmatch(&mut self, v: usize) {
        if let Some(u) = self.partner[v].take() {
            self.partner[u] = None;
            self.pairs -= 1;
        }
    }

    /// Match `u` with `v`, dropping any previous partners of either.
    pub fn join(&mut self, u: usize, v: usize) {
        self.unmatch(u);
        self.unmatch(v);
        self.partner[u] = Some(v);
        self.partner[v] = Some(u);
        self.pairs += 1;
    }

    /// Flip the alternating path that follows `parent` from `start` to a root.
    ///
    /// The chain `start -> parent[start] -> ...` stops at the first vertex
    /// without a parent. Counting edges from `start`, every second edge is
    /// matched, with the offset chosen so that the edge touching the root is
    /// always among them. An odd chain (from a free A leaf) grows the matching
    /// by one pair; an even chain (from a B vertex) keeps its size and moves
    /// the unmatched end from the root to `start`.
    pub fn augment(&mut self, parent: &[Option<usize>], start: usize) -> Result<()> {
        let mut path = Vec::new();
        let mut p = start;
        while let Some(q) = parent[p] {
            if path.len() >= parent.len() {
                return Err(EdgeCoverError::invariant(format!(
                    "alternating tree parent chain from {start} does not reach a root"
                )));
            }
            path.push((p, q));
            p = q;
        }
        let first = 1 - path.len() % 2;
        for &(u, v) in path.iter().skip(first).step_by(2) {
            self.join(u, v);
        }
        Ok(())
    }

    /// Matched pairs as `(smaller, larger)` in increasing order of the first vertex.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.partner
            .iter()
            .enumerate()
            .filter_map(|(u, p)| p.filter(|&v| u < v).map(|v| (u, v)))
    }

    /// True if the partner table is symmetric and its pair count is consistent.
    pub fn is_consistent(&self) -> bool {
        let symmetric = self
            .partner
            .iter()
            .enumerate()
            .all(|(u, p)| p.map_or(true, |v| v != u && self.partner[v] == Some(u)));
        symmetric && self.pairs().count() == self.pairs
    }
}
