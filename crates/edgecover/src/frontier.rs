//! Cached candidate edges between free A-vertices and the surplus side.
//!
//! A min-heap keyed by `dist(i, j) - weight[i] - weight[j]` as computed at push
//! time. Retiring an A-vertex drops every entry touching it; deletion is lazy
//! (stale entries are discarded when they surface at the top).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

/// Candidate edge `(i, j)` with `i` in A and `j` in B.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub key: f64,
    pub i: usize,
    pub j: usize,
}

impl Candidate {
    fn order(&self) -> (OrderedFloat<f64>, usize, usize) {
        (OrderedFloat(self.key), self.i, self.j)
    }

    /// The smaller of two optional candidates, ties to the lower `(i, j)`.
    pub fn min(a: Option<Candidate>, b: Option<Candidate>) -> Option<Candidate> {
        match (a, b) {
            (Some(x), Some(y)) => Some(if y.order() < x.order() { y } else { x }),
            (x, None) => x,
            (None, y) => y,
        }
    }
}

/// Min-heap of candidate edges with retire-by-A-vertex.
#[derive(Clone, Debug)]
pub struct EdgeHeap {
    heap: BinaryHeap<Reverse<(OrderedFloat<f64>, usize, usize)>>,
    retired: Vec<bool>,
}

impl EdgeHeap {
    /// Heap for A-vertices `0..a`.
    pub fn new(a: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            retired: vec![false; a],
        }
    }

    pub fn push(&mut self, c: Candidate) {
        debug_assert!(!self.retired[c.i], "push for retired vertex {}", c.i);
        self.heap.push(Reverse(c.order()));
    }

    /// Drop every entry for `i`, now and for the rest of the heap's life.
    pub fn retire(&mut self, i: usize) {
        self.retired[i] = true;
    }

    /// Drop all entries; retirements stay in force.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Minimum live candidate.
    pub fn top(&mut self) -> Option<Candidate> {
        while let Some(&Reverse((key, i, j))) = self.heap.peek() {
            if self.retired[i] {
                self.heap.pop();
                continue;
            }
            return Some(Candidate { key: key.0, i, j });
        }
        None
    }
}
