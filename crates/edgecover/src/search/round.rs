//! One outer iteration: grow an alternating forest from the deficient roots
//! until an augmenting path appears or the slack budget runs out.
//!
//! Vertex sets (reset every iteration):
//! - `s1`: primary surplus (the roots, plus folded secondary surplus).
//! - `s2`: secondary surplus, B-partners pulled into the tree since the last fold.
//! - `t`: A-vertices reached by the tree.
//! - `free`: the remaining A-vertices, split into `h = ⌈√a⌉` fixed buckets.
//!
//! Frontier:
//! - `f_to_s1`: for every free A-vertex, its best edge into `s1`.
//! - `s2_to_f`: for every `s2` vertex and bucket, its best edge into the bucket.
//!
//! A bucket's index is rebuilt when a member leaves it. Once `s2` outgrows `h`
//! it is folded into `s1` and `f_to_s1` is recomputed from scratch, so the
//! rebuild work per iteration stays O(√a) index builds plus one full refresh
//! per `h` tree growths.

use crate::dual::{Baseline, DualState};
use crate::error::{EdgeCoverError, Result};
use crate::frontier::{Candidate, EdgeHeap};
use crate::geometry::Instance;
use crate::matching::Matching;
use crate::oracle::{NearestSite, Site};

use super::types::SolveStats;

/// How an iteration ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RoundEnd {
    /// Case 1: the matching grew along a path ending at the free vertex `leaf`.
    Augmented { leaf: usize },
    /// Case 4: the slack of `pivot` was exhausted and it is now unmatched with `beta = 0`.
    Forced { pivot: usize },
}

/// New potentials produced by one iteration.
#[derive(Clone, Debug, Default)]
pub(crate) struct DualUpdate {
    alpha: Vec<(usize, f64)>,
    beta: Vec<(usize, f64)>,
}

impl DualUpdate {
    pub(crate) fn apply(self, duals: &mut DualState) {
        for (i, v) in self.alpha {
            duals.set_alpha(i, v);
        }
        for (j, v) in self.beta {
            duals.set_beta(j, v);
        }
    }
}

/// Per-iteration search context; discarded once its duals are written back.
pub(crate) struct Round<'a, O: NearestSite> {
    inst: &'a Instance,
    base: &'a Baseline,
    duals: &'a DualState,
    h: usize,
    free: Vec<Vec<usize>>,
    tree: Vec<Option<usize>>,
    weight: Vec<f64>,
    change: f64,
    epsilon: f64,
    pivot: usize,
    s1: Vec<usize>,
    s2: Vec<usize>,
    t: Vec<usize>,
    s1_index: O,
    bucket_index: Vec<O>,
    f_to_s1: EdgeHeap,
    s2_to_f: EdgeHeap,
}

/// Number (and size) of the fixed A-buckets.
#[inline]
pub(crate) fn bucket_size(a: usize) -> usize {
    ((a as f64).sqrt().ceil() as usize).max(1)
}

impl<'a, O: NearestSite> Round<'a, O> {
    /// Seed the forest with `roots` (non-empty, deficient B-vertices).
    pub(crate) fn new(
        inst: &'a Instance,
        base: &'a Baseline,
        duals: &'a DualState,
        roots: &[usize],
        stats: &mut SolveStats,
    ) -> Self {
        let a = inst.a();
        let h = bucket_size(a);
        let free: Vec<Vec<usize>> = (0..h)
            .map(|hi| ((hi * h).min(a)..((hi + 1) * h).min(a)).collect())
            .collect();

        let (mut pivot, mut epsilon) = (roots[0], duals.beta(roots[0]));
        for &r in roots {
            if duals.beta(r) < epsilon {
                pivot = r;
                epsilon = duals.beta(r);
            }
        }

        let weight = duals.weights(base);
        let site = |v: usize| Site {
            id: v,
            at: *inst.point(v),
            weight: weight[v],
        };
        let s1_index = O::build(roots.iter().map(|&j| site(j)).collect());
        let bucket_index: Vec<O> = free
            .iter()
            .map(|members| O::build(members.iter().map(|&i| site(i)).collect()))
            .collect();
        stats.bucket_rebuilds += h;

        let mut round = Self {
            inst,
            base,
            duals,
            h,
            free,
            tree: vec![None; inst.vertex_count()],
            weight,
            change: 0.0,
            epsilon,
            pivot,
            s1: roots.to_vec(),
            s2: Vec::new(),
            t: Vec::new(),
            s1_index,
            bucket_index,
            f_to_s1: EdgeHeap::new(a),
            s2_to_f: EdgeHeap::new(a),
        };
        round.refresh_free_to_s1();
        round
    }

    #[inline]
    fn site(&self, v: usize) -> Site {
        Site {
            id: v,
            at: *self.inst.point(v),
            weight: self.weight[v],
        }
    }

    #[inline]
    fn candidate(&self, i: usize, j: usize) -> Candidate {
        Candidate {
            key: self.inst.dist(i, j) - self.weight[i] - self.weight[j],
            i,
            j,
        }
    }

    fn refresh_free_to_s1(&mut self) {
        self.f_to_s1.clear();
        for hi in 0..self.h {
            for k in 0..self.free[hi].len() {
                let i = self.free[hi][k];
                if let Some(j) = self.s1_index.nearest(self.inst.point(i)) {
                    let c = self.candidate(i, j);
                    self.f_to_s1.push(c);
                }
            }
        }
    }

    fn push_s2_to_bucket(&mut self, j: usize, hi: usize) {
        if let Some(i) = self.bucket_index[hi].nearest(self.inst.point(j)) {
            let c = self.candidate(i, j);
            self.s2_to_f.push(c);
        }
    }

    /// Move `i` from its bucket into `t`.
    fn take_free(&mut self, i: usize) -> Result<usize> {
        let hi = i / self.h;
        let members = &mut self.free[hi];
        let pos = members.binary_search(&i).map_err(|_| {
            EdgeCoverError::invariant(format!("vertex {i} reached twice in one iteration"))
        })?;
        members.remove(pos);
        self.t.push(i);
        Ok(hi)
    }

    /// Run the four-case schedule until the iteration ends.
    pub(crate) fn run(
        &mut self,
        matching: &mut Matching,
        eps: f64,
        stats: &mut SolveStats,
    ) -> Result<RoundEnd> {
        loop {
            let top = Candidate::min(self.f_to_s1.top(), self.s2_to_f.top());
            let delta = top.map_or(f64::INFINITY, |c| c.key - self.change);
            if delta.is_nan() {
                return Err(EdgeCoverError::invariant(format!(
                    "candidate slack is NaN (change={}, epsilon={})",
                    self.change, self.epsilon
                )));
            }

            if let Some(c) = top.filter(|_| delta.abs() <= eps) {
                match matching.partner(c.i) {
                    None => {
                        // case 1: free leaf, augment
                        self.tree[c.i] = Some(c.j);
                        self.take_free(c.i)?;
                        self.weight[c.i] += self.change;
                        matching.augment(&self.tree, c.i)?;
                        stats.augmentations += 1;
                        return Ok(RoundEnd::Augmented { leaf: c.i });
                    }
                    Some(k) => {
                        // case 2: grow through the matched edge (i, k)
                        let folded = self.grow(c.i, c.j, k)?;
                        stats.tree_growths += 1;
                        stats.bucket_rebuilds += 1;
                        if folded {
                            stats.surplus_folds += 1;
                        }
                        continue;
                    }
                }
            }

            if self.epsilon > delta {
                // case 3: shift onto the candidate key exactly
                if let Some(c) = top {
                    self.change = c.key;
                }
                self.epsilon -= delta;
                stats.dual_shifts += 1;
                continue;
            }

            // case 4: budget exhausted, resolve the pivot
            self.change += self.epsilon;
            self.epsilon = 0.0;
            matching.augment(&self.tree, self.pivot)?;
            stats.forced_resolutions += 1;
            return Ok(RoundEnd::Forced { pivot: self.pivot });
        }
    }

    /// Case 2 bookkeeping: `i` joins `t` via `j`, its partner `k` joins `s2`.
    /// Returns true if `s2` was folded into `s1`.
    fn grow(&mut self, i: usize, j: usize, k: usize) -> Result<bool> {
        self.tree[k] = Some(i);
        self.tree[i] = Some(j);
        let hb = self.take_free(i)?;
        self.s2.push(k);
        self.weight[i] += self.change;
        self.weight[k] -= self.change;
        let beta_k = self.duals.beta(k);
        if beta_k < self.epsilon {
            self.epsilon = beta_k;
            self.pivot = k;
        }

        self.f_to_s1.retire(i);
        self.s2_to_f.retire(i);
        let sites: Vec<Site> = self.free[hb].iter().map(|&v| self.site(v)).collect();
        self.bucket_index[hb] = O::build(sites);

        if self.s2.len() <= self.h {
            for idx in 0..self.s2.len() {
                let j2 = self.s2[idx];
                self.push_s2_to_bucket(j2, hb);
            }
            for hi in (0..self.h).filter(|&hi| hi != hb) {
                self.push_s2_to_bucket(k, hi);
            }
            Ok(false)
        } else {
            let folded: Vec<Site> = self.s2.iter().map(|&v| self.site(v)).collect();
            self.s1_index.insert(folded);
            self.s1.append(&mut self.s2);
            self.s2_to_f.clear();
            self.refresh_free_to_s1();
            Ok(true)
        }
    }

    /// Potentials of every vertex the iteration touched.
    ///
    /// `alpha[i] = nearest[i] - weight[i] + change` on `t`,
    /// `beta[j] = nearest[j] - weight[j] - change` on `s1 ∪ s2`, clamped at
    /// zero; a forced pivot ends at exactly zero.
    pub(crate) fn finish(self, end: RoundEnd) -> DualUpdate {
        let alpha = self
            .t
            .iter()
            .map(|&i| (i, self.base.nearest[i] - self.weight[i] + self.change))
            .collect();
        let mut beta: Vec<(usize, f64)> = self
            .s1
            .iter()
            .chain(&self.s2)
            .map(|&j| (j, (self.base.nearest[j] - self.weight[j] - self.change).max(0.0)))
            .collect();
        if let RoundEnd::Forced { pivot } = end {
            beta.push((pivot, 0.0));
        }
        DualUpdate { alpha, beta }
    }

    #[cfg(test)]
    pub(crate) fn sizes(&self) -> (usize, usize, usize, usize) {
        let free = self.free.iter().map(Vec::len).sum();
        (self.s1.len(), self.s2.len(), self.t.len(), free)
    }
}
