//! Nearest-neighbor baseline, dual potentials, and reduced costs.
//!
//! Potentials live in one vector indexed by vertex: `alpha(i)` for `i` in A and
//! `beta(j)` for `j` in B. The search works with residual weights
//! `weight[v] = nearest[v] - potential[v]`, so an A–B edge is tight when
//! `dist(i, j) - weight[i] - weight[j]` reaches the running dual shift.

use crate::geometry::Instance;
use crate::matching::Matching;

/// Per-vertex nearest opposite-side distance and the vertex achieving it.
///
/// Computed once by an all-pairs scan; ties go to the lowest index.
#[derive(Clone, Debug)]
pub struct Baseline {
    pub nearest: Vec<f64>,
    pub closest: Vec<usize>,
}

impl Baseline {
    pub fn compute(inst: &Instance) -> Self {
        let n = inst.vertex_count();
        let mut nearest = vec![f64::INFINITY; n];
        let mut closest = vec![usize::MAX; n];
        for i in inst.a_range() {
            for j in inst.b_range() {
                let d = inst.dist(i, j);
                if d < nearest[i] {
                    nearest[i] = d;
                    closest[i] = j;
                }
                if d < nearest[j] {
                    nearest[j] = d;
                    closest[j] = i;
                }
            }
        }
        Self { nearest, closest }
    }

    /// `nearest[i] + nearest[j] - dist(i, j)`: how much connecting `i` and `j`
    /// saves against attaching both to their nearest neighbors.
    #[inline]
    pub fn reduced_cost(&self, inst: &Instance, i: usize, j: usize) -> f64 {
        self.nearest[i] + self.nearest[j] - inst.dist(i, j)
    }
}

/// Dual potentials of the edge-cover LP.
#[derive(Clone, Debug)]
pub struct DualState {
    a: usize,
    potential: Vec<f64>,
}

impl DualState {
    /// Standard start: `alpha = 0`, `beta[j] = max_i reduced_cost(i, j)`.
    pub fn initial(inst: &Instance, base: &Baseline) -> Self {
        let mut potential = vec![0.0; inst.vertex_count()];
        for j in inst.b_range() {
            potential[j] = inst
                .a_range()
                .map(|i| base.reduced_cost(inst, i, j))
                .fold(f64::NEG_INFINITY, f64::max);
        }
        Self {
            a: inst.a(),
            potential,
        }
    }

    #[inline]
    pub fn alpha(&self, i: usize) -> f64 {
        debug_assert!(i < self.a);
        self.potential[i]
    }

    #[inline]
    pub fn beta(&self, j: usize) -> f64 {
        debug_assert!(j >= self.a);
        self.potential[j]
    }

    #[inline]
    pub fn set_alpha(&mut self, i: usize, value: f64) {
        debug_assert!(i < self.a);
        self.potential[i] = value;
    }

    #[inline]
    pub fn set_beta(&mut self, j: usize, value: f64) {
        debug_assert!(j >= self.a);
        self.potential[j] = value;
    }

    /// Residual weights `nearest[v] - potential[v]` for every vertex.
    pub fn weights(&self, base: &Baseline) -> Vec<f64> {
        self.potential
            .iter()
            .zip(&base.nearest)
            .map(|(p, near)| near - p)
            .collect()
    }

    /// Dual objective `Σ nearest[v] - Σ potential[v]`: the optimal cover length
    /// once the solver has converged.
    pub fn objective(&self, base: &Baseline) -> f64 {
        base.nearest.iter().sum::<f64>() - self.potential.iter().sum::<f64>()
    }
}

/// Unmatched B-vertices whose `beta` still exceeds `eps`, in index order.
pub fn deficient<'a>(
    inst: &'a Instance,
    duals: &'a DualState,
    matching: &'a Matching,
    eps: f64,
) -> impl Iterator<Item = usize> + 'a {
    inst.b_range()
        .filter(move |&j| matching.partner(j).is_none() && duals.beta(j) > eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::parse_instance;

    #[test]
    fn baseline_picks_closest_opposite_vertex() {
        let inst = parse_instance("2 1\n0 0\n10 0\n1 0\n").unwrap();
        let base = Baseline::compute(&inst);
        assert_eq!(base.nearest, vec![1.0, 9.0, 1.0]);
        assert_eq!(base.closest, vec![2, 2, 0]);
    }

    #[test]
    fn initial_duals_take_best_reduced_cost() {
        let inst = parse_instance("2 1\n0 0\n10 0\n1 0\n").unwrap();
        let base = Baseline::compute(&inst);
        let duals = DualState::initial(&inst, &base);
        assert_eq!(duals.alpha(0), 0.0);
        assert_eq!(duals.alpha(1), 0.0);
        // max(1 + 1 - 1, 9 + 1 - 9)
        assert!((duals.beta(2) - 1.0).abs() < 1e-12);
        let w = duals.weights(&base);
        assert!((w[2] - 0.0).abs() < 1e-12);
        let m = Matching::new(inst.vertex_count());
        assert_eq!(deficient(&inst, &duals, &m, 1e-15).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn initial_beta_bounded_by_nearest() {
        // reduced_cost(i, j) <= nearest[j] by the triangle inequality on nearest[i].
        let inst = parse_instance("3 2\n0 0\n4 1\n-2 5\n1 1\n3 -3\n").unwrap();
        let base = Baseline::compute(&inst);
        let duals = DualState::initial(&inst, &base);
        for j in inst.b_range() {
            assert!(duals.beta(j) <= base.nearest[j] + 1e-12);
            assert!(duals.beta(j) >= 0.0);
        }
    }
}
