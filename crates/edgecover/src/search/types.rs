//! Solver configuration, statistics, and result types.

use crate::dual::{Baseline, DualState};
use crate::matching::Matching;
use crate::oracle::OracleKind;

/// How many deficient B-vertices seed one outer iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeficiencyPolicy {
    /// The lowest-index deficient vertex only.
    #[default]
    Single,
    /// Every deficient vertex at once, sharing one alternating forest.
    Batched,
}

/// Solver configuration (tolerance and strategy choices).
#[derive(Clone, Copy, Debug)]
pub struct SolverCfg {
    /// Candidates with `|delta| <= eps_tight` count as tight; B-vertices with
    /// `beta <= eps_tight` are no longer deficient.
    pub eps_tight: f64,
    pub policy: DeficiencyPolicy,
    pub oracle: OracleKind,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            eps_tight: 1e-15,
            policy: DeficiencyPolicy::Single,
            oracle: OracleKind::LinearScan,
        }
    }
}

/// Counters collected over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub outer_iterations: usize,
    /// Case 1: a free A-vertex became tight and the matching grew.
    pub augmentations: usize,
    /// Case 4: the slack budget ran out and the pivot was resolved.
    pub forced_resolutions: usize,
    /// Case 3: dual shifts without structural change.
    pub dual_shifts: usize,
    /// Case 2: a matched A-vertex and its partner joined the tree.
    pub tree_growths: usize,
    pub bucket_rebuilds: usize,
    /// Secondary surplus sets merged into the primary one.
    pub surplus_folds: usize,
}

/// Converged matching and duals, with the baseline they were computed from.
#[derive(Clone, Debug)]
pub struct DualSolution {
    pub matching: Matching,
    pub duals: DualState,
    pub baseline: Baseline,
    pub stats: SolveStats,
}

impl DualSolution {
    /// Dual objective; equals the optimal cover length at convergence.
    pub fn objective(&self) -> f64 {
        self.duals.objective(&self.baseline)
    }
}
