//! Accelerated primal-dual solver for the bipartite edge cover.
//!
//! Purpose
//! - Compute a minimum-weight matching under the savings
//!   `nearest[i] + nearest[j] - dist(i, j)` with a Hungarian-style search,
//!   then complete it to a cover by attaching every leftover vertex to its
//!   nearest opposite neighbor.
//!
//! Schedule (per outer iteration, see `round`)
//! - Seed the surplus set with the deficient roots; slack budget `epsilon` is
//!   the smallest root `beta`.
//! - Repeatedly take the tightest frontier edge and its slack `delta`:
//!   1. tight, free A-end: augment, done;
//!   2. tight, matched A-end: grow the tree through the matched edge;
//!   3. `delta < epsilon`: shift duals by `delta`;
//!   4. otherwise: shift by `epsilon` and resolve the pivot, done.
//! - Write back `alpha`/`beta` for the touched vertices.
//!
//! Ties between equal frontier keys go to the lowest `(i, j)`; nearest-site
//! ties go to the lowest site id. Totals do not depend on tie-breaking.

mod round;
mod types;

pub use types::{DeficiencyPolicy, DualSolution, SolveStats, SolverCfg};

use crate::cover::Cover;
use crate::dual::{deficient, Baseline, DualState};
use crate::error::{EdgeCoverError, Result};
use crate::geometry::Instance;
use crate::matching::Matching;
use crate::oracle::{KdTree, LinearScan, NearestSite, OracleKind};

use round::{Round, RoundEnd};

/// Solve and return the complete minimum cover.
pub fn solve(inst: &Instance, cfg: SolverCfg) -> Result<Cover> {
    let sol = solve_duals(inst, cfg)?;
    Ok(Cover::complete(inst, &sol.matching, &sol.baseline))
}

/// Run the dual process to convergence; no cover completion.
pub fn solve_duals(inst: &Instance, cfg: SolverCfg) -> Result<DualSolution> {
    match cfg.oracle {
        OracleKind::LinearScan => run::<LinearScan>(inst, cfg),
        OracleKind::KdTree => run::<KdTree>(inst, cfg),
    }
}

fn run<O: NearestSite>(inst: &Instance, cfg: SolverCfg) -> Result<DualSolution> {
    let baseline = Baseline::compute(inst);
    let mut duals = DualState::initial(inst, &baseline);
    let mut matching = Matching::new(inst.vertex_count());
    let mut stats = SolveStats::default();

    loop {
        let roots: Vec<usize> = {
            let bad = deficient(inst, &duals, &matching, cfg.eps_tight);
            match cfg.policy {
                DeficiencyPolicy::Single => bad.take(1).collect(),
                DeficiencyPolicy::Batched => bad.collect(),
            }
        };
        if roots.is_empty() {
            break;
        }
        let pairs_before = matching.len();

        let mut round = Round::<O>::new(inst, &baseline, &duals, &roots, &mut stats);
        let end = round.run(&mut matching, cfg.eps_tight, &mut stats)?;
        debug_assert!(matching.is_consistent(), "partner table lost symmetry");
        let update = round.finish(end);
        update.apply(&mut duals);
        stats.outer_iterations += 1;

        match end {
            RoundEnd::Augmented { leaf } => {
                if matching.len() != pairs_before + 1 {
                    return Err(EdgeCoverError::invariant(format!(
                        "augmenting from {leaf} left the matching at {} pairs (was {pairs_before})",
                        matching.len()
                    )));
                }
            }
            RoundEnd::Forced { pivot } => {
                if matching.partner(pivot).is_some() || matching.len() != pairs_before {
                    return Err(EdgeCoverError::invariant(format!(
                        "forced resolution of {pivot} did not leave it unmatched"
                    )));
                }
            }
        }
        tracing::debug!(
            iteration = stats.outer_iterations,
            roots = roots.len(),
            end = ?end,
            matched = matching.len(),
            "outer iteration"
        );
    }

    let sol = DualSolution {
        matching,
        duals,
        baseline,
        stats,
    };
    tracing::info!(
        a = inst.a(),
        b = inst.b(),
        matched = sol.matching.len(),
        objective = sol.objective(),
        iterations = sol.stats.outer_iterations,
        augmentations = sol.stats.augmentations,
        forced = sol.stats.forced_resolutions,
        rebuilds = sol.stats.bucket_rebuilds,
        folds = sol.stats.surplus_folds,
        "dual process converged"
    );
    Ok(sol)
}

#[cfg(test)]
mod tests;
