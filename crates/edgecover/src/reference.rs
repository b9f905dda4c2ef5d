//! Brute-force baseline: the same primal-dual schedule without acceleration.
//!
//! Every step scans all (free, surplus) pairs for the tightest edge, so an
//! outer iteration costs O(a · b) per step. Used to cross-check the
//! accelerated solver and selectable from the CLI for small inputs.

use crate::cover::Cover;
use crate::dual::{deficient, Baseline, DualState};
use crate::error::{EdgeCoverError, Result};
use crate::geometry::Instance;
use crate::matching::Matching;
use crate::search::{DualSolution, SolveStats};

/// Solve one deficient vertex at a time with full scans; returns the cover.
pub fn solve(inst: &Instance, eps: f64) -> Result<Cover> {
    let sol = solve_duals(inst, eps)?;
    Ok(Cover::complete(inst, &sol.matching, &sol.baseline))
}

/// Dual process with full scans.
pub fn solve_duals(inst: &Instance, eps: f64) -> Result<DualSolution> {
    let baseline = Baseline::compute(inst);
    let mut duals = DualState::initial(inst, &baseline);
    let mut matching = Matching::new(inst.vertex_count());
    let mut stats = SolveStats::default();

    loop {
        let Some(root) = deficient(inst, &duals, &matching, eps).next() else {
            break;
        };
        let mut weight = duals.weights(&baseline);
        let mut tree = vec![None; inst.vertex_count()];
        let mut free: Vec<bool> = vec![true; inst.a()];
        let mut surplus = vec![root];
        let mut reached = Vec::new();
        let (mut pivot, mut epsilon, mut change) = (root, duals.beta(root), 0.0);

        let forced = loop {
            let mut best: Option<(f64, usize, usize)> = None;
            for i in inst.a_range().filter(|&i| free[i]) {
                for &j in &surplus {
                    let key = inst.dist(i, j) - weight[i] - weight[j];
                    if best.map_or(true, |(k, _, _)| key < k) {
                        best = Some((key, i, j));
                    }
                }
            }
            let delta = best.map_or(f64::INFINITY, |(k, _, _)| k - change);
            if delta.is_nan() {
                return Err(EdgeCoverError::invariant("candidate slack is NaN"));
            }
            match best {
                Some((_, i, j)) if delta.abs() <= eps => {
                    tree[i] = Some(j);
                    free[i] = false;
                    reached.push(i);
                    weight[i] += change;
                    match matching.partner(i) {
                        None => {
                            matching.augment(&tree, i)?;
                            stats.augmentations += 1;
                            break false;
                        }
                        Some(k) => {
                            tree[k] = Some(i);
                            surplus.push(k);
                            weight[k] -= change;
                            if duals.beta(k) < epsilon {
                                epsilon = duals.beta(k);
                                pivot = k;
                            }
                            stats.tree_growths += 1;
                        }
                    }
                }
                Some((key, _, _)) if epsilon > delta => {
                    change = key;
                    epsilon -= delta;
                    stats.dual_shifts += 1;
                }
                _ => {
                    change += epsilon;
                    matching.augment(&tree, pivot)?;
                    stats.forced_resolutions += 1;
                    break true;
                }
            }
        };

        debug_assert!(matching.is_consistent(), "partner table lost symmetry");
        for &i in &reached {
            duals.set_alpha(i, baseline.nearest[i] - weight[i] + change);
        }
        for &j in &surplus {
            duals.set_beta(j, (baseline.nearest[j] - weight[j] - change).max(0.0));
        }
        if forced {
            duals.set_beta(pivot, 0.0);
        }
        stats.outer_iterations += 1;
    }

    tracing::debug!(
        iterations = stats.outer_iterations,
        matched = matching.len(),
        "reference solver converged"
    );
    Ok(DualSolution {
        matching,
        duals,
        baseline,
        stats,
    })
}
