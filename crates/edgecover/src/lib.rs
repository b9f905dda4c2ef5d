//! Minimum-length bipartite edge covers of planar point sets.
//!
//! Given points A (indices `0..a`) and B (indices `a..a+b`), compute a set of
//! A–B segments of minimum total Euclidean length such that every point is an
//! endpoint of at least one segment.
//!
//! Layout
//! - `geometry`, `wire`: points, instances, and the text format consumed and
//!   produced by the CLI.
//! - `dual`, `matching`, `oracle`, `frontier`, `search`: the accelerated
//!   primal-dual solver (dual potentials, alternating trees, bucketed
//!   nearest-site indices, cached frontier heaps).
//! - `cover`: turns the final matching into a full cover.
//! - `reference`, `heuristic`, `verify`: brute-force baseline, cheap
//!   heuristics, and an independent checker of printed solutions.

pub mod cover;
pub mod dual;
pub mod error;
pub mod frontier;
pub mod geometry;
pub mod heuristic;
pub mod matching;
pub mod oracle;
pub mod reference;
pub mod search;
pub mod verify;
pub mod wire;

#[cfg(test)]
pub(crate) mod testutil;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cover::Cover;
pub use error::{EdgeCoverError, Result};
pub use geometry::{distance, Instance, Point};
pub use search::{solve, solve_duals, DeficiencyPolicy, DualSolution, SolveStats, SolverCfg};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cover::Cover;
    pub use crate::geometry::{distance, Instance, Point};
    pub use crate::heuristic::{best_of_two, greedy_star, greedy_star_improved, nearest_neighbor};
    pub use crate::oracle::OracleKind;
    pub use crate::search::{solve, solve_duals, DeficiencyPolicy, SolverCfg};
    pub use crate::verify::{verify, Verdict};
    pub use crate::wire::{format_cover, parse_cover, parse_instance, PrintedCover};
}
