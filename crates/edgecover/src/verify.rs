//! Independent check of a printed solution against its instance.

use crate::error::{EdgeCoverError, Result};
use crate::geometry::Instance;
use crate::wire::PrintedCover;

/// Absolute tolerance between the printed and the recomputed total.
pub const TOTAL_TOLERANCE: f64 = 1e-3;

/// Outcome of [`verify`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verdict {
    pub covered_all: bool,
    pub total_recomputed: f64,
    pub total_printed: f64,
}

impl Verdict {
    pub fn total_matches(&self) -> bool {
        (self.total_recomputed - self.total_printed).abs() < TOTAL_TOLERANCE
    }

    pub fn ok(&self) -> bool {
        self.covered_all && self.total_matches()
    }
}

/// Recompute coverage and total length from the printed edges.
///
/// Endpoints outside `0..a+b` are malformed input. Edges are not required to
/// cross the sides or be oriented; only coverage and length are judged.
pub fn verify(inst: &Instance, printed: &PrintedCover) -> Result<Verdict> {
    let n = inst.vertex_count();
    let mut covered = vec![false; n];
    let mut total = 0.0;
    for (k, &(u, v)) in printed.edges.iter().enumerate() {
        if u >= n || v >= n {
            return Err(EdgeCoverError::malformed(format!(
                "edge {k} ({u}, {v}) references a vertex outside 0..{n}"
            )));
        }
        covered[u] = true;
        covered[v] = true;
        total += inst.dist(u, v);
    }
    Ok(Verdict {
        covered_all: covered.into_iter().all(|c| c),
        total_recomputed: total,
        total_printed: printed.total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{parse_cover, parse_instance};

    #[test]
    fn accepts_correct_solution() {
        let inst = parse_instance("2 1\n0 0\n10 0\n1 0\n").unwrap();
        let printed = parse_cover("2\n0 2\n1 2\n10.000000000\n").unwrap();
        assert!(verify(&inst, &printed).unwrap().ok());
    }

    #[test]
    fn rejects_uncovered_vertex() {
        let inst = parse_instance("2 1\n0 0\n10 0\n1 0\n").unwrap();
        let printed = parse_cover("1\n0 2\n1.000000000\n").unwrap();
        let verdict = verify(&inst, &printed).unwrap();
        assert!(!verdict.covered_all);
        assert!(verdict.total_matches());
        assert!(!verdict.ok());
    }

    #[test]
    fn rejects_wrong_total() {
        let inst = parse_instance("1 1\n0 0\n3 4\n").unwrap();
        let printed = parse_cover("1\n0 1\n5.01\n").unwrap();
        assert!(!verify(&inst, &printed).unwrap().ok());
    }

    #[test]
    fn out_of_range_endpoint_is_malformed() {
        let inst = parse_instance("1 1\n0 0\n3 4\n").unwrap();
        let printed = parse_cover("1\n0 2\n5\n").unwrap();
        assert!(matches!(
            verify(&inst, &printed),
            Err(EdgeCoverError::MalformedInput { .. })
        ));
    }
}
