//! Shared helpers for unit tests: seeded instances and an exhaustive optimum.

use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::geometry::Instance;

/// Uniform points in `[0, side)²`.
pub(crate) fn random_instance(seed: u64, a: usize, b: usize, side: f64) -> Instance {
    let mut rng = StdRng::seed_from_u64(seed);
    let points = (0..a + b)
        .map(|_| Vector2::new(rng.gen_range(0.0..side), rng.gen_range(0.0..side)))
        .collect();
    Instance::new(a, b, points).unwrap()
}

/// Minimum cover length by enumerating every subset of the `a · b` edges.
pub(crate) fn exhaustive_optimum(inst: &Instance) -> f64 {
    let edges: Vec<(usize, usize)> = inst
        .a_range()
        .flat_map(|i| inst.b_range().map(move |j| (i, j)))
        .collect();
    assert!(edges.len() <= 16, "exhaustive search is for tiny instances");
    let mut best = f64::INFINITY;
    for mask in 1u32..(1 << edges.len()) {
        let mut covered = vec![false; inst.vertex_count()];
        let mut total = 0.0;
        for (k, &(i, j)) in edges.iter().enumerate() {
            if mask & (1 << k) != 0 {
                covered[i] = true;
                covered[j] = true;
                total += inst.dist(i, j);
            }
        }
        if total < best && covered.iter().all(|&c| c) {
            best = total;
        }
    }
    best
}
