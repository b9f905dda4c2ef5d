use super::round::bucket_size;
use super::*;
use crate::geometry::Point;
use crate::reference;
use crate::testutil::{exhaustive_optimum, random_instance};
use crate::wire::{format_cover, parse_cover, parse_instance};
use proptest::prelude::*;

const ALL_CFGS: [SolverCfg; 4] = [
    SolverCfg {
        eps_tight: 1e-15,
        policy: DeficiencyPolicy::Single,
        oracle: OracleKind::LinearScan,
    },
    SolverCfg {
        eps_tight: 1e-15,
        policy: DeficiencyPolicy::Single,
        oracle: OracleKind::KdTree,
    },
    SolverCfg {
        eps_tight: 1e-15,
        policy: DeficiencyPolicy::Batched,
        oracle: OracleKind::LinearScan,
    },
    SolverCfg {
        eps_tight: 1e-15,
        policy: DeficiencyPolicy::Batched,
        oracle: OracleKind::KdTree,
    },
];

fn printed_total(inst: &Instance, cover: &Cover) -> f64 {
    parse_cover(&format_cover(inst, cover)).unwrap().total
}

#[test]
fn single_pair() {
    let inst = parse_instance("1 1\n0 0\n3 4\n").unwrap();
    for cfg in ALL_CFGS {
        let cover = solve(&inst, cfg).unwrap();
        assert_eq!(cover.edges, vec![(0, 1)]);
        assert_eq!(format_cover(&inst, &cover), "1\n0 1\n5.000000000\n");
    }
}

#[test]
fn both_a_points_share_the_b_point() {
    let inst = parse_instance("2 1\n0 0\n10 0\n1 0\n").unwrap();
    for cfg in ALL_CFGS {
        let cover = solve(&inst, cfg).unwrap();
        let mut edges = cover.edges.clone();
        edges.sort();
        assert_eq!(edges, vec![(0, 2), (1, 2)]);
        assert!(format_cover(&inst, &cover).ends_with("\n10.000000000\n"));
    }
}

#[test]
fn far_b_points_still_covered() {
    let inst = parse_instance("3 3\n0 0\n1 0\n0 1\n0.5 0.5\n100 100\n-100 50\n").unwrap();
    for cfg in ALL_CFGS {
        let cover = solve(&inst, cfg).unwrap();
        assert!(cover.is_cover(&inst));
        let covered = cover.covered(inst.vertex_count());
        assert!(covered[4] && covered[5]);
        let opt = exhaustive_optimum(&inst);
        assert!((cover.total - opt).abs() < 1e-9, "{} vs {opt}", cover.total);
    }
}

#[test]
fn coincident_points_total_is_zero() {
    let inst = parse_instance("1 1\n2.5 -1\n2.5 -1\n").unwrap();
    for cfg in ALL_CFGS {
        let cover = solve(&inst, cfg).unwrap();
        assert_eq!(cover.total, 0.0);
        assert_eq!(format_cover(&inst, &cover), "1\n0 1\n0.000000000\n");
    }
}

#[test]
fn tree_grows_through_matched_vertex() {
    // Both B points want A0; the second root reroutes B2 to A1.
    let inst = parse_instance("2 2\n0 0\n10 0\n1 0\n-1 0\n").unwrap();
    let sol = solve_duals(&inst, SolverCfg::default()).unwrap();
    assert_eq!(sol.stats.tree_growths, 1);
    assert_eq!(sol.stats.augmentations, 2);
    assert_eq!(sol.matching.partner(0), Some(3));
    assert_eq!(sol.matching.partner(1), Some(2));
    assert!((sol.objective() - 10.0).abs() < 1e-12);
    let cover = solve(&inst, SolverCfg::default()).unwrap();
    assert!((cover.total - 10.0).abs() < 1e-12);
}

#[test]
fn exhausted_budget_forces_resolution() {
    // One A point, two B points on a line: the far B point cannot be matched.
    let inst = parse_instance("1 2\n0 0\n1 0\n2 0\n").unwrap();
    let sol = solve_duals(&inst, SolverCfg::default()).unwrap();
    assert_eq!(sol.stats.forced_resolutions, 1);
    assert_eq!(sol.matching.partner(0), Some(1));
    assert_eq!(sol.duals.beta(2), 0.0);
    assert!((sol.duals.alpha(0) - 1.0).abs() < 1e-12);
    let cover = solve(&inst, SolverCfg::default()).unwrap();
    assert_eq!(cover.edges, vec![(0, 1), (0, 2)]);
    assert!((cover.total - 3.0).abs() < 1e-12);
}

#[test]
fn converged_duals_vanish_on_unmatched_b() {
    let inst = random_instance(11, 30, 40, 3.0 * 70f64.sqrt());
    for cfg in ALL_CFGS {
        let sol = solve_duals(&inst, cfg).unwrap();
        assert!(sol.matching.is_consistent());
        for j in inst.b_range() {
            assert!(sol.matching.partner(j).is_some() || sol.duals.beta(j) <= cfg.eps_tight);
            assert!(sol.duals.beta(j) >= 0.0);
        }
        for i in inst.a_range() {
            assert!(sol.duals.alpha(i) >= -1e-9);
        }
    }
}

#[test]
fn matches_reference_on_random_fifty_by_fifty() {
    for seed in [1u64, 2, 3] {
        let inst = random_instance(seed, 50, 50, 30.0);
        let reference = reference::solve(&inst, 1e-15).unwrap();
        for cfg in ALL_CFGS {
            let cover = solve(&inst, cfg).unwrap();
            assert!(cover.is_cover(&inst));
            assert!(
                (cover.total - reference.total).abs() < 1e-6,
                "seed {seed} {cfg:?}: {} vs {}",
                cover.total,
                reference.total
            );
        }
    }
}

#[test]
fn objective_equals_cover_total() {
    let inst = random_instance(5, 40, 25, 20.0);
    for cfg in ALL_CFGS {
        let sol = solve_duals(&inst, cfg).unwrap();
        let cover = Cover::complete(&inst, &sol.matching, &sol.baseline);
        assert!((cover.total - sol.objective()).abs() < 1e-6);
    }
}

#[test]
fn unbalanced_sides() {
    for (a, b) in [(1, 30), (30, 1), (7, 60), (60, 7)] {
        let inst = random_instance((a * 100 + b) as u64, a, b, 10.0);
        let reference = reference::solve(&inst, 1e-15).unwrap();
        for cfg in ALL_CFGS {
            let cover = solve(&inst, cfg).unwrap();
            assert!(cover.is_cover(&inst));
            assert!((cover.total - reference.total).abs() < 1e-6);
        }
    }
}

#[test]
fn staggered_rows_with_exact_ties() {
    // Every B point is equidistant from two A points.
    let mut text = String::from("40 40\n");
    for k in 0..40 {
        text.push_str(&format!("{} 0\n", k as f64));
    }
    for k in 0..40 {
        text.push_str(&format!("{} 1\n", k as f64 + 0.5));
    }
    let inst = parse_instance(&text).unwrap();
    let reference = reference::solve(&inst, 1e-15).unwrap();
    for cfg in ALL_CFGS {
        let sol = solve_duals(&inst, cfg).unwrap();
        let cover = Cover::complete(&inst, &sol.matching, &sol.baseline);
        assert!((cover.total - reference.total).abs() < 1e-6);
        assert!(sol.stats.outer_iterations <= 2 * inst.b());
    }
}

#[test]
fn bucket_size_is_ceil_sqrt() {
    assert_eq!(bucket_size(1), 1);
    assert_eq!(bucket_size(2), 2);
    assert_eq!(bucket_size(4), 2);
    assert_eq!(bucket_size(5), 3);
    assert_eq!(bucket_size(100), 10);
    assert_eq!(bucket_size(101), 11);
}

#[test]
fn round_partitions_a_into_buckets() {
    let inst = random_instance(3, 10, 4, 5.0);
    let base = Baseline::compute(&inst);
    let duals = DualState::initial(&inst, &base);
    let mut stats = SolveStats::default();
    let round = Round::<LinearScan>::new(&inst, &base, &duals, &[10, 11], &mut stats);
    assert_eq!(round.sizes(), (2, 0, 0, 10));
    assert_eq!(stats.bucket_rebuilds, 4);
}

fn tiny_instance() -> impl Strategy<Value = Instance> {
    (1usize..=3, 1usize..=4).prop_flat_map(|(a, b)| {
        prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), a + b).prop_map(move |pts| {
            let points = pts.into_iter().map(|(x, y)| Point::new(x, y)).collect();
            Instance::new(a, b, points).unwrap()
        })
    })
}

fn small_instance() -> impl Strategy<Value = Instance> {
    (1usize..=12, 1usize..=12).prop_flat_map(|(a, b)| {
        prop::collection::vec((0.0f64..20.0, 0.0f64..20.0), a + b).prop_map(move |pts| {
            let points = pts.into_iter().map(|(x, y)| Point::new(x, y)).collect();
            Instance::new(a, b, points).unwrap()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_optimal_on_tiny_instances(inst in tiny_instance()) {
        let opt = exhaustive_optimum(&inst);
        for cfg in ALL_CFGS {
            let cover = solve(&inst, cfg).unwrap();
            prop_assert!(cover.is_cover(&inst));
            prop_assert!((cover.total - opt).abs() < 1e-6, "{} vs {}", cover.total, opt);
        }
    }

    #[test]
    fn prop_cover_and_printed_total(inst in small_instance()) {
        for cfg in ALL_CFGS {
            let cover = solve(&inst, cfg).unwrap();
            prop_assert!(cover.is_cover(&inst));
            let recomputed: f64 = cover.edges.iter().map(|&(i, j)| inst.dist(i, j)).sum();
            prop_assert!((printed_total(&inst, &cover) - recomputed).abs() < 1e-9);
            prop_assert!((cover.total - recomputed).abs() <= 1e-9 * recomputed.max(1.0));
        }
    }

    #[test]
    fn prop_accelerated_matches_reference(inst in small_instance()) {
        let reference = reference::solve_duals(&inst, 1e-15).unwrap();
        for cfg in ALL_CFGS {
            let sol = solve_duals(&inst, cfg).unwrap();
            prop_assert!(sol.matching.is_consistent());
            prop_assert!(sol.stats.outer_iterations <= inst.b() + sol.matching.len());
            prop_assert!((sol.objective() - reference.objective()).abs() < 1e-6);
        }
    }
}

/// Drives the outer loop by hand so the partner table can be checked after
/// every iteration, not only at convergence.
fn step_and_check<O: NearestSite>(inst: &Instance, policy: DeficiencyPolicy) -> usize {
    let base = Baseline::compute(inst);
    let mut duals = DualState::initial(inst, &base);
    let mut matching = Matching::new(inst.vertex_count());
    let mut stats = SolveStats::default();
    let mut iterations = 0;
    loop {
        let roots: Vec<usize> = {
            let bad = deficient(inst, &duals, &matching, 1e-15);
            match policy {
                DeficiencyPolicy::Single => bad.take(1).collect(),
                DeficiencyPolicy::Batched => bad.collect(),
            }
        };
        if roots.is_empty() {
            break;
        }
        let mut round = Round::<O>::new(inst, &base, &duals, &roots, &mut stats);
        let end = round.run(&mut matching, 1e-15, &mut stats).unwrap();
        round.finish(end).apply(&mut duals);
        iterations += 1;
        assert!(matching.is_consistent(), "iteration {iterations}: {end:?}");
        for v in 0..inst.vertex_count() {
            if let Some(u) = matching.partner(v) {
                assert_eq!(matching.partner(u), Some(v));
                assert_ne!(inst.is_a(u), inst.is_a(v));
            }
        }
        assert!(iterations <= 2 * inst.b(), "no convergence");
    }
    iterations
}

#[test]
fn partner_table_stays_symmetric_every_iteration() {
    for seed in [21u64, 22, 23] {
        let inst = random_instance(seed, 25, 35, 12.0);
        for policy in [DeficiencyPolicy::Single, DeficiencyPolicy::Batched] {
            assert!(step_and_check::<LinearScan>(&inst, policy) > 0);
            assert!(step_and_check::<KdTree>(&inst, policy) > 0);
        }
    }
}
