//! Fast covers without optimality guarantees.
//!
//! - [`nearest_neighbor`]: every vertex takes its closest opposite vertex.
//! - [`best_of_two`]: attach each still-uncovered vertex to its nearest
//!   neighbor, scanning forwards and backwards, and keep the cheaper pass.
//! - [`greedy_star`], [`greedy_star_improved`]: accept edges by increasing
//!   length while the chosen edges form a forest of stars, with local
//!   exchanges between stars.
//!
//! All of them always return a valid cover.

use std::collections::BTreeSet;

use crate::cover::Cover;
use crate::dual::Baseline;
use crate::geometry::Instance;

/// One edge per vertex to its nearest opposite vertex; mutual pairs once.
pub fn nearest_neighbor(inst: &Instance) -> Cover {
    let base = Baseline::compute(inst);
    let mut cover = Cover::default();
    for i in inst.a_range() {
        let j = base.closest[i];
        cover.total += inst.dist(i, j);
        cover.edges.push((i, j));
    }
    for j in inst.b_range() {
        let i = base.closest[j];
        if base.closest[i] == j {
            continue;
        }
        cover.total += inst.dist(i, j);
        cover.edges.push((i, j));
    }
    cover
}

fn attach_in_order(inst: &Instance, base: &Baseline, order: impl Iterator<Item = usize>) -> Cover {
    let mut cover = Cover::default();
    let mut covered = vec![false; inst.vertex_count()];
    for v in order {
        if covered[v] {
            continue;
        }
        let u = base.closest[v];
        cover.push(inst, v, u);
        covered[v] = true;
        covered[u] = true;
    }
    cover
}

/// Cheaper of the forward and the backward nearest-neighbor pass; the
/// forward pass wins ties.
pub fn best_of_two(inst: &Instance) -> Cover {
    let base = Baseline::compute(inst);
    let n = inst.vertex_count();
    let forward = attach_in_order(inst, &base, 0..n);
    let backward = attach_in_order(inst, &base, (0..n).rev());
    if backward.total < forward.total {
        backward
    } else {
        forward
    }
}

/// Shape of a vertex's neighborhood inside the star forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    Isolated,
    /// Both ends of a lone edge.
    EdgeEnd,
    /// Degree one, attached to a center.
    Leaf,
    /// Degree two or more.
    Central,
}

/// Chosen edges as adjacency sets. Every component is a star.
struct Stars {
    adj: Vec<BTreeSet<usize>>,
}

impl Stars {
    fn new(n: usize) -> Self {
        Self {
            adj: vec![BTreeSet::new(); n],
        }
    }

    /// The single neighbor of a degree-one vertex.
    fn other(&self, p: usize) -> usize {
        self.adj[p].iter().next().copied().unwrap_or(p)
    }

    fn role(&self, p: usize) -> Role {
        match self.adj[p].len() {
            0 => Role::Isolated,
            1 if self.adj[self.other(p)].len() == 1 => Role::EdgeEnd,
            1 => Role::Leaf,
            _ => Role::Central,
        }
    }

    fn link(&mut self, u: usize, v: usize) {
        self.adj[u].insert(v);
        self.adj[v].insert(u);
    }

    fn unlink(&mut self, u: usize, v: usize) {
        self.adj[u].remove(&v);
        self.adj[v].remove(&u);
    }

    /// Replace `(u, ux)` and `(v, vx)` by `(u, v)` and `(ux, vx)` when that is shorter.
    fn try_exchange(&mut self, inst: &Instance, u: usize, v: usize) {
        let (ux, vx) = (self.other(u), self.other(v));
        if inst.dist(u, v) + inst.dist(ux, vx) < inst.dist(u, ux) + inst.dist(v, vx) {
            self.unlink(u, ux);
            self.unlink(v, vx);
            self.link(u, v);
            self.link(ux, vx);
        }
    }

    /// Decide on the candidate edge `(p, q)`.
    fn offer(&mut self, inst: &Instance, p: usize, q: usize, exchanges: bool) {
        let (u, v) = if self.role(p) <= self.role(q) { (p, q) } else { (q, p) };
        match (self.role(u), self.role(v)) {
            (Role::Isolated, Role::Leaf) => {
                let center = self.other(v);
                self.unlink(v, center);
                self.link(u, v);
            }
            (Role::Isolated, _) => self.link(u, v),
            (Role::EdgeEnd, Role::EdgeEnd | Role::Leaf) if exchanges => {
                self.try_exchange(inst, u, v)
            }
            (Role::Leaf, Role::Leaf) => {
                let (cu, cv) = (self.other(u), self.other(v));
                if inst.dist(u, v) < inst.dist(u, cu) + inst.dist(v, cv) {
                    self.unlink(u, cu);
                    self.unlink(v, cv);
                    self.link(u, v);
                }
            }
            _ => {}
        }
    }

    fn into_cover(self, inst: &Instance) -> Cover {
        let mut cover = Cover::default();
        for i in inst.a_range() {
            for &j in &self.adj[i] {
                cover.push(inst, i, j);
            }
        }
        cover
    }
}

/// Every A–B edge by increasing length, ties in `(i, j)` order.
fn sorted_edges(inst: &Instance) -> Vec<(usize, usize)> {
    let mut edges: Vec<(usize, usize)> = inst
        .a_range()
        .flat_map(|i| inst.b_range().map(move |j| (i, j)))
        .collect();
    edges.sort_by(|&(i1, j1), &(i2, j2)| inst.dist(i1, j1).total_cmp(&inst.dist(i2, j2)));
    edges
}

fn grow_stars(inst: &Instance, exchanges: bool) -> Stars {
    let mut stars = Stars::new(inst.vertex_count());
    for (i, j) in sorted_edges(inst) {
        stars.offer(inst, i, j, exchanges);
    }
    stars
}

/// Kruskal-style star forest: an edge is accepted when it attaches an
/// isolated vertex, or when it replaces two longer leaf edges.
pub fn greedy_star(inst: &Instance) -> Cover {
    grow_stars(inst, false).into_cover(inst)
}

/// [`greedy_star`] plus two-edge exchanges between lone edges and leaves,
/// followed by moving every leaf to its nearest opposite vertex.
pub fn greedy_star_improved(inst: &Instance) -> Cover {
    let mut stars = grow_stars(inst, true);
    let base = Baseline::compute(inst);
    let n = inst.vertex_count();
    for _ in 0..n {
        let mut changed = false;
        for v in 0..n {
            let center = stars.other(v);
            if stars.role(v) == Role::Leaf && base.closest[v] != center {
                stars.unlink(v, center);
                stars.link(v, base.closest[v]);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    tracing::debug!(vertices = n, "star forest settled");
    stars.into_cover(inst)
}
