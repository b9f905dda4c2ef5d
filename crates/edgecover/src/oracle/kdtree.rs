//! Static 2-d tree for additively-weighted nearest-site queries.
//!
//! Each node holds one site (the median along its split axis) plus the
//! bounding box and maximum weight of its subtree. For a query `q`, no site in
//! a subtree can score below `box_distance(q) − max_weight`, which drives the
//! pruning. Insertion appends and rebuilds; the solver only inserts in bulk.

use super::{better, NearestSite, Site};
use crate::geometry::Point;

#[derive(Clone, Debug)]
struct Node {
    site: Site,
    axis: usize,
    lo: [f64; 2],
    hi: [f64; 2],
    max_weight: f64,
    left: Option<usize>,
    right: Option<usize>,
}

/// Weighted 2-d tree over a set of sites.
#[derive(Clone, Debug, Default)]
pub struct KdTree {
    sites: Vec<Site>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTree {
    fn rebuild(&mut self) {
        self.nodes.clear();
        self.nodes.reserve(self.sites.len());
        let mut scratch = self.sites.clone();
        self.root = build_rec(&mut self.nodes, &mut scratch, 0);
    }

    fn search(&self, node: usize, q: &Point, best: &mut Option<(f64, usize)>) {
        let n = &self.nodes[node];
        if let Some((score, _)) = *best {
            if box_distance(q, &n.lo, &n.hi) - n.max_weight > score {
                return;
            }
        }
        let score = n.site.score(q);
        if better(score, n.site.id, *best) {
            *best = Some((score, n.site.id));
        }
        let (near, far) = if q[n.axis] < n.site.at[n.axis] {
            (n.left, n.right)
        } else {
            (n.right, n.left)
        };
        if let Some(c) = near {
            self.search(c, q, best);
        }
        if let Some(c) = far {
            self.search(c, q, best);
        }
    }
}

fn build_rec(nodes: &mut Vec<Node>, sites: &mut [Site], depth: usize) -> Option<usize> {
    if sites.is_empty() {
        return None;
    }
    let axis = depth % 2;
    let mid = sites.len() / 2;
    sites.select_nth_unstable_by(mid, |p, q| p.at[axis].total_cmp(&q.at[axis]));
    let site = sites[mid];
    let (left_half, rest) = sites.split_at_mut(mid);
    let left = build_rec(nodes, left_half, depth + 1);
    let right = build_rec(nodes, &mut rest[1..], depth + 1);

    let mut lo = [site.at.x, site.at.y];
    let mut hi = lo;
    let mut max_weight = site.weight;
    for child in [left, right].into_iter().flatten() {
        let c = &nodes[child];
        for k in 0..2 {
            lo[k] = lo[k].min(c.lo[k]);
            hi[k] = hi[k].max(c.hi[k]);
        }
        max_weight = max_weight.max(c.max_weight);
    }
    nodes.push(Node {
        site,
        axis,
        lo,
        hi,
        max_weight,
        left,
        right,
    });
    Some(nodes.len() - 1)
}

/// Distance from `q` to the axis-aligned box `[lo, hi]` (zero inside).
#[inline]
fn box_distance(q: &Point, lo: &[f64; 2], hi: &[f64; 2]) -> f64 {
    let dx = (lo[0] - q.x).max(0.0).max(q.x - hi[0]);
    let dy = (lo[1] - q.y).max(0.0).max(q.y - hi[1]);
    dx.hypot(dy)
}

impl NearestSite for KdTree {
    fn build(sites: Vec<Site>) -> Self {
        let mut tree = Self {
            sites,
            nodes: Vec::new(),
            root: None,
        };
        tree.rebuild();
        tree
    }

    fn insert<I: IntoIterator<Item = Site>>(&mut self, sites: I) {
        let before = self.sites.len();
        self.sites.extend(sites);
        if self.sites.len() != before {
            self.rebuild();
        }
    }

    fn nearest(&self, q: &Point) -> Option<usize> {
        let mut best = None;
        if let Some(root) = self.root {
            self.search(root, q, &mut best);
        }
        best.map(|(_, id)| id)
    }

    fn len(&self) -> usize {
        self.sites.len()
    }
}
