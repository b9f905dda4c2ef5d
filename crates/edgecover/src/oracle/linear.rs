use super::{better, NearestSite, Site};
use crate::geometry::Point;

/// Flat list of sites, scanned on every query.
#[derive(Clone, Debug, Default)]
pub struct LinearScan {
    sites: Vec<Site>,
}

impl NearestSite for LinearScan {
    fn build(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    fn insert<I: IntoIterator<Item = Site>>(&mut self, sites: I) {
        self.sites.extend(sites);
    }

    fn nearest(&self, q: &Point) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        for s in &self.sites {
            let score = s.score(q);
            if better(score, s.id, best) {
                best = Some((score, s.id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn len(&self) -> usize {
        self.sites.len()
    }
}
