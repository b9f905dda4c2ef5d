//! Text format shared with instance producers and solution consumers.
//!
//! Instance: `a b` followed by `a + b` coordinate pairs (A first).
//! Solution: `k`, then `k` lines `i j` (0-based, `i < a <= j`), then the total
//! length with 9 fixed decimals. Tokens are whitespace-separated; line breaks
//! carry no meaning.

use std::str::{FromStr, SplitWhitespace};

use nalgebra::Vector2;

use crate::cover::Cover;
use crate::error::{EdgeCoverError, Result};
use crate::geometry::Instance;

/// A solution as read back from text: edges in printed order and the printed total.
#[derive(Clone, Debug, PartialEq)]
pub struct PrintedCover {
    pub edges: Vec<(usize, usize)>,
    pub total: f64,
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    seen: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            seen: 0,
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let tok = self.inner.next().ok_or_else(|| {
            EdgeCoverError::malformed(format!("unexpected end of input reading {what}"))
        })?;
        self.seen += 1;
        tok.parse().map_err(|_| {
            EdgeCoverError::malformed(format!("token {} ({tok:?}) is not a valid {what}", self.seen))
        })
    }

    fn finish(mut self) -> Result<()> {
        match self.inner.next() {
            None => Ok(()),
            Some(tok) => Err(EdgeCoverError::malformed(format!(
                "trailing token {tok:?} after {} tokens",
                self.seen
            ))),
        }
    }
}

/// Parse an instance; the whole text must be consumed.
pub fn parse_instance(text: &str) -> Result<Instance> {
    let mut toks = Tokens::new(text);
    let a: usize = toks.next("side count a")?;
    let b: usize = toks.next("side count b")?;
    let n = a
        .checked_add(b)
        .ok_or_else(|| EdgeCoverError::malformed("side counts overflow"))?;
    let mut points = Vec::with_capacity(n);
    for _ in 0..n {
        let x: f64 = toks.next("x coordinate")?;
        let y: f64 = toks.next("y coordinate")?;
        points.push(Vector2::new(x, y));
    }
    toks.finish()?;
    Instance::new(a, b, points)
}

/// Render a cover in the solution format.
///
/// The printed total is recomputed from the printed edges so that it is
/// always their exact sum, whatever `cover.total` holds.
pub fn format_cover(inst: &Instance, cover: &Cover) -> String {
    let mut out = format!("{}\n", cover.edges.len());
    let mut total = 0.0;
    for &(i, j) in &cover.edges {
        total += inst.dist(i, j);
        out.push_str(&format!("{i} {j}\n"));
    }
    out.push_str(&format!("{total:.9}\n"));
    out
}

/// Parse a solution; the whole text must be consumed.
pub fn parse_cover(text: &str) -> Result<PrintedCover> {
    let mut toks = Tokens::new(text);
    let k: usize = toks.next("edge count")?;
    let mut edges = Vec::with_capacity(k.min(1 << 20));
    for _ in 0..k {
        let u: usize = toks.next("edge endpoint")?;
        let v: usize = toks.next("edge endpoint")?;
        edges.push((u, v));
    }
    let total: f64 = toks.next("total length")?;
    toks.finish()?;
    Ok(PrintedCover { edges, total })
}
