use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use edgecover::prelude::*;
use edgecover::{reference, SolveStats};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "edgecover")]
#[command(about = "Minimum-length bipartite edge covers of planar point sets")]
struct Cmd {
    /// Maximum level of the diagnostics written to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve an instance and print the cover
    Solve(SolveArgs),
    /// Check a printed solution against its instance; prints 1 or 0
    Verify {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        solution: PathBuf,
    },
    /// Print the version and default solver configuration as JSON
    Report,
}

#[derive(Args, Clone, Debug)]
struct SolveArgs {
    /// Instance file; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Solution file; stdout when omitted. A provenance sidecar is written next to it.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Algo::Accelerated)]
    algo: Algo,
    #[arg(long, value_enum, default_value_t = Policy::Single)]
    policy: Policy,
    #[arg(long, value_enum, default_value_t = Oracle::LinearScan)]
    oracle: Oracle,
    /// Slack at or below which an edge counts as tight
    #[arg(long, default_value_t = 1e-15)]
    eps_tight: f64,
}

#[derive(ValueEnum, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum Algo {
    /// Bucketed primal-dual solver
    Accelerated,
    /// Full-scan primal-dual solver
    Reference,
    /// Nearest opposite neighbor per vertex (not optimal)
    NearestNeighbor,
    /// Cheaper of a forward and a backward nearest-neighbor pass (not optimal)
    BestOfTwo,
    /// Greedy star forest by increasing edge length (not optimal)
    GreedyStar,
    /// Greedy star forest with edge exchanges and leaf moves (not optimal)
    GreedyStarImproved,
}

#[derive(ValueEnum, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum Policy {
    Single,
    Batched,
}

#[derive(ValueEnum, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum Oracle {
    LinearScan,
    KdTree,
}

impl From<Policy> for DeficiencyPolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Single => DeficiencyPolicy::Single,
            Policy::Batched => DeficiencyPolicy::Batched,
        }
    }
}

impl From<Oracle> for OracleKind {
    fn from(o: Oracle) -> Self {
        match o {
            Oracle::LinearScan => OracleKind::LinearScan,
            Oracle::KdTree => OracleKind::KdTree,
        }
    }
}

impl SolveArgs {
    fn cfg(&self) -> SolverCfg {
        SolverCfg {
            eps_tight: self.eps_tight,
            policy: self.policy.into(),
            oracle: self.oracle.into(),
        }
    }
}

/// Solver parameters as recorded in the sidecar.
#[derive(Serialize)]
struct RunParams {
    algo: Algo,
    policy: Policy,
    oracle: Oracle,
    eps_tight: f64,
    input: Option<String>,
}

/// Mirror of [`SolveStats`] for serialization.
#[derive(Serialize, Debug, PartialEq, Eq)]
struct StatsDoc {
    outer_iterations: usize,
    augmentations: usize,
    forced_resolutions: usize,
    dual_shifts: usize,
    tree_growths: usize,
    bucket_rebuilds: usize,
    surplus_folds: usize,
}

impl From<SolveStats> for StatsDoc {
    fn from(s: SolveStats) -> Self {
        Self {
            outer_iterations: s.outer_iterations,
            augmentations: s.augmentations,
            forced_resolutions: s.forced_resolutions,
            dual_shifts: s.dual_shifts,
            tree_growths: s.tree_growths,
            bucket_rebuilds: s.bucket_rebuilds,
            surplus_folds: s.surplus_folds,
        }
    }
}

#[derive(Serialize)]
struct RunSummary {
    a: usize,
    b: usize,
    edges: usize,
    total: f64,
    stats: Option<StatsDoc>,
}

struct Outcome {
    cover: Cover,
    stats: Option<SolveStats>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(cmd.log_level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Solve(args) => {
            let rendered = solve_cmd(&args)?;
            if args.out.is_none() {
                std::io::stdout().lock().write_all(rendered.as_bytes())?;
            }
            Ok(())
        }
        Action::Verify { input, solution } => {
            let ok = verify_cmd(&input, &solution)?;
            println!("{}", u8::from(ok));
            Ok(())
        }
        Action::Report => report(),
    }
}

fn read_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

fn heuristic(cover: Cover) -> Outcome {
    Outcome { cover, stats: None }
}

fn run_solver(inst: &Instance, args: &SolveArgs) -> Result<Outcome> {
    let outcome = match args.algo {
        Algo::Accelerated => {
            let sol = solve_duals(inst, args.cfg())?;
            Outcome {
                cover: Cover::complete(inst, &sol.matching, &sol.baseline),
                stats: Some(sol.stats),
            }
        }
        Algo::Reference => {
            let sol = reference::solve_duals(inst, args.eps_tight)?;
            Outcome {
                cover: Cover::complete(inst, &sol.matching, &sol.baseline),
                stats: Some(sol.stats),
            }
        }
        Algo::NearestNeighbor => heuristic(nearest_neighbor(inst)),
        Algo::BestOfTwo => heuristic(best_of_two(inst)),
        Algo::GreedyStar => heuristic(greedy_star(inst)),
        Algo::GreedyStarImproved => heuristic(greedy_star_improved(inst)),
    };
    Ok(outcome)
}

/// Solve and render. With `--out`, also writes the file and its sidecar.
fn solve_cmd(args: &SolveArgs) -> Result<String> {
    let text = read_text(args.input.as_deref())?;
    let inst = parse_instance(&text).context("parsing instance")?;
    tracing::info!(a = inst.a(), b = inst.b(), algo = ?args.algo, "solve");
    let outcome = run_solver(&inst, args)?;
    let rendered = format_cover(&inst, &outcome.cover);

    if let Some(out) = &args.out {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        std::fs::write(out, &rendered).with_context(|| format!("writing {}", out.display()))?;
        let params = RunParams {
            algo: args.algo,
            policy: args.policy,
            oracle: args.oracle,
            eps_tight: args.eps_tight,
            input: args.input.as_ref().map(|p| p.to_string_lossy().into_owned()),
        };
        let summary = RunSummary {
            a: inst.a(),
            b: inst.b(),
            edges: outcome.cover.edges.len(),
            total: outcome.cover.total,
            stats: outcome.stats.map(StatsDoc::from),
        };
        provenance::write_sidecar(
            out,
            Payload::new(serde_json::to_value(params)?, serde_json::to_value(summary)?),
        )?;
    }
    Ok(rendered)
}

/// Judge a solution file. A solution that does not parse or names vertices
/// outside the instance is judged invalid rather than reported as an error.
fn verify_cmd(input: &Path, solution: &Path) -> Result<bool> {
    let inst = parse_instance(&read_text(Some(input))?).context("parsing instance")?;
    let text = read_text(Some(solution))?;
    let verdict = match parse_cover(&text).and_then(|printed| verify(&inst, &printed)) {
        Ok(verdict) => verdict,
        Err(err) => {
            tracing::warn!(%err, solution = %solution.display(), "rejecting solution");
            return Ok(false);
        }
    };
    tracing::info!(
        covered_all = verdict.covered_all,
        recomputed = verdict.total_recomputed,
        printed = verdict.total_printed,
        "verify"
    );
    Ok(verdict.ok())
}

fn report() -> Result<()> {
    let defaults = SolverCfg::default();
    let obj = serde_json::json!({
        "code_rev": provenance::code_rev(),
        "defaults": {
            "eps_tight": defaults.eps_tight,
            "policy": format!("{:?}", defaults.policy),
            "oracle": format!("{:?}", defaults.oracle),
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
