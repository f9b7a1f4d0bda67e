// puzzle_cli/src/main.rs
#![forbid(unsafe_code)]

mod rollout;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::rollout::{BoardSetup, NoopSink, RolloutSink, RowFeed, Runner, RunnerConfig, TableSink};
use row_puzzle_engine::{
    COLS, Cell, ClearRule, GreedyPolicy, IdlePolicy, Policy, ROWS, RandomPolicy, parse_board,
    parse_row_codes,
};

#[derive(Parser, Debug)]
#[command(name = "row_puzzle_cli")]
struct Args {
    // ---------------- rollout sizing ----------------
    /// Total turns to execute across sessions.
    #[arg(long, default_value_t = 200)]
    steps: u64,

    /// Base RNG seed (sessions use base_seed + session_id). If omitted, a fixed default is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Policy: greedy | random | idle
    #[arg(long, default_value = "greedy")]
    policy: String,

    /// Clear rule: creature | plain
    #[arg(long, default_value = "creature")]
    clear_rule: String,

    // ---------------- incoming rows ----------------
    /// Empty cells per random incoming row (clamped to width - 1).
    /// With 0 every random row is full and clears on arrival, so rollouts never grow a stack.
    #[arg(long, default_value_t = 1)]
    holes: usize,

    /// Probability that a random incoming row carries a creature.
    #[arg(long, default_value_t = 0.0)]
    creature_prob: f64,

    /// File of manually authored rows (one row of integer codes per line), replayed in a loop
    /// instead of random rows.
    #[arg(long, value_name = "FILE")]
    rows: Option<PathBuf>,

    /// Starting board file (one row of integer codes per line, top row first).
    #[arg(long, value_name = "FILE")]
    board: Option<PathBuf>,

    // ---------------- visualization ----------------
    /**
     * Render board as ASCII every turn; value is sleep in ms (e.g. 30). Omit to disable rendering.
     * Examples:
     *   --render 0    (render as fast as possible)
     *   --render 30   (sleep 30ms between frames)
     */
    #[arg(long, value_name = "ms")]
    render: Option<u64>,

    // ---------------- output / reporting ----------------
    /// Verbosity: 0=silent (final summary only), 1=progress bar, 2=progress bar + periodic table.
    #[arg(long, default_value_t = 1)]
    verbosity: u8,

    /// Print a table row every N turns (only used with --verbosity 2).
    #[arg(long, default_value_t = 2000)]
    report_every: u64,
}

fn init_tracing() {
    // Logs go to stderr so they don't interleave with the table/summary on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_rows_file(path: &PathBuf) -> Result<Vec<Vec<Cell>>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading rows file {}", path.display()))?;
    let mut rows = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = parse_row_codes(line, COLS)
            .with_context(|| format!("{}:{}", path.display(), lineno + 1))?;
        rows.push(row);
    }
    anyhow::ensure!(!rows.is_empty(), "rows file {} has no rows", path.display());
    Ok(rows)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // Session seeds are derived from this base seed.
    let base_seed = args.seed.unwrap_or(12345);
    let clear_rule = ClearRule::from_cli(&args.clear_rule);

    let board = match &args.board {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading board file {}", path.display()))?;
            let grid = parse_board(&text, ROWS, COLS, clear_rule)
                .with_context(|| format!("parsing board file {}", path.display()))?;
            BoardSetup::Fixed(grid)
        }
        None => BoardSetup::Empty,
    };

    let feed = match &args.rows {
        Some(path) => RowFeed::Fixed(read_rows_file(path)?),
        None => RowFeed::Uniform {
            holes: args.holes,
            creature_prob: args.creature_prob,
        },
    };

    // Policy instance (boxed so the CLI can switch implementations at runtime).
    let mut policy: Box<dyn Policy> = match args.policy.as_str() {
        "random" => Box::new(RandomPolicy::new(base_seed.wrapping_add(999))),
        "idle" => Box::new(IdlePolicy),
        _ => Box::new(GreedyPolicy::new()),
    };

    // Rollout configuration (data only; no logic).
    let cfg = RunnerConfig {
        steps: args.steps,
        base_seed,
        clear_rule,
        board,
        feed,

        render_ms: args.render,

        verbosity: args.verbosity,
        report_every: args.report_every,

        policy_name: args.policy.clone(),
    };
    info!(clear_rule = ?cfg.clear_rule, policy = %cfg.policy_name, steps = cfg.steps, "starting rollout");

    // Reporting sink:
    // - verbosity 2 => periodic table (unless report_every == 0)
    // - otherwise   => no-op
    let sink: Box<dyn RolloutSink> = if cfg.verbosity >= 2 && cfg.report_every > 0 {
        Box::new(TableSink::new(20))
    } else {
        Box::new(NoopSink)
    };

    let mut runner = Runner::new(cfg, sink);
    let report = runner.run(&mut *policy)?;

    // Final one-line summary (useful for logs / grep).
    println!(
        "DONE: policy={} clear_rule={:?} turns_done={} elapsed={:.3}s turns/s={:.1} sessions_finished={} avg_len={:.2} max_len={} rows/turn={:.3} score/turn={:.2} avg_empty={:.2} avg_max_h={:.2} total_score={} total_rows={} (last_len={} last_game_over={})",
        report.policy,
        report.clear_rule,
        report.steps_done,
        report.elapsed_s,
        report.steps_per_s,
        report.sessions_finished,
        report.avg_session_len,
        report.max_session_len,
        report.rows_per_step,
        report.score_per_step,
        report.avg_empty,
        report.avg_max_h,
        report.total_score,
        report.total_rows,
        report.last_session_len,
        report.last_game_over,
    );
    Ok(())
}
