// puzzle_cli/src/rollout/runner.rs
#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::{Context, Result, ensure};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use row_puzzle_engine::{
    COLS, Cell, ClearRule, FixedRowSource, Game, Grid, Policy, ROWS, RowSource, UniformRowSource,
};

use super::sinks::{ReportRow, RolloutSink};
use super::stats::{FinalReport, RolloutStats};

/// Fixed internal cadence for progress-bar live message updates.
/// (No CLI knob on purpose.)
const LIVE_EVERY: u64 = 200;

/// Board every session starts from.
#[derive(Clone, Debug)]
pub enum BoardSetup {
    Empty,
    Fixed(Grid),
}

/// Where incoming rows come from.
#[derive(Clone, Debug)]
pub enum RowFeed {
    /// Seeded random rows (seed = session seed).
    Uniform { holes: usize, creature_prob: f64 },
    /// Manually authored rows, replayed in a loop.
    Fixed(Vec<Vec<Cell>>),
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    // ---------------- core rollout ----------------
    /// Total turns to execute across sessions.
    pub steps: u64,
    /// Base seed; each session uses base_seed + session_id.
    pub base_seed: u64,
    pub clear_rule: ClearRule,

    pub board: BoardSetup,
    pub feed: RowFeed,

    /// Used only for the final report string.
    pub policy_name: String,

    // ---------------- output ----------------
    /// 0 = final summary only
    /// 1 = progress bar
    /// 2 = progress bar + periodic table (via sink)
    pub verbosity: u8,

    /// Print a table row every N turns (only used when verbosity == 2).
    /// 0 disables table reporting.
    pub report_every: u64,

    // ---------------- rendering ----------------
    /// If Some(ms): render every turn; sleep ms between frames (0 = no sleep).
    pub render_ms: Option<u64>,
}

impl RunnerConfig {
    fn new_session(&self, session_id: u64) -> Result<Game> {
        let seed = self.base_seed.wrapping_add(session_id);

        let grid = match &self.board {
            BoardSetup::Empty => Grid::with_rule(ROWS, COLS, self.clear_rule),
            BoardSetup::Fixed(g) => g.clone(),
        };

        let source: Box<dyn RowSource> = match &self.feed {
            RowFeed::Uniform {
                holes,
                creature_prob,
            } => Box::new(
                UniformRowSource::new(seed)
                    .with_holes(*holes)
                    .with_creature_prob(*creature_prob),
            ),
            RowFeed::Fixed(rows) => Box::new(
                FixedRowSource::new(rows.clone(), COLS).context("fixed row list")?,
            ),
        };

        debug!(session_id, seed, "new session");
        let game = Game::with_source(grid, source);
        // A full-top starting board would reset forever without playing a turn.
        ensure!(
            !game.is_game_over(),
            "starting board already has blocks in its top row"
        );
        Ok(game)
    }
}

pub struct Runner {
    cfg: RunnerConfig,
    sink: Box<dyn RolloutSink>,
}

impl Runner {
    pub fn new(cfg: RunnerConfig, sink: Box<dyn RolloutSink>) -> Self {
        Self { cfg, sink }
    }

    pub fn run(&mut self, policy: &mut dyn Policy) -> Result<FinalReport> {
        let cfg = self.cfg.clone();

        // Progress bar is UI only; runner logic does not depend on it.
        let pb = if cfg.verbosity >= 1 {
            let pb = ProgressBar::new(cfg.steps);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos:>9}/{len:<9}  {percent:>3}%  {elapsed_precise}  {msg}",
                )
                .context("progress bar template")?
                .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stats = RolloutStats::new();

        // Session state.
        let mut session_id: u64 = 0;
        let mut game = cfg.new_session(session_id)?;

        // Totals across completed sessions (live totals include current session too).
        let mut total_rows_finished: u64 = 0;
        let mut total_score_finished: u64 = 0;

        // Rendering is a separate axis from verbosity.
        if cfg.render_ms.is_some() {
            print!("{}", game.render_ascii());
        }

        while stats.steps_done < cfg.steps {
            // ------------------------------------------------------------
            // Session boundary: finalize counters, then reset.
            // ------------------------------------------------------------
            if game.is_game_over() {
                stats.on_session_end();

                total_rows_finished += game.rows_cleared;
                total_score_finished += game.score;

                session_id += 1;
                game = cfg.new_session(session_id)?;

                if cfg.render_ms.is_some() {
                    println!(
                        "=== reset: sessions_finished={} avg_len={:.2} max_len={} ===",
                        stats.sessions_finished,
                        stats.avg_session_len(),
                        stats.session_len_max
                    );
                    print!("{}", game.render_ascii());
                }
                continue;
            }

            // ------------------------------------------------------------
            // One turn: policy chooses an optional slide.
            // ------------------------------------------------------------
            let mv = policy.choose_move(&game);
            let r = game
                .step(mv)
                .with_context(|| format!("turn {} of session {session_id}", game.turns + 1))?;

            stats.on_step(&game.grid, r.cleared_rows);

            if let Some(ref pb) = pb {
                pb.inc(1);
            }

            if let Some(ms) = cfg.render_ms {
                println!(
                    "turn={} move={:?} rows={}",
                    stats.steps_done, mv, game.rows_cleared
                );
                print!("{}", game.render_ascii());
                if ms > 0 {
                    std::thread::sleep(Duration::from_millis(ms));
                }
            }

            // ------------------------------------------------------------
            // Periodic table report (verbosity == 2 only).
            // ------------------------------------------------------------
            if cfg.verbosity == 2
                && cfg.report_every > 0
                && (stats.steps_done % cfg.report_every == 0)
            {
                let live_total_rows = total_rows_finished + game.rows_cleared;
                let live_total_score = total_score_finished + game.score;

                let row = ReportRow {
                    step: stats.steps_done,
                    steps_total: cfg.steps,
                    sps: stats.steps_per_sec(),

                    sessions_finished: stats.sessions_finished,
                    avg_session_len: stats.avg_session_len(),
                    max_session_len: stats.session_len_max,

                    rows_per_step: stats.rows_per_step(live_total_rows),
                    score_per_step: stats.score_per_step(live_total_score),

                    max_h_worst: stats.max_h_worst,
                    avg_max_h: stats.avg_max_h(),
                    avg_empty: stats.avg_empty(),
                    avg_creatures: stats.avg_creatures(),
                    avg_d_empty: stats.avg_d_empty(),
                };

                self.sink.on_report_row(&row, pb.as_ref());
            }

            if cfg.verbosity >= 1 && (stats.steps_done % LIVE_EVERY == 0) {
                let live_total_rows = total_rows_finished + game.rows_cleared;
                let live_total_score = total_score_finished + game.score;

                let msg = stats.live_msg(
                    cfg.clear_rule,
                    stats.rows_per_step(live_total_rows),
                    stats.score_per_step(live_total_score),
                );

                if let Some(ref pb) = pb {
                    pb.set_message(msg);
                }
            }
        }

        // Include current in-progress session in totals.
        let total_rows = total_rows_finished + game.rows_cleared;
        let total_score = total_score_finished + game.score;

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        Ok(stats.final_report(
            &cfg.policy_name,
            cfg.clear_rule,
            total_rows,
            total_score,
            stats.session_len,
            game.is_game_over(),
        ))
    }
}
