// puzzle_cli/src/rollout/stats.rs
#![forbid(unsafe_code)]

use std::time::Instant;

use row_puzzle_engine::{ClearRule, GridFeatures, Grid, compute_grid_features};

#[derive(Clone, Debug)]
pub struct RolloutStats {
    pub sessions_finished: u64,
    pub session_len: u64,
    pub session_len_sum: u64,
    pub session_len_max: u64,

    pub steps_done: u64,
    pub clearing_steps: u64,

    // board aggregates (absolute, across ALL turns)
    pub sum_empty: f64,
    pub sum_max_h: f64,
    pub sum_creatures: f64,
    pub max_h_worst: u32,

    // delta aggregate (difference between consecutive turns)
    pub sum_d_empty: f64,

    // internal
    prev_features: Option<GridFeatures>,
    t0: Instant,
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            sessions_finished: 0,
            session_len: 0,
            session_len_sum: 0,
            session_len_max: 0,
            steps_done: 0,
            clearing_steps: 0,
            sum_empty: 0.0,
            sum_max_h: 0.0,
            sum_creatures: 0.0,
            max_h_worst: 0,
            sum_d_empty: 0.0,
            prev_features: None,
            t0: Instant::now(),
        }
    }

    /// Call once per turn with the post-turn board.
    pub fn on_step(&mut self, grid: &Grid, cleared_rows: u32) {
        self.steps_done += 1;
        self.session_len += 1;
        if cleared_rows > 0 {
            self.clearing_steps += 1;
        }

        let cur = compute_grid_features(grid);
        self.sum_empty += f64::from(cur.empty);
        self.sum_max_h += f64::from(cur.max_h);
        self.sum_creatures += f64::from(cur.creature_cells);
        self.max_h_worst = self.max_h_worst.max(cur.max_h);

        // deltas vs previous turn (within session)
        if let Some(p) = self.prev_features {
            self.sum_d_empty += f64::from(cur.empty) - f64::from(p.empty);
        }
        self.prev_features = Some(cur);
    }

    /// Call when a session terminates (game over), before resetting the game.
    pub fn on_session_end(&mut self) {
        self.sessions_finished += 1;
        self.session_len_sum += self.session_len;
        self.session_len_max = self.session_len_max.max(self.session_len);

        self.session_len = 0;
        self.prev_features = None; // don't carry deltas across sessions
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.t0.elapsed().as_secs_f64()
    }

    fn per_step(&self, total: f64) -> f64 {
        if self.steps_done > 0 {
            total / self.steps_done as f64
        } else {
            0.0
        }
    }

    pub fn steps_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.steps_done as f64 / dt
        } else {
            0.0
        }
    }

    pub fn avg_session_len(&self) -> f64 {
        if self.sessions_finished > 0 {
            self.session_len_sum as f64 / self.sessions_finished as f64
        } else {
            0.0
        }
    }

    pub fn avg_empty(&self) -> f64 {
        self.per_step(self.sum_empty)
    }

    pub fn avg_max_h(&self) -> f64 {
        self.per_step(self.sum_max_h)
    }

    pub fn avg_creatures(&self) -> f64 {
        self.per_step(self.sum_creatures)
    }

    pub fn avg_d_empty(&self) -> f64 {
        self.per_step(self.sum_d_empty)
    }

    pub fn clear_rate(&self) -> f64 {
        self.per_step(self.clearing_steps as f64)
    }

    pub fn rows_per_step(&self, live_total_rows: u64) -> f64 {
        self.per_step(live_total_rows as f64)
    }

    pub fn score_per_step(&self, live_total_score: u64) -> f64 {
        self.per_step(live_total_score as f64)
    }

    pub fn live_msg(&self, rule: ClearRule, rps: f64, spscore: f64) -> String {
        format!(
            "rule={:?} tps={:.1} sessions={} avg_len={:.1} max_len={} rows/turn={:.3} score/turn={:.2} maxH={} avgEmpty={:.1} clearRate={:.2}",
            rule,
            self.steps_per_sec(),
            self.sessions_finished,
            self.avg_session_len(),
            self.session_len_max,
            rps,
            spscore,
            self.max_h_worst,
            self.avg_empty(),
            self.clear_rate(),
        )
    }

    pub fn final_report(
        &self,
        policy_name: &str,
        clear_rule: ClearRule,
        total_rows: u64,
        total_score: u64,
        last_session_len: u64,
        last_game_over: bool,
    ) -> FinalReport {
        FinalReport {
            policy: policy_name.to_string(),
            clear_rule,

            steps_done: self.steps_done,
            elapsed_s: self.elapsed_secs(),
            steps_per_s: self.steps_per_sec(),
            sessions_finished: self.sessions_finished,
            avg_session_len: self.avg_session_len(),
            max_session_len: self.session_len_max,
            rows_per_step: self.rows_per_step(total_rows),
            score_per_step: self.score_per_step(total_score),
            avg_empty: self.avg_empty(),
            avg_max_h: self.avg_max_h(),
            total_score,
            total_rows,
            last_session_len,
            last_game_over,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FinalReport {
    pub policy: String,
    pub clear_rule: ClearRule,

    pub steps_done: u64,
    pub elapsed_s: f64,
    pub steps_per_s: f64,

    pub sessions_finished: u64,
    pub avg_session_len: f64,
    pub max_session_len: u64,

    pub rows_per_step: f64,
    pub score_per_step: f64,

    pub avg_empty: f64,
    pub avg_max_h: f64,

    pub total_score: u64,
    pub total_rows: u64,

    pub last_session_len: u64,
    pub last_game_over: bool,
}
