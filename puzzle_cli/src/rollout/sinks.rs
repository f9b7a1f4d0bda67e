// puzzle_cli/src/rollout/sinks.rs
#![forbid(unsafe_code)]

/// One periodic row emitted by the runner.
///
/// Transport struct: runner/stats compute fields, sinks only format/emit.
#[derive(Clone, Debug)]
pub struct ReportRow {
    pub step: u64,
    pub steps_total: u64,

    pub sps: f64,

    pub sessions_finished: u64,
    pub avg_session_len: f64,
    pub max_session_len: u64,

    pub rows_per_step: f64,
    pub score_per_step: f64,

    /// Worst (max) column height observed so far (over all turns).
    pub max_h_worst: u32,

    /// Averages over all turns so far.
    pub avg_max_h: f64,
    pub avg_empty: f64,
    pub avg_creatures: f64,

    /// Average empty-cell delta per turn (within sessions; resets on session reset).
    pub avg_d_empty: f64,
}

/// Sink interface for periodic reporting.
pub trait RolloutSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&indicatif::ProgressBar>);
}

/// Default sink: does nothing.
#[derive(Default)]
pub struct NoopSink;

impl RolloutSink for NoopSink {
    fn on_report_row(&mut self, _row: &ReportRow, _pb: Option<&indicatif::ProgressBar>) {}
}

/// Table columns: header and right-aligned width. `cells()` yields values in this order.
const COLUMNS: [(&str, usize); 12] = [
    ("turn", 10),
    ("of", 10),
    ("tps", 9),
    ("sess", 6),
    ("avg_len", 9),
    ("max_len", 8),
    ("rows/t", 9),
    ("score/t", 10),
    ("maxH", 5),
    ("avgMaxH", 8),
    ("avgEmpty", 9),
    ("avgCrt", 8),
];

impl ReportRow {
    fn cells(&self) -> [String; 12] {
        [
            self.step.to_string(),
            self.steps_total.to_string(),
            format!("{:.1}", self.sps),
            self.sessions_finished.to_string(),
            format!("{:.1}", self.avg_session_len),
            self.max_session_len.to_string(),
            format!("{:.3}", self.rows_per_step),
            format!("{:.2}", self.score_per_step),
            self.max_h_worst.to_string(),
            format!("{:.2}", self.avg_max_h),
            format!("{:.2}", self.avg_empty),
            format!("{:.2}", self.avg_creatures),
        ]
    }
}

fn join_columns<'a>(values: impl Iterator<Item = &'a str>) -> String {
    COLUMNS
        .iter()
        .zip(values)
        .map(|(&(_, w), v)| format!("{v:>w$}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable periodic table sink.
///
/// Cadence (every N turns) is handled by Runner. The header is repeated every
/// `header_every` rows so long rollouts stay readable.
pub struct TableSink {
    header_every: u64,
    rows_printed: u64,
}

impl TableSink {
    pub fn new(header_every: u64) -> Self {
        Self {
            header_every: header_every.max(1),
            rows_printed: 0,
        }
    }

    fn header_line() -> String {
        join_columns(COLUMNS.iter().map(|&(h, _)| h))
    }

    fn row_line(r: &ReportRow) -> String {
        let cells = r.cells();
        let mut line = join_columns(cells.iter().map(String::as_str));
        // Empty-cell drift per turn; sign matters more than width.
        line.push_str(&format!("  dEmpty={:+.2e}", r.avg_d_empty));
        line
    }
}

impl RolloutSink for TableSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&indicatif::ProgressBar>) {
        let mut lines: Vec<String> = Vec::new();

        if self.rows_printed % self.header_every == 0 {
            let header = Self::header_line();
            lines.push("-".repeat(header.len()));
            lines.push(header);
        }

        lines.push(Self::row_line(row));
        self.rows_printed += 1;

        match pb {
            Some(pb) => lines.into_iter().for_each(|l| pb.println(l)),
            None => lines.into_iter().for_each(|l| println!("{l}")),
        }
    }
}
