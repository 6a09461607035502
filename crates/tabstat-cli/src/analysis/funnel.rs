//! Drop-off between the ordered stages of a web funnel.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use tabstat_ingest::{LoadSpec, load_dataset};
use tabstat_model::NullSummary;
use tabstat_report::{
    Report, TextTable, format_duration_secs, format_percent, frame_preview,
};
use tabstat_transform::{
    add_elapsed_seconds, chain_left_joins, column_stats, left_join, null_summary, numeric_values,
    text_values,
};

/// Join key shared by every stage file.
pub const USER_ID: &str = "user_id";

const SAMPLE_ROWS: usize = 5;
const TIME_TO_PURCHASE: &str = "time_to_purchase";

/// One funnel stage: `<file_stem>.csv` with a `user_id` and a time column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelStage {
    pub file_stem: String,
    pub time_column: String,
}

impl FunnelStage {
    pub fn new(file_stem: impl Into<String>, time_column: impl Into<String>) -> Self {
        Self {
            file_stem: file_stem.into(),
            time_column: time_column.into(),
        }
    }

    /// Parses `STEM` or `STEM:TIME_COLUMN`; the time column defaults to `STEM_time`.
    pub fn parse(spec: &str) -> std::result::Result<Self, String> {
        let (stem, time_column) = match spec.split_once(':') {
            Some((stem, column)) => (stem.trim(), column.trim().to_string()),
            None => (spec.trim(), format!("{}_time", spec.trim())),
        };
        if stem.is_empty() {
            return Err(format!("stage '{spec}' has no file name"));
        }
        if time_column.is_empty() {
            return Err(format!("stage '{spec}' has an empty time column"));
        }
        Ok(Self::new(stem, time_column))
    }

    /// `visits`, `cart`, `checkout`, `purchase`.
    pub fn default_stages() -> Vec<Self> {
        vec![
            Self::new("visits", "visit_time"),
            Self::new("cart", "cart_time"),
            Self::new("checkout", "checkout_time"),
            Self::new("purchase", "purchase_time"),
        ]
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.file_stem)
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_stem, self.time_column)
    }
}

#[derive(Debug, Clone)]
pub struct FunnelOptions {
    /// Directory holding one CSV file per stage.
    pub dir: PathBuf,
    pub stages: Vec<FunnelStage>,
}

impl FunnelOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stages: FunnelStage::default_stages(),
        }
    }
}

/// Users who reached `from` but have no `to` time.
#[derive(Debug, Clone, PartialEq)]
pub struct StageDropOff {
    pub from: String,
    pub to: String,
    pub nulls: NullSummary,
}

impl StageDropOff {
    pub fn percentage(&self) -> Option<f64> {
        self.nulls.percentage()
    }
}

#[derive(Debug, Clone)]
pub struct FunnelOutcome {
    pub report: Report,
    /// Drop-off measured on each adjacent pair joined on its own.
    pub pairwise: Vec<StageDropOff>,
    pub combined_rows: usize,
    /// Drop-off of every later stage within the chained join of all stages.
    pub combined: Vec<StageDropOff>,
    pub highest: Option<StageDropOff>,
    /// Mean seconds from the first to the last stage over rows that have both.
    pub average_seconds: Option<f64>,
}

pub fn run_funnel(options: &FunnelOptions) -> Result<FunnelOutcome> {
    let [first, .., last] = options.stages.as_slice() else {
        bail!(
            "a funnel needs at least two stages, got {}",
            options.stages.len()
        );
    };
    let distinct: BTreeSet<&str> = options
        .stages
        .iter()
        .map(|stage| stage.time_column.as_str())
        .collect();
    if distinct.len() != options.stages.len() {
        bail!("every funnel stage needs its own time column");
    }

    let span = info_span!(
        "funnel",
        dir = %options.dir.display(),
        stages = options.stages.len()
    );
    let _guard = span.enter();
    let mut report = Report::new();

    let mut frames = Vec::with_capacity(options.stages.len());
    for stage in &options.stages {
        let path = options.dir.join(stage.file_name());
        let spec = LoadSpec::new()
            .require([stage.time_column.as_str()])
            .keys([USER_ID]);
        let loaded = load_dataset(&path, &spec)
            .with_context(|| format!("load {} stage", stage.file_stem))?;
        report
            .section(format!("Sample data from {}", stage.file_name()))
            .table(frame_preview(&loaded.frame, SAMPLE_ROWS));
        frames.push(loaded.frame);
    }

    let mut pairwise = Vec::with_capacity(frames.len() - 1);
    for (idx, pair) in frames.windows(2).enumerate() {
        let (from, to) = (&options.stages[idx], &options.stages[idx + 1]);
        let joined = left_join(&pair[0], &pair[1])
            .with_context(|| format!("join {} and {}", from.file_stem, to.file_stem))?;
        let drop_off = StageDropOff {
            from: from.file_stem.clone(),
            to: to.file_stem.clone(),
            nulls: null_summary(&joined, &to.time_column)?,
        };
        report
            .section(format!("Merged {} and {}", from.file_stem, to.file_stem))
            .table(frame_preview(&joined, SAMPLE_ROWS))
            .field("Total records", drop_off.nulls.total_rows.to_string())
            .field(&drop_off_label(&drop_off), drop_off.nulls.nulls.to_string())
            .field("Drop-off", format_percent(drop_off.percentage()));
        pairwise.push(drop_off);
    }

    let stage_frames: Vec<&DataFrame> = frames.iter().collect();
    let combined = chain_left_joins(&stage_frames).context("join all stages")?;
    let mut combined_drop_offs = Vec::with_capacity(frames.len() - 1);
    for pair in options.stages.windows(2) {
        combined_drop_offs.push(StageDropOff {
            from: pair[0].file_stem.clone(),
            to: pair[1].file_stem.clone(),
            nulls: null_summary(&combined, &pair[1].time_column)?,
        });
    }
    let highest = highest_drop_off(&combined_drop_offs);

    let section = report.section("All stages combined");
    section
        .table(frame_preview(&combined, SAMPLE_ROWS))
        .field("Total records", combined.height().to_string());
    for drop_off in &combined_drop_offs {
        section.field(
            &drop_off_label(drop_off),
            format!(
                "{} ({})",
                drop_off.nulls.nulls,
                format_percent(drop_off.percentage())
            ),
        );
    }
    section.field(
        "Highest drop-off",
        match &highest {
            Some(drop_off) => format!(
                "{} between {} and {}",
                format_percent(drop_off.percentage()),
                drop_off.from,
                drop_off.to
            ),
            None => format_percent(None),
        },
    );

    let timed = add_elapsed_seconds(
        &combined,
        &first.time_column,
        &last.time_column,
        TIME_TO_PURCHASE,
    )?;
    let users = text_values(&timed, USER_ID)?;
    let elapsed = numeric_values(&timed, TIME_TO_PURCHASE)?;
    let stats = column_stats(&timed, TIME_TO_PURCHASE)?;
    let mut sample = TextTable::new([USER_ID, "time to purchase"]).align_right(&[1]);
    for (user, seconds) in users.iter().zip(&elapsed).take(SAMPLE_ROWS) {
        sample.add_row([
            user.clone().unwrap_or_default(),
            format_duration_secs(*seconds),
        ]);
    }
    report
        .section(format!("Time from {} to {}", first.file_stem, last.file_stem))
        .table(sample)
        .field("Users completing the funnel", stats.count.to_string())
        .field("Average time to complete", format_duration_secs(stats.mean));

    info!(
        rows = combined.height(),
        completed = stats.count,
        highest = ?highest.as_ref().and_then(StageDropOff::percentage),
        "funnel analysed"
    );

    Ok(FunnelOutcome {
        report,
        pairwise,
        combined_rows: combined.height(),
        combined: combined_drop_offs,
        highest,
        average_seconds: stats.mean,
    })
}

fn drop_off_label(drop_off: &StageDropOff) -> String {
    format!("Reached {} but not {}", drop_off.from, drop_off.to)
}

/// The largest defined drop-off; the earliest stage wins a tie.
fn highest_drop_off(drop_offs: &[StageDropOff]) -> Option<StageDropOff> {
    let mut best: Option<(&StageDropOff, f64)> = None;
    for drop_off in drop_offs {
        let Some(pct) = drop_off.percentage() else {
            continue;
        };
        if best.is_none_or(|(_, top)| pct > top) {
            best = Some((drop_off, pct));
        }
    }
    best.map(|(drop_off, _)| drop_off.clone())
}
