//! Keyword search over Jeopardy questions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use tabstat_ingest::{LoadReport, LoadSpec, NumericColumn, load_dataset};
use tabstat_report::{PLACEHOLDER, Report, TextTable, format_money, frame_preview};
use tabstat_transform::{KeywordFilter, column_stats, filter_by_keywords, value_frequencies};

pub const QUESTION: &str = "Question";
pub const ANSWER: &str = "Answer";
pub const VALUE: &str = "Value";
/// Numeric copy of `Value`.
pub const FLOAT_VALUE: &str = "Float Value";

const SAMPLE_ROWS: usize = 5;

#[derive(Debug, Clone)]
pub struct JeopardyOptions {
    pub path: PathBuf,
    pub words: Vec<String>,
    /// How many of the most frequent answers to list.
    pub top: usize,
}

impl JeopardyOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            words: vec!["King".to_string(), "England".to_string()],
            top: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JeopardyOutcome {
    pub report: Report,
    pub load: LoadReport,
    pub matched: usize,
    pub average_value: Option<f64>,
    /// Answer frequencies of the matched questions, most frequent first.
    pub answers: Vec<(String, usize)>,
}

pub fn jeopardy_spec() -> LoadSpec {
    LoadSpec::new()
        .require(["Air Date", "Round", "Category", QUESTION, ANSWER])
        .numeric(NumericColumn::float(VALUE).into_column(FLOAT_VALUE))
}

pub fn run_jeopardy(options: &JeopardyOptions) -> Result<JeopardyOutcome> {
    let span = info_span!(
        "jeopardy",
        path = %options.path.display(),
        words = ?options.words
    );
    let _guard = span.enter();

    let loaded = load_dataset(&options.path, &jeopardy_spec())
        .with_context(|| format!("load {}", options.path.display()))?;
    let filter = KeywordFilter::new(options.words.iter().cloned())?;
    let keywords = if filter.words().is_empty() {
        "(no keywords)".to_string()
    } else {
        filter.words().join(", ")
    };

    let matched = filter_by_keywords(&loaded.frame, QUESTION, &filter)?;
    let average_value = column_stats(&matched, FLOAT_VALUE)?.mean;
    let answers = value_frequencies(&matched, ANSWER)?;

    let mut report = Report::new();
    report
        .section("Dataset")
        .field("Questions loaded", loaded.report.rows_kept.to_string())
        .field(
            "Rows excluded for unreadable values",
            loaded.report.dropped_uncoercible.to_string(),
        );

    report
        .section(format!("Questions containing {keywords}"))
        .field("Matching questions", matched.height().to_string())
        .table(frame_preview(
            &matched.select([QUESTION, VALUE, ANSWER])?,
            SAMPLE_ROWS,
        ));

    report.section("Average value").field(
        &format!("Average value of questions containing {keywords}"),
        format_money(average_value),
    );

    let mut top = TextTable::new([ANSWER, "Occurrences"]).align_right(&[1]);
    for (answer, count) in answers.iter().take(options.top) {
        top.add_row([answer.clone(), count.to_string()]);
    }
    let most_common = match answers.first() {
        Some((answer, count)) => format!("'{answer}' with {count} occurrences"),
        None => PLACEHOLDER.to_string(),
    };
    report
        .section(format!("Top {} answers", options.top))
        .table(top)
        .field("Most common answer", most_common);

    info!(
        matched = matched.height(),
        distinct_answers = answers.len(),
        "jeopardy analysed"
    );

    Ok(JeopardyOutcome {
        report,
        load: loaded.report,
        matched: matched.height(),
        average_value,
        answers,
    })
}
