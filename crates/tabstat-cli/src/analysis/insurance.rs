//! Insurance cost breakdown by age, sex, smoking and number of children.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use tabstat_ingest::{LoadReport, LoadSpec, NumericColumn, load_dataset};
use tabstat_model::{GroupChange, GroupComparison, GroupStats, GroupSummary, LinearTrend};
use tabstat_report::{
    PLACEHOLDER, Report, Section, TextTable, format_decimals, format_money, format_number,
    format_percent,
};
use tabstat_transform::{
    column_stats, compare_subgroups, count_equals, filter_equals, filter_numeric,
    group_aggregate, linear_trend, ratio, successive_changes,
};

/// Written next to the input unless an explicit output path is given.
pub const RESULTS_FILE: &str = "children_costs_results.txt";

const AGE: &str = "age";
const SEX: &str = "sex";
const CHILDREN: &str = "children";
const SMOKER: &str = "smoker";
const CHARGES: &str = "charges";

#[derive(Debug, Clone)]
pub struct InsuranceOptions {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
}

impl InsuranceOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            output: None,
        }
    }

    /// The explicit output path, else [`RESULTS_FILE`] in the input's directory.
    pub fn results_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self
                .path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(RESULTS_FILE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsuranceOutcome {
    pub report: Report,
    pub load: LoadReport,
    pub results_path: PathBuf,
    pub by_sex: GroupComparison,
    pub by_smoker: GroupComparison,
    pub by_children: GroupSummary,
    pub changes: Vec<GroupChange>,
    pub trend: Option<LinearTrend>,
}

pub fn insurance_spec() -> LoadSpec {
    LoadSpec::new()
        .require([AGE, SEX, SMOKER])
        .keys([CHILDREN, CHARGES])
        .numeric(NumericColumn::integer(AGE))
        .numeric(NumericColumn::integer(CHILDREN))
        .numeric(NumericColumn::float(CHARGES))
}

pub fn run_insurance(options: &InsuranceOptions) -> Result<InsuranceOutcome> {
    let span = info_span!("insurance", path = %options.path.display());
    let _guard = span.enter();

    let loaded = load_dataset(&options.path, &insurance_spec())
        .with_context(|| format!("load {}", options.path.display()))?;
    let df = &loaded.frame;
    let mut report = Report::new();

    age_section(report.section("Age Analysis"), df)?;
    overall_section(
        report.section("Overall Insurance Costs Totals and Averages"),
        df,
    )?;

    let by_sex = compare_subgroups(df, SEX, CHARGES, "male", "female")?;
    comparison_lines(
        report.section("Insurance Cost Analysis by Sex"),
        &by_sex,
        "males",
        "females",
    );

    let by_smoker = compare_subgroups(df, SMOKER, CHARGES, "yes", "no")?;
    smoker_section(
        report.section("Insurance Cost Analysis by Smokers and Non-Smokers"),
        df,
        &by_smoker,
    )?;

    let by_children = group_aggregate(df, CHILDREN, CHARGES)?;
    let changes = successive_changes(&by_children);
    let trend = linear_trend(df, CHILDREN, CHARGES)?;
    children_section(
        report.section("Insurance Cost Analysis by Number of Children"),
        &by_children,
        &changes,
        trend.as_ref(),
    );

    info!(
        rows = df.height(),
        groups = by_children.len(),
        "insurance analysed"
    );

    Ok(InsuranceOutcome {
        report,
        load: loaded.report,
        results_path: options.results_path(),
        by_sex,
        by_smoker,
        by_children,
        changes,
        trend,
    })
}

fn age_section(section: &mut Section, df: &DataFrame) -> Result<()> {
    let ages = column_stats(df, AGE)?;
    section
        .field("Total number of patients", df.height().to_string())
        .field(
            "Patient ages range from",
            format!(
                "{} - {}",
                format_decimals(ages.min, 0),
                format_decimals(ages.max, 0)
            ),
        );

    for (sex, plural) in [("male", "males"), ("female", "females")] {
        let group = filter_equals(df, SEX, sex)?;
        let smokers = count_equals(&group, SMOKER, "yes")?;
        let with_children = filter_numeric(&group, CHILDREN, |c| c > 0.0)?.height();
        section
            .line("")
            .line(format!("There are {} {sex} patients.", group.height()))
            .line(format!(
                "{smokers} of those {plural} are smokers and {with_children} of them have at least 1 child."
            ));
    }

    let smokers = filter_equals(df, SMOKER, "yes")?;
    let non_smokers = filter_equals(df, SMOKER, "no")?;
    let with_children = filter_numeric(df, CHILDREN, |c| c > 0.0)?;
    let without_children = filter_numeric(df, CHILDREN, |c| c == 0.0)?;
    section
        .line("")
        .field("Average age of patients overall", truncated_age(ages.mean))
        .line("")
        .field(
            "Average age of patients that smoke",
            truncated_age(column_stats(&smokers, AGE)?.mean),
        )
        .field(
            "Average age of patients that don't smoke",
            truncated_age(column_stats(&non_smokers, AGE)?.mean),
        )
        .line("")
        .field(
            "Average age of patients with at least 1 child",
            truncated_age(column_stats(&with_children, AGE)?.mean),
        )
        .field(
            "Average age of patients with 0 children",
            truncated_age(column_stats(&without_children, AGE)?.mean),
        )
        .line("")
        .line("**Some of these groups differ a lot in size, so the age comparisons are only indicative.");
    Ok(())
}

fn overall_section(section: &mut Section, df: &DataFrame) -> Result<()> {
    let charges = column_stats(df, CHARGES)?;
    section
        .field("Total amount spent on insurance", format_money(Some(charges.sum)))
        .field("Average insurance cost", format_money(charges.mean));
    Ok(())
}

fn smoker_section(section: &mut Section, df: &DataFrame, overall: &GroupComparison) -> Result<()> {
    comparison_lines(section, overall, "smokers", "non-smokers");

    for (sex, label) in [("male", "Male"), ("female", "Female")] {
        let within = filter_equals(df, SEX, sex)?;
        let comparison = compare_subgroups(&within, SMOKER, CHARGES, "yes", "no")?;
        section
            .line("")
            .field(
                &format!("{label} smoker vs {sex} non-smoker total cost difference"),
                format_money(comparison.total_diff()),
            )
            .field(
                &format!("{label} smoker vs {sex} non-smoker average cost difference"),
                format_money(comparison.mean_diff()),
            );
    }

    for (status, label) in [("yes", "smoker"), ("no", "non-smoker")] {
        let within = filter_equals(df, SMOKER, status)?;
        let comparison = compare_subgroups(&within, SEX, CHARGES, "male", "female")?;
        section
            .line("")
            .field(
                &format!("Male vs female {label} total cost difference"),
                format_money(comparison.total_diff()),
            )
            .field(
                &format!("Male vs female {label} average cost difference"),
                format_money(comparison.mean_diff()),
            );
    }
    Ok(())
}

/// Totals, averages and their `left - right` differences for two subgroups,
/// followed by how the subgroup sizes compare.
fn comparison_lines(section: &mut Section, comparison: &GroupComparison, left: &str, right: &str) {
    let total = |stats: Option<&GroupStats>| format_money(stats.map(|s| s.sum));
    let mean = |stats: Option<&GroupStats>| format_money(stats.and_then(|s| s.mean));
    let left_stats = comparison.left_stats.as_ref();
    let right_stats = comparison.right_stats.as_ref();
    let size_ratio = left_stats
        .zip(right_stats)
        .and_then(|(l, r)| ratio(l.rows as f64, r.rows as f64));
    let count_diff = comparison
        .count_diff()
        .map_or_else(|| PLACEHOLDER.to_string(), |diff| diff.to_string());
    section
        .field(&format!("Total insurance costs for {left}"), total(left_stats))
        .field(&format!("Total insurance costs for {right}"), total(right_stats))
        .field(
            &format!("Difference of total costs between {left} and {right}"),
            format_money(comparison.total_diff()),
        )
        .line("")
        .field(&format!("Average insurance cost for {left}"), mean(left_stats))
        .field(&format!("Average insurance cost for {right}"), mean(right_stats))
        .field(
            &format!("Difference of average costs between {left} and {right}"),
            format_money(comparison.mean_diff()),
        )
        .line("")
        .field(
            &format!("Difference in number of {left} and {right}"),
            count_diff,
        )
        .field(&format!("Ratio of {left} to {right}"), format_number(size_ratio));
}

fn children_section(
    section: &mut Section,
    summary: &GroupSummary,
    changes: &[GroupChange],
    trend: Option<&LinearTrend>,
) {
    let mut table = TextTable::new([
        "Children",
        "Records",
        "Total cost",
        "Average cost",
        "Diff from previous",
        "% change",
    ])
    .align_right(&[1, 2, 3, 4, 5]);
    for (group, change) in summary.groups.iter().zip(changes) {
        table.add_row([
            group.key.clone(),
            group.count.to_string(),
            format_money(Some(group.sum)),
            format_money(group.mean),
            format_money(change.diff_prev),
            format_percent(change.pct_change),
        ]);
    }
    section
        .table(table)
        .field("Weighted average cost", format_money(summary.weighted_mean()));
    match trend {
        Some(trend) => {
            section
                .field(
                    "Cost change per additional child",
                    format_money(Some(trend.slope)),
                )
                .field(
                    "Trend baseline with 0 children",
                    format_money(Some(trend.intercept)),
                );
        }
        None => {
            section.field("Cost change per additional child", PLACEHOLDER);
        }
    }
}

/// Whole years, truncated toward zero.
fn truncated_age(mean: Option<f64>) -> String {
    match mean {
        Some(mean) if mean.is_finite() => (mean.trunc() as i64).to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
