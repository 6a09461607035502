//! Number formatting for report text.
//!
//! Every formatter takes an `Option` and renders [`PLACEHOLDER`] for `None`
//! or non-finite values, so an undefined metric never aborts a report.

/// Rendered in place of an undefined metric.
pub const PLACEHOLDER: &str = "n/a";

const SECONDS_PER_DAY: i64 = 86_400;

/// `$1234.57`, `-$12.00`.
pub fn format_money(value: Option<f64>) -> String {
    match finite(value) {
        Some(amount) => {
            let rounded = round2(amount);
            if rounded < 0.0 {
                format!("-${}", fixed(-rounded, 2))
            } else {
                format!("${}", fixed(rounded, 2))
            }
        }
        None => PLACEHOLDER.to_string(),
    }
}

/// `33.33%`.
pub fn format_percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(pct) => format!("{}%", fixed(pct, 2)),
        None => PLACEHOLDER.to_string(),
    }
}

/// A plain number with two decimals.
pub fn format_number(value: Option<f64>) -> String {
    format_decimals(value, 2)
}

pub fn format_decimals(value: Option<f64>, decimals: usize) -> String {
    match finite(value) {
        Some(number) => fixed(number, decimals),
        None => PLACEHOLDER.to_string(),
    }
}

/// Elapsed seconds as `D days HH:MM:SS`, rounded to the nearest second.
pub fn format_duration_secs(value: Option<f64>) -> String {
    let Some(seconds) = finite(value) else {
        return PLACEHOLDER.to_string();
    };
    let total = seconds.round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    let days = total / SECONDS_PER_DAY;
    let rest = total % SECONDS_PER_DAY;
    format!(
        "{sign}{days} days {:02}:{:02}:{:02}",
        rest / 3600,
        rest % 3600 / 60,
        rest % 60
    )
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fixed-point text that never renders a negative zero.
fn fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
