//! Whole-word keyword filtering and value frequencies.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use regex::Regex;

use crate::columns::{filter_rows, text_values};
use crate::error::{Result, TransformError};

/// Case-insensitive, whole-word match of every keyword.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    words: Vec<String>,
    patterns: Vec<Regex>,
}

impl KeywordFilter {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|word: &String| !word.trim().is_empty())
            .collect();
        let patterns = words
            .iter()
            .map(|word| {
                Regex::new(&word_pattern(word.trim())).map_err(|err| {
                    TransformError::InvalidKeyword {
                        word: word.clone(),
                        message: err.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { words, patterns })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// True when `text` contains every keyword as a whole word.
    ///
    /// An empty filter matches everything.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().all(|pattern| pattern.is_match(text))
    }
}

/// Case-insensitive pattern for `word`, anchored by `\b` only on edges that
/// are word characters so keywords like `U.S.` can still match.
fn word_pattern(word: &str) -> String {
    let is_word_char = |ch: char| ch.is_alphanumeric() || ch == '_';
    let lead = if word.starts_with(is_word_char) { r"\b" } else { "" };
    let trail = if word.ends_with(is_word_char) { r"\b" } else { "" };
    format!("(?i){lead}{}{trail}", regex::escape(word))
}

/// Rows whose `column` text matches the filter; null text never matches.
pub fn filter_by_keywords(df: &DataFrame, column: &str, filter: &KeywordFilter) -> Result<DataFrame> {
    let keep: Vec<bool> = text_values(df, column)?
        .iter()
        .map(|text| text.as_deref().is_some_and(|text| filter.matches(text)))
        .collect();
    filter_rows(df, &keep)
}

/// Occurrences of each distinct non-null value of `column`.
///
/// Sorted by count descending; ties keep first-seen order.
pub fn value_frequencies(df: &DataFrame, column: &str) -> Result<Vec<(String, usize)>> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for value in text_values(df, column)?.into_iter().flatten() {
        match positions.get(&value) {
            Some(&pos) => order[pos].1 += 1,
            None => {
                positions.insert(value.clone(), order.len());
                order.push((value, 1));
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(order)
}
