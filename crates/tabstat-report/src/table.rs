//! Plain ASCII tables.
//!
//! Tables carry no colors and never adapt to the terminal width, so the same
//! bytes go to the console and to files.

use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use polars::prelude::DataFrame;

use tabstat_common::column_value_string;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    right_aligned: Vec<usize>,
}

impl TextTable {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            right_aligned: Vec::new(),
        }
    }

    /// Right-aligns the given column indexes (numbers, money).
    pub fn align_right(mut self, columns: &[usize]) -> Self {
        self.right_aligned.extend_from_slice(columns);
        self
    }

    pub fn add_row<I, S>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(ASCII_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Disabled)
            .force_no_tty()
            .set_header(self.header.iter().map(Cell::new));
        for row in &self.rows {
            table.add_row(row.iter().map(Cell::new));
        }
        for &index in &self.right_aligned {
            align_column(&mut table, index, CellAlignment::Right);
        }
        table.to_string()
    }
}

/// The first `limit` rows of `df`, with nulls rendered empty.
pub fn frame_preview(df: &DataFrame, limit: usize) -> TextTable {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut table = TextTable::new(names.clone());
    for idx in 0..df.height().min(limit) {
        table.add_row(names.iter().map(|name| column_value_string(df, name, idx)));
    }
    table
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
