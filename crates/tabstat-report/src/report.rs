//! Titled report sections and dual console/file output.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::table::TextTable;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Line(String),
    Table(TextTable),
}

/// One `- Title` block of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    title: String,
    blocks: Vec<Block>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Line(text.into()));
        self
    }

    /// `label: value`
    pub fn field(&mut self, label: &str, value: impl AsRef<str>) -> &mut Self {
        self.line(format!("{label}: {}", value.as_ref()))
    }

    pub fn table(&mut self, table: TextTable) -> &mut Self {
        self.blocks.push(Block::Table(table));
        self
    }

    fn render_into(&self, out: &mut String) {
        out.push_str("- ");
        out.push_str(&self.title);
        out.push('\n');
        for block in &self.blocks {
            match block {
                Block::Line(text) => out.push_str(text),
                Block::Table(table) => out.push_str(&table.render()),
            }
            out.push('\n');
        }
    }
}

/// An ordered list of titled sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section and returns it for filling in.
    pub fn section(&mut self, title: impl Into<String>) -> &mut Section {
        self.sections.push(Section::new(title));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The full report text; sections are separated by a blank line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            section.render_into(&mut out);
        }
        out
    }

    /// Writes the rendered text to `writer` and, when given, to `file`.
    ///
    /// Both targets receive the same bytes. The file's parent directory must
    /// exist.
    pub fn emit_to<W: Write>(&self, writer: &mut W, file: Option<&Path>) -> io::Result<()> {
        let text = self.render();
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        if let Some(path) = file {
            fs::write(path, text.as_bytes())?;
        }
        Ok(())
    }

    /// [`Report::emit_to`] with stdout as the console target.
    pub fn emit(&self, file: Option<&Path>) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.emit_to(&mut handle, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let mut report = Report::new();
        report
            .section("Overall")
            .field("Total records", "4")
            .field("Average charges", "$2500.00");
        let mut table = TextTable::new(["Sex", "Count"]).align_right(&[1]);
        table.add_row(["female", "2"]);
        report.section("By Sex").table(table).line("done");
        report
    }

    #[test]
    fn test_render_sections() {
        insta::assert_snapshot!(sample().render(), @r"
        - Overall
        Total records: 4
        Average charges: $2500.00

        - By Sex
        +--------+-------+
        | Sex    | Count |
        +================+
        | female |     2 |
        +--------+-------+
        done
        ");
    }

    #[test]
    fn test_empty_report_renders_nothing() {
        assert_eq!(Report::new().render(), "");
    }

    #[test]
    fn test_emit_writes_identical_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("children_costs_results.txt");
        let report = sample();
        let mut console = Vec::new();

        report.emit_to(&mut console, Some(&path)).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(console, written);
        assert_eq!(String::from_utf8(written).unwrap(), report.render());
    }
}
