//! Plain-text report rendering for the tabstat analyses.
//!
//! Reports are built from titled sections of lines and ASCII tables, then
//! written identically to the console and an optional file.

mod format;
mod report;
mod table;

pub use format::{
    PLACEHOLDER, format_decimals, format_duration_secs, format_money, format_number,
    format_percent,
};
pub use report::{Report, Section};
pub use table::{TextTable, frame_preview};
