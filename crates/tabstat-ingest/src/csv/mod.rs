//! CSV reading utilities.

mod header;
mod reader;

pub use header::{missing_columns, normalize_header, normalize_headers};
pub use reader::{check_readable, read_csv_frame};
