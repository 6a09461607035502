//! Library side of the `tabstat` command-line tool.

pub mod analysis;
pub mod logging;
