//! The three analyses, each returning its report and headline numbers.

pub mod funnel;
pub mod insurance;
pub mod jeopardy;

pub use funnel::{FunnelOptions, FunnelOutcome, FunnelStage, StageDropOff, run_funnel};
pub use insurance::{InsuranceOptions, InsuranceOutcome, RESULTS_FILE, run_insurance};
pub use jeopardy::{JeopardyOptions, JeopardyOutcome, run_jeopardy};
