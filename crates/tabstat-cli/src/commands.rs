use anyhow::{Context, Result};
use tracing::info;

use tabstat_cli::analysis::{
    FunnelOptions, FunnelStage, InsuranceOptions, JeopardyOptions, run_funnel, run_insurance,
    run_jeopardy,
};

use crate::cli::{FunnelArgs, InsuranceArgs, JeopardyArgs};

pub fn funnel(args: &FunnelArgs) -> Result<()> {
    let options = FunnelOptions {
        dir: args.dir.clone(),
        stages: if args.stages.is_empty() {
            FunnelStage::default_stages()
        } else {
            args.stages.clone()
        },
    };
    let outcome = run_funnel(&options)?;
    outcome.report.emit(None).context("write report")?;
    Ok(())
}

pub fn insurance(args: &InsuranceArgs) -> Result<()> {
    let options = InsuranceOptions {
        path: args.path.clone(),
        output: args.output.clone(),
    };
    let outcome = run_insurance(&options)?;
    outcome
        .report
        .emit(Some(&outcome.results_path))
        .with_context(|| format!("write {}", outcome.results_path.display()))?;
    info!(path = %outcome.results_path.display(), "results saved");
    println!("\nResults saved to {}", outcome.results_path.display());
    Ok(())
}

pub fn jeopardy(args: &JeopardyArgs) -> Result<()> {
    let options = JeopardyOptions {
        path: args.path.clone(),
        words: args.words.clone(),
        top: args.top,
    };
    let outcome = run_jeopardy(&options)?;
    outcome.report.emit(None).context("write report")?;
    Ok(())
}
