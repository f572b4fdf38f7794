use anyhow::Result;
use log::{debug, info, warn};

use crate::{
    collector::collect_files,
    config::Config,
    generators::{AnalysisContext, run_generators},
    graph::build_python_index,
    plan::assemble_plan,
    references::build_reference_index,
    types::Plan,
};

/// Scan `cfg.root` and build a deletion plan. Nothing on disk is modified.
///
/// The config is initialized here, so callers may pass it straight from the command line.
pub fn run_analysis(cfg: &Config) -> Result<Plan> {
    info!("Starting analysis");
    let mut cfg = cfg.clone();
    cfg.initialize()?;
    let tables = &cfg.tables;

    debug!("Include globs: {:?}, exclude globs: {:?}", cfg.include, cfg.exclude);
    let files = collect_files(&cfg.root, &cfg.include, &cfg.exclude, tables)?;
    if files.is_empty() {
        warn!("No files found under {}", cfg.root.display());
    }
    info!("Collected {} files", files.len());

    let references = build_reference_index(&files, tables);
    info!("Indexed {} referenced paths and names", references.len());

    let python = build_python_index(&files)?;
    info!("Analyzed {} Python modules", python.modules.len());

    let ctx = AnalysisContext { files: &files, references: &references, python: &python, tables };
    let candidates = run_generators(&ctx, cfg.dead_code);

    let plan =
        assemble_plan(&cfg.root, candidates, files.len(), cfg.confidence_threshold, tables)?;
    info!(
        "Plan has {} candidates at confidence >= {}",
        plan.summary.candidates, plan.summary.confidence_threshold
    );
    Ok(plan)
}
