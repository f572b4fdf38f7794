use anyhow::{Context, Result};
use log::{debug, info};
use prune_core::{PLAN_DIFF, PLAN_JSON, PLAN_MARKDOWN, Plan};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use crate::{diff::print_plan_diff, markdown::print_plan_markdown};

/// Where [`write_plan`] put each artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanFiles {
    pub json: PathBuf,
    pub markdown: PathBuf,
    pub diff: PathBuf,
}

/// Write `deletion_plan.json`, `deletion_plan.md` and `deletion_plan.diff` into `root`.
pub fn write_plan(root: &Path, plan: &Plan) -> Result<PlanFiles> {
    let files = PlanFiles {
        json: root.join(PLAN_JSON),
        markdown: root.join(PLAN_MARKDOWN),
        diff: root.join(PLAN_DIFF),
    };

    let json = serde_json::to_string_pretty(plan).context("Failed to serialize plan")?;
    fs::write(&files.json, json + "\n")
        .with_context(|| format!("Failed to write {}", files.json.display()))?;

    let mut md = create(&files.markdown)?;
    print_plan_markdown(&mut md, plan)
        .with_context(|| format!("Failed to write {}", files.markdown.display()))?;

    let mut diff = create(&files.diff)?;
    print_plan_diff(&mut diff, root, plan)
        .with_context(|| format!("Failed to write {}", files.diff.display()))?;

    info!("Wrote plan with {} candidates to {}", plan.candidates.len(), root.display());
    Ok(files)
}

/// Load a plan previously written by [`write_plan`].
pub fn read_plan(path: &Path) -> Result<Plan> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan {}", path.display()))?;
    let plan: Plan = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse plan {}", path.display()))?;
    debug!("Loaded plan with {} candidates from {}", plan.candidates.len(), path.display());
    Ok(plan)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
