use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use log::{debug, trace};
use std::{collections::BTreeMap, path::Path};

use crate::config::{ScanTables, build_globset};
use crate::types::{Candidate, Plan, Summary};

/// Threshold, protect, sort and summarize generator output into one plan.
///
/// Candidates below `threshold` are dropped, as is anything whose bare file name matches
/// a protected glob. Ordering is total, so the same input always yields the same plan.
pub fn assemble_plan(
    root: &Path,
    candidates: Vec<Candidate>,
    total_files: usize,
    threshold: f64,
    tables: &ScanTables,
) -> Result<Plan> {
    let protected = build_globset(&tables.protected_names)?;
    let before = candidates.len();

    let mut kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| c.confidence >= threshold)
        .filter(|c| {
            let name = c.path.rsplit('/').next().unwrap_or(&c.path);
            let is_protected = protected.is_match(name);
            if is_protected {
                trace!("{} is protected", c.path);
            }
            !is_protected
        })
        .collect();
    kept.sort_by(Candidate::plan_order);
    debug!("Kept {} of {} candidates at threshold {}", kept.len(), before, threshold);

    let mut by_reason: BTreeMap<String, usize> = BTreeMap::new();
    for candidate in &kept {
        *by_reason.entry(candidate.reason.to_string()).or_default() += 1;
    }

    Ok(Plan {
        root: root.to_string_lossy().to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        summary: Summary {
            total_files,
            candidates: kept.len(),
            by_reason,
            confidence_threshold: threshold,
        },
        candidates: kept,
    })
}
