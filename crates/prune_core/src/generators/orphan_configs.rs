use log::trace;

use super::AnalysisContext;
use crate::types::{Candidate, Reason};

pub const ORPHAN_CONFIG_CONFIDENCE: f64 = 0.6;

/// Configuration files whose path and name appear nowhere else.
pub fn find_orphan_configs(ctx: &AnalysisContext<'_>) -> Vec<Candidate> {
    ctx.files
        .iter()
        .filter(|file| ctx.tables.is_config(file))
        .filter(|file| !ctx.references.mentions(file))
        .map(|file| {
            trace!("Config {} is never mentioned", file.rel_path);
            Candidate::file(&file.rel_path, Reason::OrphanConfig, ORPHAN_CONFIG_CONFIDENCE)
                .with_detail("extension", file.extension.as_str())
        })
        .collect()
}
