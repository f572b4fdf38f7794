use log::trace;

use super::AnalysisContext;
use crate::types::{Candidate, Reason};

pub const DEAD_CODE_CONFIDENCE: f64 = 0.5;
pub const PRIVATE_DEAD_CODE_CONFIDENCE: f64 = 0.4;

/// Top-level definitions never read in their own file and not listed in `__all__`.
///
/// Only same-file usage is checked, so these are always review items and never
/// file deletions.
pub fn find_dead_code(ctx: &AnalysisContext<'_>) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for info in ctx.python.modules.values() {
        for (symbol, line) in &info.definitions {
            if info.reads.contains(symbol) || info.exports.contains(symbol) {
                continue;
            }
            trace!("{}:{} defines unused '{}'", info.rel_path, line, symbol);
            let confidence = if symbol.starts_with('_') {
                PRIVATE_DEAD_CODE_CONFIDENCE
            } else {
                DEAD_CODE_CONFIDENCE
            };
            candidates.push(
                Candidate::code(&info.rel_path, Reason::DeadCode, confidence)
                    .with_detail("symbol", symbol.as_str())
                    .with_detail("line", *line)
                    .with_detail("module", info.module.as_str()),
            );
        }
    }
    candidates
}
