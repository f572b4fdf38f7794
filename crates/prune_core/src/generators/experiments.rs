use super::AnalysisContext;
use crate::types::{Candidate, Reason};

pub const EXPERIMENT_ARTIFACT_CONFIDENCE: f64 = 0.7;

/// Every file with a path segment naming a throwaway directory.
pub fn find_experiment_artifacts(ctx: &AnalysisContext<'_>) -> Vec<Candidate> {
    ctx.files
        .iter()
        .filter(|file| ctx.tables.in_experiment_dir(file))
        .map(|file| {
            Candidate::file(
                &file.rel_path,
                Reason::ExperimentArtifact,
                EXPERIMENT_ARTIFACT_CONFIDENCE,
            )
        })
        .collect()
}
