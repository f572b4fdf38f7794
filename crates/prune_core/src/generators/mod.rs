//! Candidate heuristics.
//!
//! Each generator is an independent function of the file catalog, the reference set
//! and the Python index. None of them touch the filesystem beyond reading, and none
//! depend on another generator's output.

mod dead_code;
mod duplicates;
mod experiments;
mod orphan_configs;
mod unreferenced;
mod unused_scripts;

pub use dead_code::find_dead_code;
pub use duplicates::{find_duplicate_files, hash_file};
pub use experiments::find_experiment_artifacts;
pub use orphan_configs::find_orphan_configs;
pub use unreferenced::find_unreferenced_files;
pub use unused_scripts::find_unused_scripts;

use log::debug;

use crate::config::ScanTables;
use crate::graph::PythonIndex;
use crate::references::ReferenceSet;
use crate::types::{Candidate, FileRecord};

/// Everything a generator may look at.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub files: &'a [FileRecord],
    pub references: &'a ReferenceSet,
    pub python: &'a PythonIndex,
    pub tables: &'a ScanTables,
}

/// Run every generator; the dead-code generator only when `dead_code` is set.
pub fn run_generators(ctx: &AnalysisContext<'_>, dead_code: bool) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    candidates.extend(find_duplicate_files(ctx));
    candidates.extend(find_unreferenced_files(ctx));
    candidates.extend(find_orphan_configs(ctx));
    candidates.extend(find_unused_scripts(ctx));
    candidates.extend(find_experiment_artifacts(ctx));
    if dead_code {
        candidates.extend(find_dead_code(ctx));
    }
    debug!("Generators produced {} candidates", candidates.len());
    candidates
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::{
        collector::collect_files, graph::build_python_index, references::build_reference_index,
    };
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    pub(crate) fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Owned pipeline inputs for a directory, so tests can borrow an [`AnalysisContext`].
    pub(crate) struct Fixture {
        pub files: Vec<FileRecord>,
        pub references: ReferenceSet,
        pub python: PythonIndex,
        pub tables: ScanTables,
    }

    impl Fixture {
        pub(crate) fn scan(root: &Path) -> Self {
            let tables = ScanTables::default();
            let files = collect_files(root, &[], &[], &tables).unwrap();
            let references = build_reference_index(&files, &tables);
            let python = build_python_index(&files).unwrap();
            Self { files, references, python, tables }
        }

        pub(crate) fn ctx(&self) -> AnalysisContext<'_> {
            AnalysisContext {
                files: &self.files,
                references: &self.references,
                python: &self.python,
                tables: &self.tables,
            }
        }
    }
}
