use log::trace;

use super::AnalysisContext;
use crate::constants::PYTHON_EXTENSION;
use crate::resolver::{is_package_entry, module_name};
use crate::types::{Candidate, Reason};

pub const UNREFERENCED_PYTHON_CONFIDENCE: f64 = 0.65;
pub const UNREFERENCED_PYTHON_EXPERIMENT_CONFIDENCE: f64 = 0.75;
pub const UNREFERENCED_FILE_CONFIDENCE: f64 = 0.45;
pub const UNREFERENCED_FILE_EXPERIMENT_CONFIDENCE: f64 = 0.6;

/// Python files nobody imports, and other files nobody mentions.
///
/// Python files are judged by the import graph only: entry-point scripts and package
/// entries are never candidates. Everything else is judged by the reference set.
pub fn find_unreferenced_files(ctx: &AnalysisContext<'_>) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for file in ctx.files {
        let in_experiment = ctx.tables.in_experiment_dir(file);

        if file.extension == PYTHON_EXTENSION {
            let info = ctx.python.module_for(&file.rel_path);
            let module =
                info.map(|m| m.module.clone()).unwrap_or_else(|| module_name(&file.rel_path));
            let is_entry_point = info.is_some_and(|m| m.is_entry_point);
            if ctx.python.graph.is_referenced(&module)
                || is_entry_point
                || is_package_entry(&file.rel_path)
            {
                trace!("{} is imported or load-bearing", file.rel_path);
                continue;
            }
            let confidence = if in_experiment {
                UNREFERENCED_PYTHON_EXPERIMENT_CONFIDENCE
            } else {
                UNREFERENCED_PYTHON_CONFIDENCE
            };
            candidates.push(
                Candidate::file(&file.rel_path, Reason::UnreferencedPython, confidence)
                    .with_detail("module", module),
            );
            continue;
        }

        if ctx.references.mentions(file) {
            continue;
        }
        let confidence = if in_experiment {
            UNREFERENCED_FILE_EXPERIMENT_CONFIDENCE
        } else {
            UNREFERENCED_FILE_CONFIDENCE
        };
        candidates.push(
            Candidate::file(&file.rel_path, Reason::UnreferencedFile, confidence)
                .with_detail("extension", file.extension.as_str()),
        );
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{Fixture, create_test_file};
    use tempfile::TempDir;

    fn unreferenced(root: &std::path::Path) -> Vec<Candidate> {
        find_unreferenced_files(&Fixture::scan(root).ctx())
    }

    fn find<'a>(candidates: &'a [Candidate], path: &str) -> Option<&'a Candidate> {
        candidates.iter().find(|c| c.path == path)
    }

    #[test]
    fn test_imported_module_is_not_flagged() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "main.py", "import util\n");
        create_test_file(root, "util.py", "def helper():\n    return 1\n");

        let candidates = unreferenced(root);
        assert!(find(&candidates, "util.py").is_none());
        let main = find(&candidates, "main.py").unwrap();
        assert_eq!(main.reason, Reason::UnreferencedPython);
        assert_eq!(main.confidence, 0.65);
        assert_eq!(main.details["module"], "main");
    }

    #[test]
    fn test_experiment_python_confidence() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "experiments/scratch.py", "value = 1\n");

        let candidates = unreferenced(root);
        let scratch = find(&candidates, "experiments/scratch.py").unwrap();
        assert_eq!(scratch.reason, Reason::UnreferencedPython);
        assert_eq!(scratch.confidence, 0.75);
    }

    #[test]
    fn test_entry_point_and_package_entry_are_exempt() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "cli.py", "if __name__ == '__main__':\n    print('hi')\n");
        create_test_file(root, "pkg/__init__.py", "VERSION = 1\n");

        let candidates = unreferenced(root);
        assert!(find(&candidates, "cli.py").is_none());
        assert!(find(&candidates, "pkg/__init__.py").is_none());
    }

    #[test]
    fn test_src_layout_import_prevents_flag() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/prune/__init__.py", "");
        create_test_file(root, "src/prune/a.py", "def helper():\n    return 1\n");
        create_test_file(root, "src/prune/b.py", "from prune import a\n\nvalue = a.helper()\n");

        let candidates = unreferenced(root);
        assert!(find(&candidates, "src/prune/a.py").is_none());
        assert!(find(&candidates, "src/prune/b.py").is_some());
    }

    #[test]
    fn test_generic_file_mentioned_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "docs/guide.md", "see data/sample.csv");
        create_test_file(root, "data/sample.csv", "1,2");
        create_test_file(root, "lonely.csv", "3,4");

        let candidates = unreferenced(root);
        assert!(find(&candidates, "data/sample.csv").is_none());
        let lonely = find(&candidates, "lonely.csv").unwrap();
        assert_eq!(lonely.reason, Reason::UnreferencedFile);
        assert_eq!(lonely.confidence, 0.45);
        assert_eq!(lonely.details["extension"], "csv");
    }

    #[test]
    fn test_experiment_dir_raises_generic_confidence() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "old/result.csv", "1");
        create_test_file(root, "result2.csv", "2");

        let candidates = unreferenced(root);
        let inside = find(&candidates, "old/result.csv").unwrap().confidence;
        let outside = find(&candidates, "result2.csv").unwrap().confidence;
        assert_eq!(inside, 0.6);
        assert!(inside >= outside);
    }
}
