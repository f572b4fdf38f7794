use log::trace;
use std::path::Path;

use super::AnalysisContext;
use crate::types::{Candidate, Reason};

pub const UNUSED_SCRIPT_CONFIDENCE: f64 = 0.5;
pub const UNUSED_EXECUTABLE_SCRIPT_CONFIDENCE: f64 = 0.4;

/// Shell scripts that are never mentioned. An executable bit lowers confidence, since
/// the script may be run by hand or by something outside the repository.
pub fn find_unused_scripts(ctx: &AnalysisContext<'_>) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for file in ctx.files.iter().filter(|f| ctx.tables.is_script(f)) {
        if ctx.references.mentions(file) {
            continue;
        }
        let executable = is_executable(&file.path);
        trace!("Script {} is never mentioned (executable: {})", file.rel_path, executable);
        let confidence = if executable {
            UNUSED_EXECUTABLE_SCRIPT_CONFIDENCE
        } else {
            UNUSED_SCRIPT_CONFIDENCE
        };
        candidates.push(
            Candidate::file(&file.rel_path, Reason::UnusedScript, confidence)
                .with_detail("executable", executable),
        );
    }
    candidates
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().map(|m| m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{Fixture, create_test_file};
    use tempfile::TempDir;

    #[test]
    fn test_unmentioned_script_is_flagged() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "tools/cleanup.sh", "echo cleanup");
        create_test_file(root, "tools/build.sh", "echo build");
        create_test_file(root, "docs/howto.md", "Run tools/build.sh first.");

        let fixture = Fixture::scan(root);
        let scripts = find_unused_scripts(&fixture.ctx());
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].path, "tools/cleanup.sh");
        assert_eq!(scripts[0].reason, Reason::UnusedScript);
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_bit_lowers_confidence() {
        use std::{fs, os::unix::fs::PermissionsExt};

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let exec = create_test_file(root, "run.sh", "#!/bin/sh\necho run");
        fs::set_permissions(&exec, fs::Permissions::from_mode(0o755)).unwrap();
        let plain = create_test_file(root, "plain.sh", "echo plain");
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();

        let fixture = Fixture::scan(root);
        let scripts = find_unused_scripts(&fixture.ctx());
        let run = scripts.iter().find(|c| c.path == "run.sh").unwrap();
        let other = scripts.iter().find(|c| c.path == "plain.sh").unwrap();
        assert_eq!(run.confidence, 0.4);
        assert_eq!(run.details["executable"], true);
        assert_eq!(other.confidence, 0.5);
        assert_eq!(other.details["executable"], false);
    }
}
