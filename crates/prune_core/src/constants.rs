//! Fixed tables driving collection and the candidate heuristics.
//!
//! Nothing reads these directly except [`ScanTables::default`](crate::ScanTables), which
//! turns them into owned data handed to each pipeline stage.
//!
//! Extensions are lowercase and carry no leading dot.

/// Extensions whose content is scanned for path and file-name mentions
pub const TEXT_EXTENSIONS: &[&str] =
    &["py", "md", "toml", "yaml", "yml", "json", "ini", "cfg", "txt", "rst", "sh"];

/// Extensions treated as configuration files
pub const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json", "ini", "cfg"];

/// Extensions treated as shell scripts
pub const SCRIPT_EXTENSIONS: &[&str] = &["sh", "bash", "zsh"];

/// The only structured-source language with an import/symbol analyzer
pub const PYTHON_EXTENSION: &str = "py";

/// Directory names that mark throwaway work
pub const EXPERIMENT_DIRS: &[&str] = &["experiments", "scratch", "tmp", "old", "archive", "backup"];

/// Files written by this tool
pub const PLAN_JSON: &str = "deletion_plan.json";
pub const PLAN_MARKDOWN: &str = "deletion_plan.md";
pub const PLAN_DIFF: &str = "deletion_plan.diff";
pub const UNDO_SCRIPT: &str = "undo.sh";
pub const CLOSURE_REPORT: &str = "CLOSURE.md";
pub const TRASH_PREFIX: &str = "._trash_";

/// Globs that are excluded from every scan, on top of user excludes.
/// Directory patterns are matched against the relative directory path with a trailing `/`.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git/**",
    ".hg/**",
    ".svn/**",
    ".venv/**",
    ".tox/**",
    "**/__pycache__/**",
    ".pytest_cache/**",
    ".mypy_cache/**",
    ".ruff_cache/**",
    "._trash_*/**",
    PLAN_JSON,
    PLAN_MARKDOWN,
    PLAN_DIFF,
    UNDO_SCRIPT,
    CLOSURE_REPORT,
];

/// File-name globs that are never proposed for removal
pub const PROTECTED_NAMES: &[&str] = &[
    "README*",
    "LICENSE*",
    "COPYING*",
    "CHANGELOG*",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "requirements*.txt",
    "MANIFEST.in",
    "Makefile",
    "Dockerfile",
    ".gitignore",
    ".gitattributes",
    "tox.ini",
];

/// Files larger than this are not scanned for references
pub const MAX_TEXT_BYTES: u64 = 1_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_and_script_extensions_are_scanned_as_text() {
        for ext in CONFIG_EXTENSIONS {
            assert!(TEXT_EXTENSIONS.contains(ext), "config extension '{}' is not text", ext);
        }
        assert!(TEXT_EXTENSIONS.contains(&"sh"));
        assert!(TEXT_EXTENSIONS.contains(&PYTHON_EXTENSION));
    }

    #[test]
    fn test_default_excludes_cover_tool_output() {
        for name in [PLAN_JSON, PLAN_MARKDOWN, PLAN_DIFF, UNDO_SCRIPT, CLOSURE_REPORT] {
            assert!(DEFAULT_EXCLUDES.contains(&name), "'{}' is not excluded", name);
        }
        assert!(DEFAULT_EXCLUDES.iter().any(|p| p.starts_with(TRASH_PREFIX)));
    }

    #[test]
    fn test_extensions_are_lowercase_without_dot() {
        for ext in TEXT_EXTENSIONS.iter().chain(CONFIG_EXTENSIONS).chain(SCRIPT_EXTENSIONS) {
            assert!(!ext.starts_with('.'));
            assert_eq!(ext.to_lowercase(), *ext);
        }
    }
}
