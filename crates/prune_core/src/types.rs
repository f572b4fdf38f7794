use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
    time::SystemTime,
};

/// One collected file. `rel_path` is posix-style and is the identifier used everywhere else.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub rel_path: String,
    pub size: u64,
    pub modified: SystemTime,
    /// Lowercase, without the leading dot. Empty when the file has no extension.
    pub extension: String,
}

impl FileRecord {
    pub fn file_name(&self) -> &str {
        self.rel_path.rsplit('/').next().unwrap_or(&self.rel_path)
    }

    /// Directory segments and the file name, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.rel_path.split('/')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    File,
    Code,
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CandidateKind::File => "file",
            CandidateKind::Code => "code",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Delete,
    ManualReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    DuplicateFile,
    UnreferencedPython,
    UnreferencedFile,
    OrphanConfig,
    UnusedScript,
    ExperimentArtifact,
    DeadCode,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::DuplicateFile => "duplicate_file",
            Reason::UnreferencedPython => "unreferenced_python",
            Reason::UnreferencedFile => "unreferenced_file",
            Reason::OrphanConfig => "orphan_config",
            Reason::UnusedScript => "unused_script",
            Reason::ExperimentArtifact => "experiment_artifact",
            Reason::DeadCode => "dead_code",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub action: Action,
    pub path: String,
    pub reason: Reason,
    pub confidence: f64,
    #[serde(default)]
    pub details: BTreeMap<String, Value>,
}

impl Candidate {
    /// A whole-file removal proposal.
    pub fn file(path: impl Into<String>, reason: Reason, confidence: f64) -> Self {
        Self::new(CandidateKind::File, Action::Delete, path.into(), reason, confidence)
    }

    /// A symbol-level finding. Never proposes deletion.
    pub fn code(path: impl Into<String>, reason: Reason, confidence: f64) -> Self {
        Self::new(CandidateKind::Code, Action::ManualReview, path.into(), reason, confidence)
    }

    fn new(
        kind: CandidateKind,
        action: Action,
        path: String,
        reason: Reason,
        confidence: f64,
    ) -> Self {
        debug_assert!((0.0..=1.0).contains(&confidence), "confidence out of range: {confidence}");
        Self {
            kind,
            action,
            path,
            reason,
            confidence: confidence.clamp(0.0, 1.0),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn is_file_deletion(&self) -> bool {
        self.kind == CandidateKind::File && self.action == Action::Delete
    }

    /// Total order used for plans: reason, then path, then details.
    pub fn plan_order(&self, other: &Self) -> Ordering {
        self.reason
            .as_str()
            .cmp(other.reason.as_str())
            .then_with(|| self.path.cmp(&other.path))
            .then_with(|| self.detail_line().cmp(&other.detail_line()))
            .then_with(|| self.detail_key().cmp(&other.detail_key()))
    }

    fn detail_line(&self) -> Option<u64> {
        self.details.get("line").and_then(Value::as_u64)
    }

    fn detail_key(&self) -> String {
        self.details.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_files: usize,
    pub candidates: usize,
    pub by_reason: BTreeMap<String, usize>,
    pub confidence_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub root: String,
    pub generated_at: String,
    pub candidates: Vec<Candidate>,
    pub summary: Summary,
}

/// Static facts about one Python source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleInfo {
    pub module: String,
    pub rel_path: String,
    /// Contains an `if __name__ == "__main__":` guard.
    pub is_entry_point: bool,
    pub exports: BTreeSet<String>,
    /// Top-level function and class names mapped to their 1-based line.
    pub definitions: BTreeMap<String, usize>,
    pub reads: BTreeSet<String>,
    pub imports: BTreeSet<String>,
}
