//! Analysis engine for prune.
//!
//! This crate scans a project directory and produces a conservative deletion plan:
//! - Collecting files with include/exclude globs
//! - Indexing which paths and file names are mentioned in text files
//! - Parsing Python sources for imports, definitions and identifier reads
//! - Running the candidate heuristics and scoring each candidate
//! - Filtering, ordering and summarizing candidates into a [`Plan`]
//!
//! Nothing here mutates the scanned tree. Moving files is done by `prune_apply`.
//!
//! # Examples
//!
//! ```no_run
//! use prune_core::{Config, run_analysis};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut cfg = Config::new("/path/to/project");
//! cfg.dead_code = true;
//!
//! let plan = run_analysis(&cfg)?;
//! for candidate in &plan.candidates {
//!     println!("{} {} {:.2}", candidate.reason, candidate.path, candidate.confidence);
//! }
//! # Ok(())
//! # }
//! ```

mod analyzer;
mod collector;
mod config;
mod constants;
mod generators;
mod graph;
mod parser;
mod plan;
mod references;
mod resolver;
mod types;

// Re-export public API
pub use analyzer::run_analysis;
pub use collector::collect_files;
pub use config::{Config, DEFAULT_THRESHOLD, ONE_RUN_THRESHOLD, ScanTables, build_globset};
pub use constants::{CLOSURE_REPORT, PLAN_DIFF, PLAN_JSON, PLAN_MARKDOWN, TRASH_PREFIX, UNDO_SCRIPT};
pub use generators::{AnalysisContext, hash_file, run_generators};
pub use graph::{ImportGraph, PythonIndex, build_python_index};
pub use plan::assemble_plan;
pub use references::{ReferenceSet, build_reference_index};
pub use resolver::module_name;
pub use types::{Action, Candidate, CandidateKind, FileRecord, ModuleInfo, Plan, Reason, Summary};
