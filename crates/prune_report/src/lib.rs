//! Plan persistence and human-readable rendering.
//!
//! A plan is written as three sibling files in the project root: machine-readable
//! JSON (the input for a later `--apply --plan`), a Markdown summary for review, and a
//! unified diff showing the content each file deletion would remove. The colored terminal
//! tree is printed by the binary after analysis.

mod diff;
mod markdown;
mod persist;
mod terminal;

// Re-export public API
pub use diff::print_plan_diff;
pub use markdown::print_plan_markdown;
pub use persist::{PlanFiles, read_plan, write_plan};
pub use terminal::print_plan_tree;
