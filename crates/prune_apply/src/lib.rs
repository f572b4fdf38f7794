//! Reversible apply for prune plans.
//!
//! Planned files are never deleted. Each one is renamed into a `._trash_<timestamp>`
//! directory that mirrors its relative path, and a POSIX `undo.sh` is written that moves
//! everything back. A `CLOSURE.md` at the project root records what happened.

mod closure;
mod transaction;
mod undo;

// Re-export public API
pub use closure::{print_closure, write_closure};
pub use transaction::{ApplyOutcome, MovedFile, SkippedFile, apply_plan};
pub use undo::{UndoScript, shell_quote};
