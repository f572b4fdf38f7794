use anyhow::{Context, Result, bail};
use chrono::{Local, SecondsFormat};
use log::{debug, info, trace, warn};
use path_clean::clean;
use prune_core::{CLOSURE_REPORT, Plan, Reason, TRASH_PREFIX, UNDO_SCRIPT};
use std::{
    collections::HashSet,
    fs, io,
    path::{Component, Path, PathBuf},
};

use crate::{closure::write_closure, undo::UndoScript};

/// A file that now lives in the trash directory.
#[derive(Debug, Clone, PartialEq)]
pub struct MovedFile {
    pub rel_path: String,
    pub reason: Reason,
    pub confidence: f64,
    pub trashed: PathBuf,
}

/// A planned file that was left where it was.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub rel_path: String,
    pub why: String,
}

#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub root: PathBuf,
    pub timestamp: String,
    pub trash_dir: PathBuf,
    pub undo_script: PathBuf,
    pub trash_undo_script: PathBuf,
    pub closure_report: PathBuf,
    pub moved: Vec<MovedFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Move every file-deletion candidate of `plan` into a fresh trash directory under `root`.
///
/// Nothing is touched unless `confirmed` is set. Moves run one at a time; a file that is
/// gone, unsafe, or fails to move is recorded as skipped and the rest still proceed. The
/// undo script is written to the root and into the trash directory, and a closure report
/// is written to the root.
pub fn apply_plan(root: &Path, plan: &Plan, confirmed: bool) -> Result<ApplyOutcome> {
    if !confirmed {
        bail!("Refusing to move files without confirmation; re-run with --yes");
    }

    let now = Local::now();
    let trash_dir = create_trash_dir(root, &now.format("%Y%m%d_%H%M%S").to_string())?;
    info!("Moving planned files into {}", trash_dir.display());

    let mut undo = UndoScript::default();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut moved = Vec::new();
    let mut skipped = Vec::new();

    for candidate in plan.candidates.iter().filter(|c| c.is_file_deletion()) {
        if !seen.insert(candidate.path.as_str()) {
            continue;
        }
        let mut skip = |why: &str| {
            skipped.push(SkippedFile { rel_path: candidate.path.clone(), why: why.to_string() });
        };

        let Some(rel) = safe_relative(&candidate.path) else {
            warn!("Refusing to move unsafe path '{}'", candidate.path);
            skip("path is absolute or escapes the root");
            continue;
        };
        let src = root.join(&rel);
        match src.symlink_metadata() {
            Ok(meta) if meta.is_dir() => {
                warn!("Planned file {} is a directory, skipping", candidate.path);
                skip("is a directory");
                continue;
            }
            Ok(_) => {}
            Err(_) => {
                debug!("Planned file {} no longer exists", candidate.path);
                skip("no longer exists");
                continue;
            }
        }

        let dst = trash_dir.join(&rel);
        if let Err(e) = move_file(&src, &dst) {
            warn!("Could not move {}: {:#}", candidate.path, e);
            skip(format!("move failed: {e}").as_str());
            continue;
        }
        trace!("Moved {} to {}", src.display(), dst.display());
        undo.record_move(&src, &dst);
        moved.push(MovedFile {
            rel_path: candidate.path.clone(),
            reason: candidate.reason,
            confidence: candidate.confidence,
            trashed: dst,
        });
    }
    info!("Moved {} files, skipped {}", moved.len(), skipped.len());

    let trash_undo_script = trash_dir.join(UNDO_SCRIPT);
    let undo_script = root.join(UNDO_SCRIPT);
    undo.write_to(&trash_undo_script)?;
    undo.write_to(&undo_script)?;

    let outcome = ApplyOutcome {
        root: root.to_path_buf(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, false),
        trash_dir,
        undo_script,
        trash_undo_script,
        closure_report: root.join(CLOSURE_REPORT),
        moved,
        skipped,
    };
    write_closure(&outcome.closure_report, &outcome, plan.summary.confidence_threshold)?;
    Ok(outcome)
}

/// Claim `._trash_<stamp>`, or `._trash_<stamp>_<n>` when that name is taken.
fn create_trash_dir(root: &Path, stamp: &str) -> Result<PathBuf> {
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{TRASH_PREFIX}{stamp}")
        } else {
            format!("{TRASH_PREFIX}{stamp}_{attempt}")
        };
        let dir = root.join(name);
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create trash directory {}", dir.display()));
            }
        }
    }
}

/// Normalize a plan path; `None` if it is absolute, empty, escapes the root or points
/// into an earlier trash directory.
fn safe_relative(raw: &str) -> Option<PathBuf> {
    let path = Path::new(raw);
    if path.is_absolute() {
        return None;
    }
    let cleaned = clean(path);
    if !cleaned.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    let first = cleaned.components().next()?;
    if first.as_os_str().to_string_lossy().starts_with(TRASH_PREFIX) {
        return None;
    }
    Some(cleaned)
}

fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::rename(src, dst)
        .with_context(|| format!("Failed to rename {} to {}", src.display(), dst.display()))
}
