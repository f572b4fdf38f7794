use anyhow::Result;
use globset::GlobSet;
use ignore::{DirEntry, WalkBuilder};
use log::{debug, trace};
use std::{
    fs,
    path::{Component, Path},
};

use crate::config::{ScanTables, build_globset};
use crate::types::FileRecord;

/// Walk `root` and return every file that passes the include/exclude globs, sorted by
/// relative path. Excluded directories are pruned and never descended into.
pub fn collect_files(
    root: &Path,
    include: &[String],
    exclude: &[String],
    tables: &ScanTables,
) -> Result<Vec<FileRecord>> {
    debug!("Collecting files under {}", root.display());
    let patterns: Vec<String> = tables.default_excludes.iter().chain(exclude).cloned().collect();
    let excludes = build_globset(&patterns)?;
    let includes = if include.is_empty() { None } else { Some(build_globset(include)?) };

    let prune_root = root.to_path_buf();
    let prune_set = excludes.clone();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| !is_pruned_dir(&prune_root, &prune_set, entry))
        .build();

    let mut files = Vec::new();
    for res in walker {
        let dent = match res {
            Ok(dent) => dent,
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        // Symlinks are listed but not followed; one that points at a file counts as a file.
        let is_link = dent.path_is_symlink();
        if !(dent.file_type().is_some_and(|t| t.is_file()) || (is_link && dent.path().is_file())) {
            continue;
        }
        let Some(rel_path) = relative_posix(root, dent.path()) else {
            continue;
        };
        if excludes.is_match(&rel_path) {
            trace!("Excluded: {}", rel_path);
            continue;
        }
        if let Some(includes) = &includes
            && !includes.is_match(&rel_path)
        {
            trace!("Not included: {}", rel_path);
            continue;
        }
        let metadata = match fs::metadata(dent.path()) {
            Ok(m) => m,
            Err(err) => {
                debug!("Skipping {}: {}", rel_path, err);
                continue;
            }
        };
        let extension = dent
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        files.push(FileRecord {
            path: dent.path().to_path_buf(),
            rel_path,
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
            extension,
        });
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    debug!("Collected {} files", files.len());
    Ok(files)
}

fn is_pruned_dir(root: &Path, excludes: &GlobSet, entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_dir()) {
        return false;
    }
    match relative_posix(root, entry.path()) {
        Some(rel_dir) if excludes.is_match(format!("{rel_dir}/")) => {
            trace!("Pruning directory: {}", rel_dir);
            true
        }
        _ => false,
    }
}

/// Relative path joined with `/` regardless of the host separator.
pub(crate) fn relative_posix(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() { None } else { Some(parts.join("/")) }
}
