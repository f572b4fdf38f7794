use dashmap::DashMap;
use log::{debug, trace, warn};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use super::AnalysisContext;
use crate::types::{Candidate, FileRecord, Reason};

pub const DUPLICATE_CONFIDENCE: f64 = 0.9;

const CHUNK_SIZE: usize = 64 * 1024;

/// Group non-empty files by content hash. In each group the file with the shortest
/// relative path (then lexically smallest) is kept; every other member is a candidate.
pub fn find_duplicate_files(ctx: &AnalysisContext<'_>) -> Vec<Candidate> {
    let by_hash: DashMap<String, Vec<&FileRecord>> = DashMap::new();
    // A symlink shares its target's content without being a copy of it.
    let hashable = |f: &&FileRecord| f.size > 0 && !is_symlink(&f.path);
    ctx.files.par_iter().filter(hashable).for_each(|file| match hash_file(&file.path) {
        Ok(digest) => by_hash.entry(digest).or_default().push(file),
        Err(e) => warn!("Could not hash {}: {}", file.rel_path, e),
    });
    debug!("Hashed files into {} distinct contents", by_hash.len());

    let mut groups: Vec<(String, Vec<&FileRecord>)> =
        by_hash.into_iter().filter(|(_, group)| group.len() > 1).collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    let mut candidates = Vec::new();
    for (digest, mut group) in groups {
        group.sort_by(|a, b| {
            a.rel_path.len().cmp(&b.rel_path.len()).then_with(|| a.rel_path.cmp(&b.rel_path))
        });
        let keep = group[0];
        for dup in &group[1..] {
            trace!("{} duplicates {}", dup.rel_path, keep.rel_path);
            candidates.push(
                Candidate::file(&dup.rel_path, Reason::DuplicateFile, DUPLICATE_CONFIDENCE)
                    .with_detail("duplicate_of", keep.rel_path.as_str())
                    .with_detail("hash", digest.as_str()),
            );
        }
    }
    candidates
}

fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink())
}

/// Hex SHA-256 of a file's content, streamed.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
