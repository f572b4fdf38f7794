use log::{debug, trace, warn};
use rayon::prelude::*;
use std::{
    collections::{HashMap, HashSet},
    fs,
};

use crate::config::ScanTables;
use crate::types::FileRecord;

/// Relative paths and bare file names mentioned verbatim in some other scanned text file.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    terms: HashSet<String>,
}

impl ReferenceSet {
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// True when either the relative path or the bare name of `file` is mentioned.
    pub fn mentions(&self, file: &FileRecord) -> bool {
        self.contains(&file.rel_path) || self.contains(file.file_name())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<String> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { terms: iter.into_iter().collect() }
    }
}

/// Substring search of every path and file name inside every eligible text file.
///
/// Matching is deliberately not word-boundary aware: a coincidental match only ever
/// suppresses a candidate. A file's own path is not counted as a mention, nor is its own
/// bare name unless another collected file shares that name.
pub fn build_reference_index(files: &[FileRecord], tables: &ScanTables) -> ReferenceSet {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for file in files {
        *name_counts.entry(file.file_name()).or_default() += 1;
    }
    let name_is_unique = |name: &str| name_counts.get(name).is_none_or(|&n| n <= 1);

    let mut terms: Vec<&str> = files
        .iter()
        .flat_map(|f| [f.rel_path.as_str(), f.file_name()])
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    terms.sort_unstable();

    let sources: Vec<&FileRecord> =
        files.iter().filter(|f| tables.is_text(f) && f.size <= tables.max_text_bytes).collect();
    debug!("Scanning {} text files for {} reference terms", sources.len(), terms.len());

    let referenced: HashSet<String> = sources
        .par_iter()
        .flat_map_iter(|source| {
            let found: Vec<String> = match fs::read(&source.path) {
                Ok(bytes) => {
                    let content = String::from_utf8_lossy(&bytes);
                    terms
                        .iter()
                        .copied()
                        .filter(|term| *term != source.rel_path)
                        .filter(|term| {
                            *term != source.file_name() || !name_is_unique(term)
                        })
                        .filter(|term| content.contains(*term))
                        .map(str::to_string)
                        .collect()
                }
                Err(err) => {
                    warn!("Could not read {}: {}", source.rel_path, err);
                    Vec::new()
                }
            };
            trace!("{} mentions {} terms", source.rel_path, found.len());
            found
        })
        .collect();

    debug!("{} terms are referenced", referenced.len());
    ReferenceSet { terms: referenced }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::collect_files;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &[u8]) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn index(root: &Path, tables: &ScanTables) -> ReferenceSet {
        let files = collect_files(root, &[], &[], tables).unwrap();
        build_reference_index(&files, tables)
    }

    #[test]
    fn test_path_and_name_mentions() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "README.md", b"Run scripts/deploy.sh, see settings.yaml");
        create_test_file(root, "scripts/deploy.sh", b"echo deploy");
        create_test_file(root, "conf/settings.yaml", b"a: 1");
        create_test_file(root, "orphan.txt", b"nothing");

        let refs = index(root, &ScanTables::default());
        assert!(refs.contains("scripts/deploy.sh"));
        assert!(refs.contains("deploy.sh"));
        assert!(refs.contains("settings.yaml"));
        assert!(!refs.contains("conf/settings.yaml"));
        assert!(!refs.contains("orphan.txt"));
    }

    #[test]
    fn test_self_mention_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "notes.txt", b"this is notes.txt");

        let refs = index(root, &ScanTables::default());
        assert!(refs.is_empty());
    }

    #[test]
    fn test_shared_name_counts_as_mention_of_the_other_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "app/config.yaml", b"port: 8080");
        create_test_file(root, "docs/config.yaml", b"# overrides values from config.yaml in app");

        let refs = index(root, &ScanTables::default());
        assert!(refs.contains("config.yaml"));
        assert!(!refs.contains("docs/config.yaml"));
        assert!(!refs.contains("app/config.yaml"));
    }

    #[test]
    fn test_binary_sources_are_not_scanned() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "blob.bin", b"target.txt");
        create_test_file(root, "target.txt", b"t");

        let refs = index(root, &ScanTables::default());
        assert!(!refs.contains("target.txt"));
    }

    #[test]
    fn test_size_cap_skips_large_sources() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "big.md", b"mentions target.txt and more padding");
        create_test_file(root, "target.txt", b"t");

        let tables = ScanTables { max_text_bytes: 8, ..ScanTables::default() };
        let refs = index(root, &tables);
        assert!(!refs.contains("target.txt"));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "notes.txt", b"\xff\xfe see data.csv \xc3");
        create_test_file(root, "data.csv", b"1,2");

        let refs = index(root, &ScanTables::default());
        assert!(refs.contains("data.csv"));
    }

    #[test]
    fn test_substring_match_is_not_word_aware() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "doc.md", b"mydata.csv.bak");
        create_test_file(root, "data.csv", b"1");

        let refs = index(root, &ScanTables::default());
        assert!(refs.contains("data.csv"));
    }
}
