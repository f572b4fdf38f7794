use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::{debug, info, trace};
use std::{collections::BTreeSet, path::PathBuf};

use crate::constants::{
    CONFIG_EXTENSIONS, DEFAULT_EXCLUDES, EXPERIMENT_DIRS, MAX_TEXT_BYTES, PROTECTED_NAMES,
    SCRIPT_EXTENSIONS, TEXT_EXTENSIONS,
};
use crate::types::FileRecord;

pub const DEFAULT_THRESHOLD: f64 = 0.4;
pub const ONE_RUN_THRESHOLD: f64 = 0.65;

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Target project directory
    #[arg(long = "path", default_value = ".")]
    pub root: PathBuf,

    /// Glob to include (repeatable, relative to --path)
    #[arg(long)]
    pub include: Vec<String>,

    /// Glob to exclude (repeatable, relative to --path)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Only keep candidates with confidence >= threshold (0-1)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub confidence_threshold: f64,

    /// Also report unused top-level Python definitions (manual review only)
    #[arg(long)]
    pub dead_code: bool,

    /// Conservative single pass: forces the threshold to 0.65
    #[arg(long)]
    pub one_run: bool,

    #[arg(skip)]
    pub tables: ScanTables,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include: Vec::new(),
            exclude: Vec::new(),
            confidence_threshold: DEFAULT_THRESHOLD,
            dead_code: false,
            one_run: false,
            tables: ScanTables::default(),
        }
    }

    /// Resolve the root directory and validate the threshold.
    pub fn initialize(&mut self) -> Result<()> {
        if self.one_run {
            debug!("One-run mode, threshold forced to {}", ONE_RUN_THRESHOLD);
            self.confidence_threshold = ONE_RUN_THRESHOLD;
        }
        if !self.confidence_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.confidence_threshold)
        {
            bail!("Confidence threshold must be within 0-1, got {}", self.confidence_threshold);
        }

        let root = self.root.canonicalize().with_context(|| {
            format!("Path does not exist or is not a directory: {}", self.root.display())
        })?;
        if !root.is_dir() {
            return Err(anyhow!("Path does not exist or is not a directory: {}", root.display()));
        }
        info!("Using root directory: {}", root.display());
        self.root = root;
        Ok(())
    }
}

/// Every fixed table the pipeline consults, passed explicitly to each stage.
#[derive(Debug, Clone)]
pub struct ScanTables {
    pub text_extensions: BTreeSet<String>,
    pub config_extensions: BTreeSet<String>,
    pub script_extensions: BTreeSet<String>,
    pub experiment_dirs: BTreeSet<String>,
    pub default_excludes: Vec<String>,
    pub protected_names: Vec<String>,
    pub max_text_bytes: u64,
}

impl Default for ScanTables {
    fn default() -> Self {
        fn owned<C: FromIterator<String>>(items: &[&str]) -> C {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            text_extensions: owned(TEXT_EXTENSIONS),
            config_extensions: owned(CONFIG_EXTENSIONS),
            script_extensions: owned(SCRIPT_EXTENSIONS),
            experiment_dirs: owned(EXPERIMENT_DIRS),
            default_excludes: owned(DEFAULT_EXCLUDES),
            protected_names: owned(PROTECTED_NAMES),
            max_text_bytes: MAX_TEXT_BYTES,
        }
    }
}

impl ScanTables {
    pub fn is_text(&self, file: &FileRecord) -> bool {
        self.text_extensions.contains(&file.extension)
    }

    pub fn is_config(&self, file: &FileRecord) -> bool {
        self.config_extensions.contains(&file.extension)
    }

    pub fn is_script(&self, file: &FileRecord) -> bool {
        self.script_extensions.contains(&file.extension)
    }

    pub fn in_experiment_dir(&self, file: &FileRecord) -> bool {
        file.segments().any(|segment| self.experiment_dirs.contains(segment))
    }
}

/// Compile globs with fnmatch-like semantics: `*` may cross `/`.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        trace!("Adding glob '{}'", pat);
        builder.add(Glob::new(pat).with_context(|| format!("Invalid glob '{}'", pat))?);
    }
    Ok(builder.build()?)
}
