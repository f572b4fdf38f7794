use anyhow::Result;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::PYTHON_EXTENSION;
use crate::parser::{new_parser, parse_file};
use crate::resolver::module_name;
use crate::types::{FileRecord, ModuleInfo};

/// Module-level import edges plus the set of modules imported by some other module.
///
/// Reachability is one hop only: a module imported solely by an otherwise unreferenced
/// module still counts as referenced.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    pub imports: BTreeMap<String, BTreeSet<String>>,
    pub referenced: BTreeSet<String>,
}

impl ImportGraph {
    /// `known` is every module name in the scan, including files that failed to parse.
    pub fn build<'a>(
        modules: impl IntoIterator<Item = &'a ModuleInfo>,
        known: &BTreeSet<String>,
    ) -> Self {
        let mut imports: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for info in modules {
            imports.entry(info.module.clone()).or_default().extend(info.imports.iter().cloned());
        }

        let mut referenced = BTreeSet::new();
        for (importer, names) in &imports {
            for name in names {
                if name != importer && known.contains(name) {
                    referenced.insert(name.clone());
                }
            }
        }
        debug!("{} of {} modules are imported by another module", referenced.len(), known.len());
        Self { imports, referenced }
    }

    pub fn is_referenced(&self, module: &str) -> bool {
        self.referenced.contains(module)
    }
}

/// Static facts for every Python file in a scan, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct PythonIndex {
    pub modules: BTreeMap<String, ModuleInfo>,
    pub known_modules: BTreeSet<String>,
    pub graph: ImportGraph,
}

impl PythonIndex {
    pub fn module_for(&self, rel_path: &str) -> Option<&ModuleInfo> {
        self.modules.get(rel_path)
    }
}

/// Parse every `.py` file in parallel. A file that cannot be read or parsed is left out
/// of `modules` but its module name still counts as known.
pub fn build_python_index(files: &[FileRecord]) -> Result<PythonIndex> {
    // Fail once, up front, if the grammar cannot be loaded.
    new_parser()?;

    let sources: Vec<&FileRecord> =
        files.iter().filter(|f| f.extension == PYTHON_EXTENSION).collect();
    info!("Parsing {} Python files", sources.len());

    let known_modules: BTreeSet<String> =
        sources.iter().map(|f| module_name(&f.rel_path)).collect();

    let parsed: Vec<ModuleInfo> = sources
        .par_iter()
        .map_init(
            || new_parser().ok(),
            |parser, file| {
                let parser = parser.as_mut()?;
                match parse_file(parser, file) {
                    Ok(info) => Some(info),
                    Err(e) => {
                        warn!("Skipping {}: {}", file.rel_path, e);
                        None
                    }
                }
            },
        )
        .flatten()
        .collect();

    let graph = ImportGraph::build(&parsed, &known_modules);
    let modules = parsed.into_iter().map(|info| (info.rel_path.clone(), info)).collect();
    Ok(PythonIndex { modules, known_modules, graph })
}
