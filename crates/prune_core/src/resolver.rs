use log::trace;

/// File stem that makes a directory a package.
pub const PACKAGE_ENTRY: &str = "__init__";

/// Leading directory that never contributes to a module name (src layout).
const SOURCE_ROOT: &str = "src";

/// Dotted module name for a `.py` file relative to the scan root.
///
/// `pkg/__init__.py` names the package itself, and a leading `src/` is dropped:
/// `src/prune/analyzer.py` is `prune.analyzer`.
pub fn module_name(rel_path: &str) -> String {
    let without_ext = rel_path.strip_suffix(".py").unwrap_or(rel_path);
    let mut parts: Vec<&str> = without_ext.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() > 1 && parts[0] == SOURCE_ROOT {
        parts.remove(0);
    }
    if parts.len() > 1 && parts.last() == Some(&PACKAGE_ENTRY) {
        parts.pop();
    }
    parts.join(".")
}

/// True for `__init__.py` files, which are load-bearing regardless of imports.
pub fn is_package_entry(rel_path: &str) -> bool {
    rel_path.rsplit('/').next() == Some("__init__.py")
}

/// Resolve `from <dots><module> import ...` against the importing module.
///
/// `level` is the number of leading dots. A package entry resolves one level higher
/// than a plain module, because its own name already denotes the package.
pub fn resolve_relative(
    importer: &str,
    importer_is_package: bool,
    module: &str,
    level: usize,
) -> String {
    let mut base: Vec<&str> = importer.split('.').filter(|p| !p.is_empty()).collect();
    let trim = if importer_is_package { level.saturating_sub(1) } else { level };
    base.truncate(base.len().saturating_sub(trim));
    base.extend(module.split('.').filter(|p| !p.is_empty()));
    let resolved = base.join(".");
    trace!(
        "Resolved relative import {}{} from {} to '{}'",
        ".".repeat(level),
        module,
        importer,
        resolved
    );
    resolved
}
