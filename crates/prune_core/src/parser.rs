use anyhow::{Context, Result, anyhow, bail};
use log::{debug, trace};
use std::fs;
use tree_sitter::{Node, Parser};

use crate::resolver::{is_package_entry, module_name, resolve_relative};
use crate::types::{FileRecord, ModuleInfo};

pub fn new_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| anyhow!("Failed to load the Python grammar: {}", e))?;
    Ok(parser)
}

pub fn parse_file(parser: &mut Parser, file: &FileRecord) -> Result<ModuleInfo> {
    let src = fs::read_to_string(&file.path)
        .with_context(|| format!("Failed to read {}", file.path.display()))?;
    parse_module(parser, &src, &file.rel_path)
}

/// Extract imports, the entry-point guard, `__all__`, top-level definitions and
/// identifier reads from one Python source. Sources with syntax errors are rejected.
pub fn parse_module(parser: &mut Parser, src: &str, rel_path: &str) -> Result<ModuleInfo> {
    trace!("Parsing Python module: {}", rel_path);
    let tree = parser.parse(src, None).ok_or_else(|| anyhow!("Parser gave up on {}", rel_path))?;
    let root = tree.root_node();
    if root.has_error() {
        bail!("Syntax error in {}", rel_path);
    }

    let module = module_name(rel_path);
    let mut visitor = ModuleVisitor {
        source: src.as_bytes(),
        is_package: is_package_entry(rel_path),
        info: ModuleInfo { module, rel_path: rel_path.to_string(), ..ModuleInfo::default() },
    };
    for (_, stmt) in children_with_fields(root) {
        visitor.visit_top_level(stmt);
    }
    visitor.walk(root, "", None);

    let info = visitor.info;
    debug!(
        "{}: {} imports, {} definitions, entry point: {}",
        rel_path,
        info.imports.len(),
        info.definitions.len(),
        info.is_entry_point
    );
    Ok(info)
}

/// Per-file accumulator; built fresh for every module and consumed afterwards.
struct ModuleVisitor<'s> {
    source: &'s [u8],
    is_package: bool,
    info: ModuleInfo,
}

impl<'s> ModuleVisitor<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        let source: &'s [u8] = self.source;
        node.utf8_text(source).unwrap_or("")
    }

    fn visit_top_level(&mut self, stmt: Node<'_>) {
        match stmt.kind() {
            "function_definition" | "class_definition" => self.record_definition(stmt),
            "decorated_definition" => {
                if let Some(def) = stmt.child_by_field_name("definition") {
                    self.record_definition(def);
                }
            }
            "expression_statement" => {
                for (_, child) in children_with_fields(stmt) {
                    if matches!(child.kind(), "assignment" | "augmented_assignment") {
                        self.record_exports(child);
                    }
                }
            }
            _ => {}
        }
    }

    fn record_definition(&mut self, def: Node<'_>) {
        if let Some(name) = def.child_by_field_name("name") {
            let line = name.start_position().row + 1;
            let symbol = self.text(name).to_string();
            trace!("Definition '{}' at line {}", symbol, line);
            self.info.definitions.insert(symbol, line);
        }
    }

    fn record_exports(&mut self, assignment: Node<'_>) {
        let Some(left) = assignment.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" || self.text(left) != "__all__" {
            return;
        }
        let Some(right) = assignment.child_by_field_name("right") else {
            return;
        };
        if !matches!(right.kind(), "list" | "tuple") {
            return;
        }
        for (_, elt) in children_with_fields(right) {
            if elt.kind() == "string" {
                let exported = string_value(self.text(elt)).to_string();
                self.info.exports.insert(exported);
            }
        }
    }

    fn walk(&mut self, node: Node<'_>, parent_kind: &str, field: Option<&str>) {
        match node.kind() {
            "import_statement" => return self.record_import(node),
            "import_from_statement" => return self.record_import_from(node),
            "future_import_statement" => return,
            "identifier" => {
                if is_read(parent_kind, field) {
                    let read = self.text(node).to_string();
                    self.info.reads.insert(read);
                }
                return;
            }
            "if_statement" if !self.info.is_entry_point && self.is_main_guard(node) => {
                trace!("Found entry-point guard in {}", self.info.rel_path);
                self.info.is_entry_point = true;
            }
            _ => {}
        }
        for (child_field, child) in children_with_fields(node) {
            self.walk(child, node.kind(), child_field);
        }
    }

    fn record_import(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        let names: Vec<Node<'_>> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            if let Some(dotted) = import_target(name) {
                let imported = self.text(dotted).to_string();
                self.info.imports.insert(imported);
            }
        }
    }

    fn record_import_from(&mut self, node: Node<'_>) {
        let Some(module_node) = node.child_by_field_name("module_name") else {
            return;
        };
        let module = if module_node.kind() == "relative_import" {
            let mut level = 0;
            let mut name = "";
            for (_, part) in children_with_fields(module_node) {
                match part.kind() {
                    "import_prefix" => level = self.text(part).matches('.').count(),
                    "dotted_name" => name = self.text(part),
                    _ => {}
                }
            }
            resolve_relative(&self.info.module, self.is_package, name, level)
        } else {
            self.text(module_node).to_string()
        };

        let mut cursor = node.walk();
        let names: Vec<Node<'_>> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            let Some(dotted) = import_target(name) else {
                continue;
            };
            let member = self.text(dotted);
            if module.is_empty() {
                self.info.imports.insert(member.to_string());
            } else {
                self.info.imports.insert(format!("{module}.{member}"));
            }
        }
        if !module.is_empty() {
            self.info.imports.insert(module);
        }
    }

    /// `if __name__ == "__main__":`, in either operand order.
    fn is_main_guard(&self, node: Node<'_>) -> bool {
        let Some(cond) = node.child_by_field_name("condition") else {
            return false;
        };
        if cond.kind() != "comparison_operator" {
            return false;
        }
        let (mut eq, mut name, mut main) = (false, false, false);
        for (_, part) in children_with_fields(cond) {
            match part.kind() {
                "==" => eq = true,
                "identifier" => name |= self.text(part) == "__name__",
                "string" => main |= string_value(self.text(part)) == "__main__",
                _ => {}
            }
        }
        eq && name && main
    }
}

/// Whether an identifier in this position is a load rather than a binding or a label.
fn is_read(parent_kind: &str, field: Option<&str>) -> bool {
    !matches!(
        (parent_kind, field),
        ("function_definition" | "class_definition", Some("name"))
            | ("attribute", Some("attribute"))
            | ("keyword_argument", Some("name"))
            | ("assignment" | "augmented_assignment", Some("left"))
            | ("for_statement" | "for_in_clause", Some("left"))
            | ("named_expression", Some("name"))
            | ("default_parameter" | "typed_default_parameter", Some("name"))
            | ("except_clause" | "as_pattern", Some("alias"))
            | (
                "parameters"
                    | "lambda_parameters"
                    | "typed_parameter"
                    | "list_splat_pattern"
                    | "dictionary_splat_pattern"
                    | "pattern_list"
                    | "tuple_pattern"
                    | "list_pattern"
                    | "as_pattern_target"
                    | "global_statement"
                    | "nonlocal_statement"
                    | "delete_statement"
                    | "dotted_name"
                    | "aliased_import",
                _
            )
    )
}

/// The dotted name behind `x.y` or `x.y as z`.
fn import_target(name: Node<'_>) -> Option<Node<'_>> {
    if name.kind() == "aliased_import" { name.child_by_field_name("name") } else { Some(name) }
}

fn string_value(literal: &str) -> &str {
    literal
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_matches(|c| c == '"' || c == '\'')
}

fn children_with_fields<'t>(node: Node<'t>) -> Vec<(Option<&'static str>, Node<'t>)> {
    let mut cursor = node.walk();
    let mut children = Vec::with_capacity(node.child_count());
    if cursor.goto_first_child() {
        loop {
            children.push((cursor.field_name(), cursor.node()));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    children
}
