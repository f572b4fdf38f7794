use prune_core::Plan;
use std::io::{self, Write};

/// Human-readable plan: summary counts, then one entry per candidate with its details.
pub fn print_plan_markdown<W: Write>(writer: &mut W, plan: &Plan) -> io::Result<()> {
    writeln!(writer, "# Deletion Plan\n")?;
    writeln!(writer, "WARNING: This plan is conservative and requires review.")?;
    writeln!(writer, "Apply mode moves files into a trash directory and writes undo.sh.\n")?;
    writeln!(writer, "Root: `{}`", plan.root)?;
    writeln!(writer, "Generated: `{}`", plan.generated_at)?;
    writeln!(writer, "Files scanned: `{}`", plan.summary.total_files)?;
    writeln!(writer, "Confidence threshold: `{}`", plan.summary.confidence_threshold)?;
    writeln!(writer, "Candidates: `{}`\n", plan.candidates.len())?;

    writeln!(writer, "## Summary\n")?;
    if plan.summary.by_reason.is_empty() {
        writeln!(writer, "_Nothing to remove._")?;
    }
    for (reason, count) in &plan.summary.by_reason {
        writeln!(writer, "- {}: {}", reason, count)?;
    }

    writeln!(writer, "\n## Candidates\n")?;
    for candidate in &plan.candidates {
        writeln!(
            writer,
            "- [{}] {} ({}, confidence={:.2})",
            candidate.kind, candidate.path, candidate.reason, candidate.confidence
        )?;
        if !candidate.details.is_empty() {
            let details: Vec<String> = candidate
                .details
                .iter()
                .map(|(k, v)| format!("{}={}", k, display_value(v)))
                .collect();
            writeln!(writer, "  - {}", details.join(", "))?;
        }
    }
    writer.flush()
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prune_core::{Candidate, Reason, ScanTables, assemble_plan};
    use std::path::Path;

    fn render(plan: &Plan) -> String {
        let mut out = Vec::new();
        print_plan_markdown(&mut out, plan).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_markdown_lists_summary_and_details() {
        let plan = assemble_plan(
            Path::new("/repo"),
            vec![
                Candidate::file("b.txt", Reason::DuplicateFile, 0.9)
                    .with_detail("duplicate_of", "a.txt"),
                Candidate::code("m.py", Reason::DeadCode, 0.4)
                    .with_detail("symbol", "_hidden")
                    .with_detail("line", 3),
            ],
            5,
            0.4,
            &ScanTables::default(),
        )
        .unwrap();

        let md = render(&plan);
        assert!(md.starts_with("# Deletion Plan"));
        assert!(md.contains("Root: `/repo`"));
        assert!(md.contains("- duplicate_file: 1"));
        assert!(md.contains("- dead_code: 1"));
        assert!(md.contains("- [file] b.txt (duplicate_file, confidence=0.90)"));
        assert!(md.contains("  - duplicate_of=a.txt"));
        assert!(md.contains("- [code] m.py (dead_code, confidence=0.40)"));
        assert!(md.contains("  - line=3, symbol=_hidden"));
    }

    #[test]
    fn test_markdown_empty_plan() {
        let plan =
            assemble_plan(Path::new("/repo"), Vec::new(), 0, 0.4, &ScanTables::default()).unwrap();
        let md = render(&plan);
        assert!(md.contains("Candidates: `0`"));
        assert!(md.contains("_Nothing to remove._"));
    }
}
