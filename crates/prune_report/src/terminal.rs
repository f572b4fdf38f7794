use colored::Colorize;
use log::debug;
use prune_core::{Candidate, Plan};
use std::{
    collections::BTreeMap,
    io::{self, Write},
};

/// Colored tree of candidates grouped by reason, followed by the totals.
pub fn print_plan_tree<W: Write>(writer: &mut W, plan: &Plan) -> io::Result<()> {
    if plan.candidates.is_empty() {
        writeln!(
            writer,
            "{} Nothing to remove. Threshold: {}",
            "✓".green().bold(),
            plan.summary.confidence_threshold
        )?;
        return writer.flush();
    }

    let mut by_reason: BTreeMap<&str, Vec<&Candidate>> = BTreeMap::new();
    for candidate in &plan.candidates {
        by_reason.entry(candidate.reason.as_str()).or_default().push(candidate);
    }
    debug!("Printing {} candidates in {} groups", plan.candidates.len(), by_reason.len());

    writeln!(
        writer,
        "{} {} removal candidates (threshold: {})\n",
        "⚠".yellow().bold(),
        plan.candidates.len().to_string().yellow(),
        plan.summary.confidence_threshold.to_string().yellow()
    )?;

    for (reason, candidates) in &by_reason {
        writeln!(writer, "{} ({})", reason.bright_white().bold(), candidates.len())?;
        for (idx, candidate) in candidates.iter().enumerate() {
            let prefix = if idx == candidates.len() - 1 { "└──" } else { "├──" };
            let confidence = format!("{:.2}", candidate.confidence);
            let confidence = if candidate.confidence >= 0.7 {
                confidence.red()
            } else if candidate.confidence >= 0.5 {
                confidence.yellow()
            } else {
                confidence.normal()
            };
            write!(writer, "{}  {} [{}]", prefix.dimmed(), candidate.path.blue(), confidence)?;
            if let Some(symbol) = candidate.details.get("symbol").and_then(|v| v.as_str()) {
                write!(writer, " {}", symbol.dimmed())?;
            }
            if let Some(original) = candidate.details.get("duplicate_of").and_then(|v| v.as_str())
            {
                write!(writer, " {} {}", "duplicate of".dimmed(), original)?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
    }

    writer.flush()
}
