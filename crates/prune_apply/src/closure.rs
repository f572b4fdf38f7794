use anyhow::{Context, Result};
use log::debug;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::transaction::ApplyOutcome;

/// Markdown record of one apply: where things went and how to get them back.
pub fn print_closure<W: Write>(
    writer: &mut W,
    outcome: &ApplyOutcome,
    threshold: f64,
) -> io::Result<()> {
    writeln!(writer, "# Prune closure report\n")?;
    writeln!(writer, "- Timestamp: {}", outcome.timestamp)?;
    writeln!(writer, "- Root: {}", outcome.root.display())?;
    writeln!(writer, "- Confidence threshold: {}", threshold)?;
    writeln!(writer, "- Trash directory: {}", outcome.trash_dir.display())?;
    writeln!(writer, "- Undo script: {}", outcome.undo_script.display())?;
    writeln!(writer, "- Undo script (trash copy): {}", outcome.trash_undo_script.display())?;

    writeln!(writer, "\n## Moved files ({})\n", outcome.moved.len())?;
    if outcome.moved.is_empty() {
        writeln!(writer, "_No files were moved._")?;
    } else {
        writeln!(writer, "| Path | Reason | Confidence |")?;
        writeln!(writer, "| --- | --- | --- |")?;
        for moved in &outcome.moved {
            writeln!(
                writer,
                "| `{}` | {} | {:.2} |",
                moved.rel_path, moved.reason, moved.confidence
            )?;
        }
    }

    if !outcome.skipped.is_empty() {
        writeln!(writer, "\n## Skipped ({})\n", outcome.skipped.len())?;
        for skipped in &outcome.skipped {
            writeln!(writer, "- `{}`: {}", skipped.rel_path, skipped.why)?;
        }
    }

    writeln!(writer, "\nRun `sh {}` to restore every moved file.", outcome.undo_script.display())?;
    writer.flush()
}

pub fn write_closure(path: &Path, outcome: &ApplyOutcome, threshold: f64) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create closure report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    print_closure(&mut writer, outcome, threshold)
        .with_context(|| format!("Failed to write closure report {}", path.display()))?;
    debug!("Wrote closure report {}", path.display());
    Ok(())
}
