use anyhow::{Context, Result};
use log::debug;
use std::{fs, path::Path};

/// A POSIX shell script that reverses every completed move, in order.
#[derive(Debug, Clone)]
pub struct UndoScript {
    lines: Vec<String>,
}

impl Default for UndoScript {
    fn default() -> Self {
        Self { lines: vec!["#!/bin/sh".to_string(), "set -e".to_string()] }
    }
}

impl UndoScript {
    /// Record that `original` was moved to `trashed`. Paths are absolute.
    pub fn record_move(&mut self, original: &Path, trashed: &Path) {
        if let Some(parent) = original.parent() {
            self.lines.push(format!("mkdir -p {}", shell_quote(&parent.to_string_lossy())));
        }
        self.lines.push(format!(
            "mv {} {}",
            shell_quote(&trashed.to_string_lossy()),
            shell_quote(&original.to_string_lossy())
        ));
    }

    pub fn render(&self) -> String {
        let mut script = self.lines.join("\n");
        script.push('\n');
        script
    }

    /// Write the script to `path`, owner-executable.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())
            .with_context(|| format!("Failed to write undo script {}", path.display()))?;
        make_executable(path)?;
        debug!("Wrote undo script {}", path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
        .with_context(|| format!("Failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Single-quote for `sh`; embedded quotes become `'\''`.
pub fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}
