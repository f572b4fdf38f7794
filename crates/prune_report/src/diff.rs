use log::{debug, trace};
use prune_core::Plan;
use std::{
    collections::HashSet,
    fs,
    io::{self, Write},
    path::Path,
};

/// Bytes inspected for a NUL when deciding whether a file is binary.
const BINARY_SNIFF_BYTES: usize = 2048;

/// Unified "delete" diff for every file that would be moved, read from `root`.
///
/// Files that no longer exist or cannot be read are left out. Binary files get a
/// one-line placeholder hunk instead of their content.
pub fn print_plan_diff<W: Write>(writer: &mut W, root: &Path, plan: &Plan) -> io::Result<()> {
    let mut seen = HashSet::new();
    for candidate in plan.candidates.iter().filter(|c| c.is_file_deletion()) {
        if !seen.insert(candidate.path.as_str()) {
            continue;
        }
        let data = match fs::read(root.join(&candidate.path)) {
            Ok(data) => data,
            Err(e) => {
                debug!("Leaving {} out of the diff: {}", candidate.path, e);
                continue;
            }
        };
        trace!("Rendering delete diff for {}", candidate.path);

        writeln!(writer, "--- {}", candidate.path)?;
        writeln!(writer, "+++ /dev/null")?;
        if is_binary(&data) {
            writeln!(writer, "@@ -1 +0,0 @@")?;
            writeln!(writer, "-Binary file omitted")?;
        } else {
            let text = String::from_utf8_lossy(&data);
            let lines: Vec<&str> = text.lines().collect();
            match lines.len() {
                0 => {}
                1 => writeln!(writer, "@@ -1 +0,0 @@")?,
                n => writeln!(writer, "@@ -1,{} +0,0 @@", n)?,
            }
            for line in lines {
                writeln!(writer, "-{}", line)?;
            }
        }
        writeln!(writer)?;
    }
    writer.flush()
}

fn is_binary(data: &[u8]) -> bool {
    data[..data.len().min(BINARY_SNIFF_BYTES)].contains(&0)
}
