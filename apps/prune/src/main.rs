use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;
use log::{debug, info, warn};
use prune_core::{Config, ONE_RUN_THRESHOLD, Plan};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "prune")]
#[command(
    about = "Generate a safe, reviewable deletion plan for a project directory",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Only write the plan files (default)
    #[arg(long, conflicts_with = "apply")]
    dry_run: bool,

    /// Move planned files into a trash directory and write undo.sh
    #[arg(long)]
    apply: bool,

    /// Confirm --apply
    #[arg(long)]
    yes: bool,

    /// Apply a previously written deletion_plan.json instead of analyzing again
    #[arg(long, value_name = "FILE", requires = "apply")]
    plan: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!(
        "Parsed CLI arguments: dry_run={}, apply={}, yes={}, plan={:?}, config={:?}",
        cli.dry_run, cli.apply, cli.yes, cli.plan, cli.config
    );

    if cli.apply && !cli.yes {
        bail!("Refusing to apply without confirmation; re-run with --yes");
    }

    let start = Instant::now();
    let num_threads = rayon::current_num_threads();

    let mut cfg = cli.config;
    if cfg.one_run {
        writeln!(
            stdout,
            "{} One-run mode: confidence threshold {}",
            "●".bright_blue(),
            ONE_RUN_THRESHOLD.to_string().cyan()
        )?;
    }
    cfg.initialize()?;
    info!(
        "Running prune with threshold {} (using {} threads)",
        cfg.confidence_threshold, num_threads
    );

    let plan = match &cli.plan {
        Some(path) => load_plan(path, &cfg.root)?,
        None => {
            let plan = prune_core::run_analysis(&cfg)?;
            let files = prune_report::write_plan(&cfg.root, &plan)?;
            debug!("Plan files: {:?}", files);
            plan
        }
    };

    prune_report::print_plan_tree(&mut stdout, &plan)?;

    if cli.apply {
        let outcome = prune_apply::apply_plan(&cfg.root, &plan, cli.yes)?;
        writeln!(
            stdout,
            "{} Moved {} files to {}",
            "✓".green().bold(),
            outcome.moved.len().to_string().cyan(),
            outcome.trash_dir.display()
        )?;
        if !outcome.skipped.is_empty() {
            writeln!(
                stdout,
                "{} Skipped {} planned files (see {})",
                "⚠".yellow().bold(),
                outcome.skipped.len().to_string().yellow(),
                outcome.closure_report.display()
            )?;
        }
        writeln!(stdout, "  Undo with: sh {}", outcome.undo_script.display())?;
        writeln!(stdout, "  Closure report: {}", outcome.closure_report.display())?;
    } else {
        writeln!(
            stdout,
            "{} Dry-run complete. Plans written to {}",
            "✓".green().bold(),
            cfg.root.display()
        )?;
    }

    let elapsed_ms = start.elapsed().as_millis();
    writeln!(
        stdout,
        "\n{} Finished in {}ms on {} files (using {} threads).",
        "●".bright_blue(),
        elapsed_ms.to_string().cyan(),
        plan.summary.total_files.to_string().cyan(),
        num_threads.to_string().cyan()
    )?;
    stdout.flush()?;

    Ok(())
}

fn load_plan(path: &Path, root: &Path) -> Result<Plan> {
    let plan = prune_report::read_plan(path)?;
    if Path::new(&plan.root) != root {
        warn!(
            "Plan {} was generated for {}, applying it to {}",
            path.display(),
            plan.root,
            root.display()
        );
    }
    Ok(plan)
}
