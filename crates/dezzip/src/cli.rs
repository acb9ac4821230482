use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use console::style;

use dezzip_archive::{ArchiveOutcome, Outcome, RunConfig};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "dezzip",
    version = env!("CARGO_PKG_VERSION"),
    about = "Recursively extract every archive found under a directory",
    long_about = None
)]
pub struct App {
    /// Root directory to scan.
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Extract into existing target directories instead of skipping them.
    #[arg(short, long)]
    pub overwrite: bool,

    /// Destination root for all extracted output (default: beside each archive).
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Re-scan for archives surfaced by extraction, up to N passes.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub passes: usize,
}

pub fn run(app: App) -> anyhow::Result<ExitCode> {
    if !app.root.is_dir() {
        bail!("'{}' is not a directory", app.root.display());
    }
    if app.passes == 0 {
        bail!("--passes must be at least 1");
    }

    log::debug!(
        "scanning {} (overwrite={}, dest={:?}, passes={})",
        app.root.display(),
        app.overwrite,
        app.dest,
        app.passes
    );

    let cancel = signal_flag()?;

    let mut config = RunConfig::new(&app.root)
        .overwrite(app.overwrite)
        .max_passes(app.passes)
        .cancel_flag(cancel);
    if let Some(dest) = &app.dest {
        config = config.destination_root(dest);
    }

    let report = dezzip_archive::run(&config, print_outcome);

    if report.interrupted {
        println!("{}", style("interrupted, stopping").yellow().bold());
    }
    println!("{}", report.summary);

    Ok(if report.summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_outcome(record: &ArchiveOutcome) {
    match &record.outcome {
        Outcome::Extracted {
            target,
            files_written,
        } => println!(
            "{} {} -> {} ({} files)",
            style("extracted").green(),
            record.path.display(),
            target.display(),
            files_written
        ),
        Outcome::Skipped { reason } => println!(
            "{} {} ({reason})",
            style("skipped").yellow(),
            record.path.display()
        ),
        Outcome::Failed { kind, message } => println!(
            "{} {} ({kind}): {message}",
            style("failed").red(),
            record.path.display()
        ),
    }
}

fn signal_flag() -> anyhow::Result<std::sync::Arc<std::sync::atomic::AtomicBool>> {
    crate::signal::install().context("failed to install interrupt handler")
}
