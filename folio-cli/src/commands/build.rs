//! `folio build`: one incremental build of a source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::json;

use folio_build::{BuildReport, EntryStatus};
use folio_core::RunOptions;
use folio_render::Collaborators;

/// Arguments for `folio build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Root of the source tree.
    pub source: PathBuf,

    /// Root of the destination tree. Created when missing.
    pub destination: PathBuf,

    /// Rebuild every file regardless of modification times.
    #[arg(long)]
    pub ignore_times: bool,

    /// Copy verbatim files even when size and mtime match.
    #[arg(long)]
    pub force_copy: bool,

    /// Print the report and manifest as JSON.
    #[arg(long)]
    pub json: bool,
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let options = RunOptions::new(&self.source, &self.destination)
            .ignore_times(self.ignore_times)
            .force_copy(self.force_copy);
        let report = folio_build::run(&options, &Collaborators::external())
            .with_context(|| format!("build of {} failed", self.source.display()))?;

        if self.json {
            let payload = json!({
                "written": report.written,
                "up_to_date": report.up_to_date,
                "skipped": report.skipped,
                "failed": report.failed,
                "pruned": report.pruned,
                "next_transition": report.next_transition,
                "manifest": report.manifest,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize build report")?
            );
            return Ok(());
        }

        print_summary(&self, &report);
        Ok(())
    }
}

fn print_summary(args: &BuildArgs, report: &BuildReport) {
    let mark = if report.failed > 0 {
        "✗".red().bold()
    } else {
        "✓".green().bold()
    };
    println!(
        "{mark} {} → {} ({} written, {} up to date, {} skipped, {} failed)",
        args.source.display(),
        args.destination.display(),
        report.written,
        report.up_to_date,
        report.skipped,
        report.failed,
    );

    for entry in report.manifest.iter() {
        let line = format!("  {}", entry.source_filename);
        match entry.status {
            EntryStatus::Produced => println!("{}  {}", "✎".green(), entry.produced_filename),
            EntryStatus::Failed => println!("{}", format!("{line}  failed").red()),
            EntryStatus::Ignored => println!("{}", format!("{line}  ignored").bright_black()),
            EntryStatus::Unavailable => {
                println!("{}", format!("{line}  unavailable").yellow())
            }
            EntryStatus::UpToDate => {}
        }
    }

    if report.pruned > 0 {
        println!("  {} directories pruned", report.pruned);
    }
    if let Some(next) = report.next_transition {
        println!(
            "  next availability change at {}",
            next.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        );
    }
}
