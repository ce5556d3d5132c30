//! `folio status`: what the next build would collect.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use folio_core::{DirectoryTree, FileKind, IgnoreRules, FRAGMENTS_DIR};

/// Arguments for `folio status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Root of the source tree.
    pub source: PathBuf,

    /// Destination root, excluded from the count when inside the source.
    #[arg(long)]
    pub destination: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    source: String,
    directories: usize,
    fragment_directories: usize,
    files: Vec<KindCount>,
    ignore_rules: Vec<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct KindCount {
    #[tabled(rename = "kind")]
    kind: FileKind,
    #[tabled(rename = "files")]
    files: usize,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let source = self
            .source
            .canonicalize()
            .with_context(|| format!("source directory {} does not exist", self.source.display()))?;
        let destination = self.destination.as_ref().and_then(|d| d.canonicalize().ok());

        let rules = IgnoreRules::load(&source).context("failed to load ignore file")?;
        let tree = folio_build::pipeline::collect(&source, destination.as_deref(), &rules)
            .context("failed to collect source tree")?;

        let report = build_report(&source, &tree, &rules);
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize status JSON")?
            );
            return Ok(());
        }
        print_table(report);
        Ok(())
    }
}

fn build_report(source: &std::path::Path, tree: &DirectoryTree, rules: &IgnoreRules) -> StatusReport {
    let fragment_directories = tree
        .nodes()
        .filter(|(_, node)| node.name == FRAGMENTS_DIR)
        .count();
    let files = FileKind::all()
        .iter()
        .map(|kind| KindCount {
            kind: *kind,
            files: tree
                .nodes()
                .filter(|(_, node)| node.name != FRAGMENTS_DIR)
                .map(|(_, node)| node.files.get(*kind).len())
                .sum(),
        })
        .collect();

    StatusReport {
        source: source.display().to_string(),
        directories: tree.len() - fragment_directories,
        fragment_directories,
        files,
        ignore_rules: rules.patterns().map(str::to_string).collect(),
    }
}

fn print_table(report: StatusReport) {
    let total: usize = report.files.iter().map(|k| k.files).sum();
    println!(
        "folio v{} | {} | {} directories | {} files",
        env!("CARGO_PKG_VERSION"),
        report.source.bold(),
        report.directories,
        total,
    );
    if report.fragment_directories > 0 {
        println!("{} fragment directories", report.fragment_directories);
    }

    let mut table = Table::new(report.files);
    table.with(Style::rounded());
    println!("{table}");

    if report.ignore_rules.is_empty() {
        println!("{}", "no ignore rules".bright_black());
    } else {
        println!("ignore rules:");
        for pattern in &report.ignore_rules {
            println!("  {pattern}");
        }
    }
}
