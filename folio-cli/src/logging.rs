//! Subscriber setup for the binary.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Args;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a filter directive that replaces the default.
pub const ENV_VAR: &str = "FOLIO_LOG";

/// Skip reasons stay visible at the default verbosity.
const SKIP_TARGETS: &str =
    "folio::ignored=info,folio::unavailable=info,folio::failed=info,folio::skipped=info";

#[derive(Args, Debug, Default)]
pub struct LogArgs {
    /// Log progress at info level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log at debug level.
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub debug: bool,

    /// Also write JSON log lines to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl LogArgs {
    fn directive(&self) -> String {
        let base = if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        };
        format!("{base},{SKIP_TARGETS}")
    }
}

pub fn init(args: &LogArgs) -> Result<()> {
    let filter = EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(args.directive()));

    let file_layer = match &args.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Some(fmt::layer().json().with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_keeps_skip_channels() {
        let d = LogArgs::default().directive();
        assert!(d.starts_with("warn,"));
        assert!(d.contains("folio::ignored=info"));
        assert!(d.contains("folio::failed=info"));
    }

    #[test]
    fn verbosity_raises_base_level() {
        let verbose = LogArgs {
            verbose: true,
            ..LogArgs::default()
        };
        assert!(verbose.directive().starts_with("info,"));
        let debug = LogArgs {
            debug: true,
            ..LogArgs::default()
        };
        assert!(debug.directive().starts_with("debug,"));
    }
}
