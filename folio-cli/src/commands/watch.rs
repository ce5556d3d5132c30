//! `folio watch`: build, then keep rebuilding until quit.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use folio_core::RunOptions;
use folio_live::LiveConfig;
use folio_render::Collaborators;

/// Arguments for `folio watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
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

    /// Delay between a change and the rebuild it triggers.
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub debounce_ms: u64,

    /// Page to open after each successful build.
    #[arg(long, value_name = "URL")]
    pub watch_url: Option<String>,

    /// Start with live preview enabled.
    #[arg(long, requires = "watch_url")]
    pub open: bool,

    /// Executable run by the `u` command with the destination as argument.
    #[arg(long, value_name = "PATH")]
    pub upload_hook: Option<PathBuf>,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        let options = RunOptions::new(&self.source, &self.destination)
            .ignore_times(self.ignore_times)
            .force_copy(self.force_copy);
        let config = LiveConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            watch_url: self.watch_url,
            upload_hook: self.upload_hook,
            open_browser: self.open,
        };
        folio_live::start_blocking(options, config, Collaborators::external())
            .context("live mode exited with error")
    }
}
