//! Side effects triggered from live mode: preview browser and upload hook.

use std::path::Path;
use std::process::Command;

use crate::error::{io_err, LiveError};

/// Open `url` in the default browser.
pub fn open_preview(url: &str) -> Result<(), LiveError> {
    open::that(url).map_err(|e| io_err(url, e))
}

/// Run the upload hook with the destination root as its argument.
pub fn run_upload_hook(program: &Path, destination: &Path) -> Result<(), LiveError> {
    let status = Command::new(program)
        .arg(destination)
        .status()
        .map_err(|e| io_err(program, e))?;
    if !status.success() {
        return Err(LiveError::Hook {
            program: program.to_path_buf(),
            status: status.to_string(),
        });
    }
    tracing::info!(program = %program.display(), "upload hook finished");
    Ok(())
}
