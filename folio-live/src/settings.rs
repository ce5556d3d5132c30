use std::path::PathBuf;
use std::time::Duration;

/// Delay between a filesystem change and the rebuild it requests.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Live-mode settings, built from CLI flags. Mutable at runtime through
/// interactive commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveConfig {
    pub debounce: Duration,
    /// Page opened after each successful build when `open_browser` is set.
    pub watch_url: Option<String>,
    /// Executable run by the `u` command, with the destination root as its
    /// only argument.
    pub upload_hook: Option<PathBuf>,
    pub open_browser: bool,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_WINDOW,
            watch_url: None,
            upload_hook: None,
            open_browser: false,
        }
    }
}
