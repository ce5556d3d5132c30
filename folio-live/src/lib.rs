//! Live mode: rebuild on source changes, interactive commands and
//! availability transitions.

pub mod command;
mod error;
pub mod hooks;
mod runtime;
pub mod scheduler;
pub mod settings;

pub use command::Command;
pub use error::LiveError;
pub use runtime::{run, start_blocking, BuildRunner, Message, Session};
pub use scheduler::{Decision, RunFlags, WatchScheduler, When};
pub use settings::{LiveConfig, DEBOUNCE_WINDOW};
