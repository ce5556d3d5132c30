pub mod build;
pub mod status;
pub mod watch;
