//! Output helpers shared by CLI commands.

pub mod exit_code;
pub mod format;

pub use exit_code::ExitCode;
