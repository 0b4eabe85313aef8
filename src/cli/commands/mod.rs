//! Command implementations. Each `run` returns the process exit code.

pub mod audit;
pub mod config;
pub mod dump;
pub mod index;
pub mod lint;
pub mod query;

use crate::IndexError;
use crate::io::ExitCode;

/// Print an error with its recovery hints and map it to an exit code.
pub fn report_error(error: &IndexError) -> ExitCode {
    eprintln!("Error: {error}");
    let suggestions = error.recovery_suggestions();
    if !suggestions.is_empty() {
        eprintln!("\nSuggestions:");
        for suggestion in suggestions {
            eprintln!("  • {suggestion}");
        }
    }
    ExitCode::from_error(error)
}
