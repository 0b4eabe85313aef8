//! `lint` command.

use super::report_error;
use crate::IndexError;
use crate::config::LintConfig;
use crate::index::Snapshot;
use crate::io::ExitCode;
use crate::lint::{Linter, Severity, has_errors};

pub fn run(snapshot: &Snapshot, config: &LintConfig, json: bool) -> ExitCode {
    let diagnostics = Linter::new(config).check_snapshot(snapshot);

    if json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(text) => println!("{text}"),
            Err(e) => return report_error(&IndexError::from(e)),
        }
    } else {
        for diagnostic in &diagnostics {
            println!("{diagnostic}");
        }
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        eprintln!(
            "{}: {} file(s) checked, {errors} error(s), {} warning(s)",
            snapshot.tag,
            snapshot.files.len(),
            diagnostics.len() - errors
        );
    }

    if has_errors(&diagnostics) {
        ExitCode::LintFailed
    } else {
        ExitCode::Success
    }
}
