//! `dump` command.

use super::report_error;
use crate::IndexResult;
use crate::index::Snapshot;
use crate::io::ExitCode;
use std::path::Path;

pub fn run(snapshot: &Snapshot, output: Option<&Path>) -> ExitCode {
    match dump(snapshot, output) {
        Ok(()) => ExitCode::Success,
        Err(e) => report_error(&e),
    }
}

fn dump(snapshot: &Snapshot, output: Option<&Path>) -> IndexResult<()> {
    let export = snapshot.export();
    match output {
        Some(path) => {
            export.write_to(path)?;
            eprintln!(
                "Wrote {} namespace(s) from {} to {}",
                export.namespaces.len(),
                snapshot.tag,
                path.display()
            );
        }
        None => println!("{}", export.to_json()?),
    }
    Ok(())
}
