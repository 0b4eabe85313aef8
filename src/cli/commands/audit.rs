//! `audit` command.

use crate::io::ExitCode;
use crate::parsing::ruby::RubyStubAudit;
use std::path::Path;

pub fn run(file: &Path) -> ExitCode {
    match RubyStubAudit::audit_file(file) {
        Ok(audit) => {
            print!("{}", audit.generate_report());
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Audit of {} failed: {e}", file.display());
            ExitCode::GeneralError
        }
    }
}
