//! Process exit codes.

use crate::IndexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    LintFailed = 2,
    NotFound = 3,
    ConfigError = 4,
}

impl ExitCode {
    pub fn from_error(error: &IndexError) -> Self {
        match error {
            IndexError::NotFound { .. } | IndexError::UnknownSnapshot { .. } => Self::NotFound,
            IndexError::ConfigError { .. }
            | IndexError::RootNotFound { .. }
            | IndexError::NoSnapshots { .. } => Self::ConfigError,
            _ => Self::GeneralError,
        }
    }
}
