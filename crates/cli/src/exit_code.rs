//! Process exit codes shared by every command.

use ofs_core::Error;

/// Exit codes the `ofs` binary reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    UsageError = 2,
    NotFound = 3,
    NetworkError = 4,
    ConfigError = 5,
}

impl ExitCode {
    /// The exit code a failed operation maps to.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::InvalidPath(_) => ExitCode::UsageError,
            Error::NotFound(_) => ExitCode::NotFound,
            Error::Network(_) => ExitCode::NetworkError,
            Error::Config(_) => ExitCode::ConfigError,
            Error::DirectoryNotEmpty(_)
            | Error::Auth(_)
            | Error::Io(_)
            | Error::General(_) => ExitCode::GeneralError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
