use crate::index::ParseError;
use crate::ranges::RangeError;
use crate::resolve::ResolutionError;
use thiserror::Error;

/// Process exit codes, one per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    /// Unreadable PDF or other I/O outside the per-file split loop
    GeneralError = 1,
    Usage = 2,
    Parse = 3,
    Resolution = 4,
    Range = 5,
    /// Some output files could not be written
    SplitIncomplete = 6,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("{0}")]
    Usage(String),

    #[error("invalid index: {0}")]
    Parse(#[from] ParseError),

    #[error("cannot resolve page numbers: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("invalid page ranges: {0}")]
    Range(#[from] RangeError),

    #[error("{failed} of {total} file(s) could not be written")]
    Incomplete { failed: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SplitError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SplitError::Usage(_) => ExitCode::Usage,
            SplitError::Parse(_) => ExitCode::Parse,
            SplitError::Resolution(_) => ExitCode::Resolution,
            SplitError::Range(_) => ExitCode::Range,
            SplitError::Incomplete { .. } => ExitCode::SplitIncomplete,
            SplitError::Other(_) => ExitCode::GeneralError,
        }
    }
}
