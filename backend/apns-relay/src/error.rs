use apns_shared::ApnsError;
use thiserror::Error;

use crate::dispatch::LineError;

/// Exit code for usage and configuration failures
pub const EXIT_USAGE: u8 = 2;
/// Exit code for every other fatal failure
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Resolving or loading credentials failed
    #[error(transparent)]
    Apns(#[from] ApnsError),

    #[error("line {line}: {source}")]
    Push {
        line: usize,
        #[source]
        source: ApnsError,
    },

    #[error(transparent)]
    Line(#[from] LineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RelayError::Apns(e) if e.is_config() => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }

    /// Whether usage text should accompany the error
    pub fn is_usage(&self) -> bool {
        self.exit_code() == EXIT_USAGE
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
