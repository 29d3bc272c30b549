use thiserror::Error;

/// Error type for APNs operations
#[derive(Debug, Error)]
pub enum ApnsError {
    /// Flag combination or value that cannot produce a client
    #[error("APNs configuration error: {0}")]
    Config(String),

    /// Credential file could not be read or parsed
    #[error("Error retrieving {kind} `{path}`: {reason}")]
    Credential {
        kind: &'static str,
        path: String,
        reason: String,
    },

    /// No response could be obtained from APNs
    #[error("APNs push failed: {0}")]
    Transport(String),
}

impl ApnsError {
    pub fn is_config(&self) -> bool {
        matches!(self, ApnsError::Config(_))
    }
}
