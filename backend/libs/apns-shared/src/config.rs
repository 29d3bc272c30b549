use std::fmt;
use std::str::FromStr;

use crate::error::ApnsError;

const PRODUCTION_HOST: &str = "api.push.apple.com";
const SANDBOX_HOST: &str = "api.sandbox.push.apple.com";

/// APNs server a client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApnsEnvironment {
    #[default]
    Production,
    Development,
}

impl ApnsEnvironment {
    /// Get APNs API endpoint based on environment
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApnsEnvironment::Production => PRODUCTION_HOST,
            ApnsEnvironment::Development => SANDBOX_HOST,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, ApnsEnvironment::Production)
    }
}

impl From<ApnsEnvironment> for a2::Endpoint {
    fn from(env: ApnsEnvironment) -> Self {
        match env {
            ApnsEnvironment::Production => a2::Endpoint::Production,
            ApnsEnvironment::Development => a2::Endpoint::Sandbox,
        }
    }
}

impl FromStr for ApnsEnvironment {
    type Err = ApnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(ApnsEnvironment::Production),
            "development" | "sandbox" => Ok(ApnsEnvironment::Development),
            other => Err(ApnsError::Config(format!(
                "unknown mode `{other}`, expected `production` or `development`"
            ))),
        }
    }
}

impl fmt::Display for ApnsEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApnsEnvironment::Production => f.write_str("production"),
            ApnsEnvironment::Development => f.write_str("development"),
        }
    }
}

/// Resolved authentication material. Exactly one variant per client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// PKCS#12 or PEM file holding the client certificate and its key
    Certificate {
        path: String,
        passphrase: Option<String>,
    },
    /// `.p8` signing key for provider authentication tokens
    Token {
        key_path: String,
        key_id: String,
        team_id: String,
    },
}

impl Credentials {
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Certificate { .. } => "certificate",
            Credentials::Token { .. } => "auth-token",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Credentials::Certificate { path, .. } => path,
            Credentials::Token { key_path, .. } => key_path,
        }
    }
}

/// Raw, possibly incomplete credential inputs as they arrive from flags.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub certificate_path: Option<String>,
    pub certificate_passphrase: Option<String>,
    pub auth_token_path: Option<String>,
    pub auth_token_key_id: Option<String>,
    pub auth_token_team_id: Option<String>,
}

impl CredentialSources {
    /// Pick the single credential variant described by the inputs.
    ///
    /// Only the combination is checked here; files are opened later by
    /// [`crate::ApnsPush::connect`].
    pub fn resolve(self) -> Result<Credentials, ApnsError> {
        let certificate_path = non_empty(self.certificate_path);
        let token_path = non_empty(self.auth_token_path);
        let key_id = non_empty(self.auth_token_key_id);
        let team_id = non_empty(self.auth_token_team_id);

        match (certificate_path, token_path) {
            (Some(_), Some(_)) => Err(ApnsError::Config(
                "certificate-path and auth-token-path are mutually exclusive".to_string(),
            )),
            (Some(path), None) => Ok(Credentials::Certificate {
                path,
                passphrase: non_empty(self.certificate_passphrase),
            }),
            (None, Some(key_path)) => match (key_id, team_id) {
                (Some(key_id), Some(team_id)) => Ok(Credentials::Token {
                    key_path,
                    key_id,
                    team_id,
                }),
                (key_id, team_id) => {
                    let mut missing = Vec::new();
                    if key_id.is_none() {
                        missing.push("auth-token-key");
                    }
                    if team_id.is_none() {
                        missing.push("auth-token-team");
                    }
                    Err(ApnsError::Config(format!(
                        "must specify {} when using token based auth",
                        missing.join(" and ")
                    )))
                }
            },
            (None, None) => Err(ApnsError::Config(
                "certificate or auth token is required".to_string(),
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// APNs Configuration
#[derive(Debug, Clone)]
pub struct ApnsConfig {
    pub credentials: Credentials,
    pub environment: ApnsEnvironment,
    pub topic: Option<String>,
}

impl ApnsConfig {
    /// Create new APNs configuration
    pub fn new(credentials: Credentials, environment: ApnsEnvironment) -> Self {
        Self {
            credentials,
            environment,
            topic: None,
        }
    }

    /// Set the `apns-topic` sent with every notification. Blank topics are dropped.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = non_empty(Some(topic.into()));
        self
    }

    pub fn endpoint(&self) -> &str {
        self.environment.endpoint()
    }
}
