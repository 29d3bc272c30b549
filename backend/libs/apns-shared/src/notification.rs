use std::fmt;

use serde_json::value::RawValue;

/// A single notification built from one relay input line.
///
/// The payload is kept as raw JSON text and forwarded without being
/// re-encoded.
#[derive(Debug, Clone)]
pub struct Notification {
    pub device_token: String,
    pub topic: Option<String>,
    payload: Box<RawValue>,
}

impl Notification {
    /// Build a notification from a device token and raw JSON payload text.
    ///
    /// Fails only when `payload` is not a JSON document at all.
    pub fn new(
        device_token: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            device_token: device_token.into(),
            topic: None,
            payload: RawValue::from_string(payload.into())?,
        })
    }

    pub fn with_topic(mut self, topic: Option<String>) -> Self {
        self.topic = topic;
        self
    }

    pub fn payload(&self) -> &str {
        self.payload.get()
    }

    pub(crate) fn raw_payload(&self) -> &RawValue {
        &self.payload
    }

    /// First 8 characters of the device token, for logs
    pub fn token_prefix(&self) -> String {
        self.device_token.chars().take(8).collect()
    }
}

/// Outcome of one push as reported by APNs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushResult {
    pub status_code: u16,
    /// APNs reason string, empty when the notification was accepted
    pub reason: String,
    pub apns_id: Option<String>,
}

impl PushResult {
    pub fn new(status_code: u16, reason: impl Into<String>) -> Self {
        Self {
            status_code,
            reason: reason.into(),
            apns_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Relay output line: `<statusCode>: '<reason>'`
impl fmt::Display for PushResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}'", self.status_code, self.reason)
    }
}
