/// APNs Shared Library
///
/// This library provides the Apple Push Notification Service (APNs) client used
/// by the relay tooling to push raw JSON payloads to iOS and macOS devices.
///
/// It handles:
/// - Credential resolution (client certificate or `.p8` auth token)
/// - Environment selection (production or sandbox endpoint)
/// - HTTP/2 delivery through `a2`, one notification per call
/// - Mapping APNs responses and transport failures into typed results
pub mod client;
pub mod config;
pub mod error;
pub mod notification;

pub use client::{ApnsPush, PushClient};
pub use config::{ApnsConfig, ApnsEnvironment, CredentialSources, Credentials};
pub use error::ApnsError;
pub use notification::{Notification, PushResult};
