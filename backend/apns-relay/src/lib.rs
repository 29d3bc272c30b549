//! APNs relay
//!
//! Reads `<DeviceToken> <APNS Payload>` lines from stdin, pushes each one to
//! APNs and prints `<statusCode>: '<reason>'` per response.

pub mod cli;
pub mod dispatch;
pub mod error;
pub mod logging;

use apns_shared::ApnsPush;
use tokio::io::BufReader;
use tracing::info;

pub use cli::{Cli, RelayConfig};
pub use dispatch::{parse_line, run, DispatchSummary, ErrorPolicy, LineError};
pub use error::{RelayError, RelayResult};

/// Connect to APNs with the configured credentials and relay stdin to stdout
/// until end of input.
pub async fn relay(config: &RelayConfig) -> RelayResult<DispatchSummary> {
    let client = ApnsPush::connect(&config.apns)?;

    info!(
        "Relaying stdin to {} (topic={}, on_error={:?})",
        client.environment().endpoint(),
        config.apns.topic.as_deref().unwrap_or("<none>"),
        config.policy
    );

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    run(
        &client,
        config.apns.topic.as_deref(),
        input,
        &mut output,
        config.policy,
    )
    .await
}
