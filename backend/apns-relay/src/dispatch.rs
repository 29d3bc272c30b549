//! Line dispatch loop
//!
//! Reads `<DeviceToken> <APNS Payload>` lines, pushes each one and writes
//! `<statusCode>: '<reason>'` for every response. Pushes never overlap: the
//! next line is read only after the previous push has completed.

use apns_shared::{Notification, PushClient};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

use crate::error::{RelayError, RelayResult};

/// What the loop does when a line cannot be pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ErrorPolicy {
    /// Stop at the first malformed line or push failure
    #[default]
    Abort,
    /// Log the failure and move on to the next line
    Continue,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("line {line}: expected `<DeviceToken> <APNS Payload>`")]
    Malformed { line: usize },

    #[error("line {line}: payload is not a JSON document: {reason}")]
    InvalidPayload { line: usize, reason: String },

    #[error("line {line}: not valid UTF-8")]
    InvalidUtf8 { line: usize },
}

/// Counters reported once input is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub lines_read: usize,
    /// Notifications that got a response, whatever its status
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Split a line at its first whitespace character into `(token, payload)`.
///
/// The payload is returned exactly as it follows the separator.
pub fn parse_line(line_no: usize, line: &str) -> Result<(&str, &str), LineError> {
    let malformed = LineError::Malformed { line: line_no };

    let (token, payload) = line
        .split_once(|c: char| c.is_whitespace())
        .ok_or_else(|| malformed.clone())?;

    if token.is_empty() || payload.trim().is_empty() {
        return Err(malformed);
    }

    Ok((token, payload))
}

/// Strip the `\n` or `\r\n` terminator and decode the line as UTF-8.
fn decode_line(line_no: usize, raw: &[u8]) -> Result<&str, LineError> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);

    std::str::from_utf8(raw).map_err(|_| LineError::InvalidUtf8 { line: line_no })
}

fn build_notification(
    line_no: usize,
    line: &str,
    topic: Option<&str>,
) -> Result<Notification, LineError> {
    let (token, payload) = parse_line(line_no, line)?;

    Notification::new(token, payload)
        .map(|n| n.with_topic(topic.map(str::to_owned)))
        .map_err(|e| LineError::InvalidPayload {
            line: line_no,
            reason: e.to_string(),
        })
}

/// Drive `client` with every line of `input` until end of input.
///
/// Under [`ErrorPolicy::Abort`] the first line error or push failure is
/// returned and no further input is read. Output and input I/O errors are
/// always returned.
pub async fn run<C, R, W>(
    client: &C,
    topic: Option<&str>,
    mut input: R,
    output: &mut W,
    policy: ErrorPolicy,
) -> RelayResult<DispatchSummary>
where
    C: PushClient + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = DispatchSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        summary.lines_read += 1;
        let line_no = summary.lines_read;

        let line = match decode_line(line_no, &buf) {
            Ok(line) => line,
            Err(e) if policy == ErrorPolicy::Continue => {
                warn!("{}", e);
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if line.trim().is_empty() {
            debug!("skipping blank line {}", line_no);
            continue;
        }

        let notification = match build_notification(line_no, line, topic) {
            Ok(notification) => notification,
            Err(e) if policy == ErrorPolicy::Continue => {
                warn!("{}", e);
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match client.push(&notification).await {
            Ok(result) => {
                output.write_all(format!("{result}\n").as_bytes()).await?;
                output.flush().await?;
                summary.sent += 1;
            }
            Err(e) if policy == ErrorPolicy::Continue => {
                error!(
                    "push failed on line {} for token {}: {}",
                    line_no,
                    notification.token_prefix(),
                    e
                );
                summary.failed += 1;
            }
            Err(e) => {
                return Err(RelayError::Push {
                    line: line_no,
                    source: e,
                })
            }
        }
    }

    Ok(summary)
}
