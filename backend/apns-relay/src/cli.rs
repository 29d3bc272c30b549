use std::ffi::OsString;

use apns_shared::{ApnsConfig, ApnsEnvironment, CredentialSources};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::dispatch::ErrorPolicy;
use crate::error::RelayResult;

const USAGE_PREAMBLE: &str = "\
Listens to STDIN to send notifications and writes APNS response code and reason to STDOUT.
Certificate or AuthToken are required. The expected format is: <DeviceToken> <APNS Payload>
Example: aff0c63d9eaa63ad161bafee732d5bc2c31f66d552054718ff19ce314371e5d0 {\"aps\": {\"alert\": \"hi\"}}";

#[derive(Parser, Debug)]
#[command(
    name = "apns-relay",
    version,
    about = "Relay STDIN lines to APNs as push notifications",
    before_help = USAGE_PREAMBLE
)]
pub struct Cli {
    /// Path to certificate file (PKCS#12 or PEM).
    #[arg(long, allow_hyphen_values = true, value_name = "PATH")]
    pub certificate_path: Option<String>,

    /// Passphrase for a PKCS#12 certificate.
    #[arg(long, allow_hyphen_values = true, value_name = "PASSPHRASE")]
    pub certificate_passphrase: Option<String>,

    /// Path to auth token file.
    #[arg(long, allow_hyphen_values = true, value_name = "PATH")]
    pub auth_token_path: Option<String>,

    /// Auth token Key ID (required with auth-token-path)
    #[arg(long, allow_hyphen_values = true, value_name = "KEY_ID")]
    pub auth_token_key: Option<String>,

    /// Auth token Team ID (required with auth-token-path)
    #[arg(long, allow_hyphen_values = true, value_name = "TEAM_ID")]
    pub auth_token_team: Option<String>,

    /// The topic of the remote notification, which is typically the bundle ID for your app
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    pub topic: String,

    /// APNS server to send notifications to. `production` or `development`.
    #[arg(long, default_value = "production", value_parser = parse_environment)]
    pub mode: ApnsEnvironment,

    /// What to do when a line is malformed or its push fails.
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Abort)]
    pub on_error: ErrorPolicy,
}

/// Immutable settings for one relay run
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub apns: ApnsConfig,
    pub policy: ErrorPolicy,
}

impl Cli {
    /// Parse process arguments, accepting Go-style `-flag` long options.
    pub fn parse_args() -> Result<Self, clap::Error> {
        Self::try_parse_from(normalize_args(std::env::args_os()))
    }

    /// Resolve credentials and freeze the configuration.
    pub fn into_config(self) -> RelayResult<RelayConfig> {
        let credentials = CredentialSources {
            certificate_path: self.certificate_path,
            certificate_passphrase: self.certificate_passphrase,
            auth_token_path: self.auth_token_path,
            auth_token_key_id: self.auth_token_key,
            auth_token_team_id: self.auth_token_team,
        }
        .resolve()?;

        Ok(RelayConfig {
            apns: ApnsConfig::new(credentials, self.mode).with_topic(self.topic),
            policy: self.on_error,
        })
    }
}

/// Render the usage text shown alongside configuration errors.
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

/// Text printed to stderr when flag parsing fails or help is requested.
///
/// Always ends with the full usage; both cases exit with code 2.
pub fn parse_failure(err: &clap::Error) -> String {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => usage(),
        _ => {
            let message = err.to_string();
            let first = message.lines().next().unwrap_or_default();
            format!("{first}\n\n{}", usage())
        }
    }
}

fn parse_environment(value: &str) -> Result<ApnsEnvironment, String> {
    value.parse().map_err(|e: apns_shared::ApnsError| e.to_string())
}

/// Rewrite single-dash long options (`-topic`, `-mode=development`) into the
/// double-dash form. Short flags such as `-h`, the value following a
/// value-taking flag and everything after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let value_flags = value_flag_names();
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut expects_value = false;

    while let Some(arg) = args.next() {
        if expects_value {
            expects_value = false;
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            normalized.push(arg);
            normalized.extend(args.by_ref());
            break;
        }

        let flag = if is_single_dash_long(text) {
            format!("-{text}")
        } else {
            text.to_owned()
        };
        if let Some(name) = flag.strip_prefix("--") {
            expects_value = !name.contains('=') && value_flags.iter().any(|f| f == name);
        }
        normalized.push(flag.into());
    }

    normalized
}

fn value_flag_names() -> Vec<String> {
    Cli::command()
        .get_arguments()
        .filter(|arg| arg.get_action().takes_values())
        .filter_map(|arg| arg.get_long().map(str::to_owned))
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split('=').next().unwrap_or_default();
    name.len() > 1 && name.starts_with(|c: char| c.is_ascii_alphabetic())
}
