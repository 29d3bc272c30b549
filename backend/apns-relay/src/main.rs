use std::process::ExitCode;

use apns_relay::error::EXIT_USAGE;
use apns_relay::{cli, logging, relay, Cli};
use clap::error::ErrorKind;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init_tracing();

    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => e.exit(),
        Err(e) => {
            eprint!("{}", cli::parse_failure(&e));
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}\n");
            eprint!("{}", cli::usage());
            return ExitCode::from(e.exit_code());
        }
    };

    match relay(&config).await {
        Ok(summary) => {
            info!(
                lines = summary.lines_read,
                sent = summary.sent,
                failed = summary.failed,
                skipped = summary.skipped,
                "End of input"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
