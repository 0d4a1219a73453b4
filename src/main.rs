use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bankroll::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run()
}

/// Logs go to stderr so reports on stdout stay clean. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "bankroll=debug" } else { "bankroll=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
