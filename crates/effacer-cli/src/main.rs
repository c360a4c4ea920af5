mod cli;
mod commands;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = commands::efface::handle(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
