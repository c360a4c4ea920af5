use anyhow::Result;
use effacer_config::Config;
use effacer_engine::{EngineOptions, Effacer};

use crate::cli::Cli;
use crate::commands::{clipboard, report};

pub fn handle(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("using default config: {e:#}");
            Config::default()
        }),
    };

    let options = EngineOptions {
        local_output_threshold: cli
            .local_output_threshold
            .unwrap_or(config.local_output_threshold),
    };
    let effacer = Effacer::new(options);
    let run = effacer.run(&cli.input, cli.dry_run)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else if !cli.quiet && config.report.enabled {
        print!("{}", report::render(&run));
    }

    if run.written && config.clipboard.enabled && !cli.no_clipboard {
        let command = config.clipboard.resume_command_for(&run.session_id);
        match clipboard::copy(&command) {
            Ok(()) => tracing::info!(%command, "resume command copied to clipboard"),
            Err(e) => tracing::warn!("clipboard unavailable: {e:#}"),
        }
    }

    Ok(())
}
