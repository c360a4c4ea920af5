use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "effacer")]
#[command(about = "Strip bulky and sensitive payloads from assistant transcripts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transcript to efface (newline-delimited JSON)
    pub input: PathBuf,

    /// Config file (default: platform config directory)
    #[arg(long, env = "EFFACER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Characters bash-mode output must exceed to be effaced (overrides config)
    #[arg(long)]
    pub local_output_threshold: Option<usize>,

    /// Process and report without writing the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Do not copy the resume command to the clipboard
    #[arg(long)]
    pub no_clipboard: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress the summary report
    #[arg(long, short)]
    pub quiet: bool,

    /// Debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_input() {
        assert!(Cli::try_parse_from(["effacer"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "effacer",
            "session.jsonl",
            "--dry-run",
            "--no-clipboard",
            "--local-output-threshold",
            "120",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("session.jsonl"));
        assert!(cli.dry_run);
        assert!(cli.no_clipboard);
        assert_eq!(cli.local_output_threshold, Some(120));
        assert!(!cli.json);
    }
}
