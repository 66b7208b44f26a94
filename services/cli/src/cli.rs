use crate::commands::{run_defaults, run_explain, run_score, ExplainArgs, ScoreArgs};
use clap::{Parser, Subcommand};
use home_score::config::AppConfig;
use home_score::error::AppError;
use home_score::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "home-score",
    about = "Score listing records against configurable weighted rules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a JSON file of records and print one result per line
    Score(ScoreArgs),
    /// Print the built-in home search rule catalog
    Defaults,
    /// List the active rules with their attainable maximum (default command)
    Explain(ExplainArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    let command = cli
        .command
        .unwrap_or_else(|| Command::Explain(ExplainArgs::default()));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Score(args) => run_score(args, &config.scoring, &mut out),
        Command::Defaults => run_defaults(&mut out),
        Command::Explain(args) => run_explain(args, &config.scoring, &mut out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "home-score",
            "score",
            "--records",
            "listings.json",
            "--mapping",
            "mapping.json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.records, PathBuf::from("listings.json"));
                assert_eq!(args.mapping, Some(PathBuf::from("mapping.json")));
                assert_eq!(args.rules, None);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn score_requires_records() {
        assert!(Cli::try_parse_from(["home-score", "score"]).is_err());
    }

    #[test]
    fn command_is_optional() {
        let cli = Cli::try_parse_from(["home-score"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
