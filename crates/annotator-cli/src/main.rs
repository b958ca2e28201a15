//! Annotator CLI
//!
//! Command-line interface for the annotator

use annotator_core::config::ENV_LOG_FORMAT;
use annotator_core::logging_facility::{self, Profile};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "annotator")]
#[command(about = "Annotator - policy-driven annotation reconciliation", long_about = None)]
struct Cli {
    /// Log format: text or json (defaults to $ANNOTATOR_LOG_FORMAT, then text)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Policy file operations
    Policy(commands::policy::PolicyArgs),
    /// Evaluate a pattern against a candidate name
    Match(commands::matcher::MatchArgs),
    /// Import source and target objects into a database
    Import(commands::import::ImportArgs),
    /// Reconcile targets in a database against its source policy
    Reconcile(commands::reconcile::ReconcileArgs),
}

fn log_profile(flag: Option<&str>) -> Result<Profile, String> {
    flag.map(str::to_string)
        .or_else(|| std::env::var(ENV_LOG_FORMAT).ok())
        .map_or(Ok(Profile::Development), |format| format.parse())
}

fn main() {
    let cli = Cli::parse();

    match log_profile(cli.log_format.as_deref()) {
        Ok(profile) => logging_facility::init(profile),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }

    let result = match cli.command {
        Commands::Policy(args) => commands::policy::execute(args),
        Commands::Match(args) => commands::matcher::execute(args),
        Commands::Import(args) => commands::import::execute(args),
        Commands::Reconcile(args) => commands::reconcile::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reconcile_with_namespace() {
        let cli = Cli::try_parse_from([
            "annotator",
            "reconcile",
            "--db",
            "objects.db",
            "--namespace",
            "default",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.log_format.as_deref(), Some("json"));
        match cli.command {
            Commands::Reconcile(args) => {
                assert_eq!(args.namespace.as_deref(), Some("default"));
                assert_eq!(args.db.to_str(), Some("objects.db"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_match_requires_two_arguments() {
        assert!(Cli::try_parse_from(["annotator", "match", "web-*"]).is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        assert!(log_profile(Some("xml")).is_err());
        assert_eq!(log_profile(Some("json")), Ok(Profile::Production));
    }
}
