//! Command-line interface for survey-intake.
//!
//! This module provides the CLI structure for the `survey-intake` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ServeCommand, StatusCommand};

/// survey-intake - Accept survey submissions without keeping raw identifiers
///
/// Validates each submission, hashes the email and age, and appends the
/// result to an append-only JSON-lines log.
#[derive(Debug, Parser)]
#[command(name = "survey-intake")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP intake server
    Serve(ServeCommand),

    /// Show where records go and what the log holds
    Status(StatusCommand),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "survey-intake");
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        let cli = Cli {
            config: None,
            verbose: 2,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let args = vec!["survey-intake", "serve"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Serve(ServeCommand {
                bind: None,
                log_path: None
            })
        ));
    }

    #[test]
    fn test_parse_serve_overrides() {
        let args = vec![
            "survey-intake",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--log-path",
            "/var/lib/survey.ndjson",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Serve(serve) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(serve.bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(
            serve.log_path,
            Some(PathBuf::from("/var/lib/survey.ndjson"))
        );
    }

    #[test]
    fn test_parse_config_validate() {
        let args = vec!["survey-intake", "config", "validate", "--file", "x.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_status() {
        let args = vec!["survey-intake", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_status_json() {
        let args = vec!["survey-intake", "status", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Status(StatusCommand { json: true })));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["survey-intake", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["survey-intake", "-v", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["survey-intake", "-q", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
