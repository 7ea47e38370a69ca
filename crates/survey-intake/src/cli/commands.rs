//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Default, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind_address`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Record log to append to (overrides `storage.log_path`)
    #[arg(short, long, value_name = "FILE")]
    pub log_path: Option<PathBuf>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl ServeCommand {
    /// Fold command-line overrides into a loaded configuration.
    pub fn apply_to(&self, config: &mut crate::Config) {
        if let Some(bind) = &self.bind {
            config.server.bind_address.clone_from(bind);
        }
        if let Some(path) = &self.log_path {
            config.storage.log_path = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_serve_overrides_applied() {
        let mut config = Config::default();
        let cmd = ServeCommand {
            bind: Some("0.0.0.0:8080".to_string()),
            log_path: Some(PathBuf::from("/tmp/intake.ndjson")),
        };

        cmd.apply_to(&mut config);

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/intake.ndjson"));
    }

    #[test]
    fn test_serve_without_overrides_keeps_config() {
        let mut config = Config::default();
        ServeCommand::default().apply_to(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_status_command_debug() {
        let cmd = StatusCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
