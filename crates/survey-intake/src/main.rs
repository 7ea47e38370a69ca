//! `survey-intake` - CLI for the survey intake service
//!
//! This binary runs the HTTP intake server and inspects its configuration
//! and record log.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mockable::DefaultClock;

use survey_intake::cli::{Cli, Command, ConfigCommand, ServeCommand};
use survey_intake::server::{self, AppState};
use survey_intake::{init_logging, Config, IntakeProcessor, JsonLinesStore, StoreStats};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Configuration is loaded per command so `config path` and
    // `config validate --file` work even when the default file is broken.
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(load_config(cli.config)?, &serve_cmd).await,
        Command::Status(status_cmd) => handle_status(&load_config(cli.config)?, status_cmd.json),
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    cmd.apply_to(&mut config);
    config.validate()?;

    let addr = config.bind_address()?;
    let store = JsonLinesStore::open(config.log_path(), config.storage.sync_on_append)
        .context("opening record log")?;

    let clock = Arc::new(DefaultClock);
    let processor = Arc::new(IntakeProcessor::new(Arc::new(store), clock.clone()));
    let app = server::router(&config.server, AppState::new(processor, clock))?;

    server::serve(addr, app).await?;
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let log_path = config.log_path();
    let stats = StoreStats::from_log(&log_path)?;

    if json {
        let status = serde_json::json!({
            "bind_address": config.server.bind_address,
            "log_path": log_path,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("survey-intake status");
        println!("--------------------");
        println!("Bind address:  {}", config.server.bind_address);
        println!("Record log:    {}", log_path.display());
        println!("Records:       {}", stats.total_records);
        match stats.newest_record {
            Some(at) => println!("Newest:        {}", at.to_rfc3339()),
            None => println!("Newest:        -"),
        }
        println!("Log size:      {} bytes", stats.log_size_bytes);
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:       {}", config.server.bind_address);
                println!("  CORS origin:        {}", config.server.cors_allowed_origin);
                println!("  Max body (bytes):   {}", config.server.max_body_bytes);
                println!();
                println!("[Storage]");
                println!("  Record log:         {}", config.log_path().display());
                println!("  Sync on append:     {}", config.storage.sync_on_append);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
