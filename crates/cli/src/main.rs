//! Speechlet CLI — the main entry point.
//!
//! Commands:
//! - `serve`    — Start the HTTP gateway
//! - `invoke`   — Execute one event from a file or stdin
//! - `simulate` — Build and execute a launch / intent / session-end event
//! - `status`   — Show configuration
//! - `doctor`   — Diagnose configuration
//! - `init`     — Write a default config file

use clap::{Parser, Subcommand};
use speechlet_config::{ConfigError, LoggingConfig, SkillConfig};

mod commands;

use commands::simulate::SimulateKind;

#[derive(Parser)]
#[command(
    name = "speechlet",
    about = "Speechlet — voice-skill request dispatcher",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Execute one skill event (JSON file path, or `-` for stdin)
    Invoke {
        /// Path to the event JSON
        event: String,
    },

    /// Build a synthetic event and execute it
    Simulate {
        #[command(subcommand)]
        kind: SimulateKind,
    },

    /// Show configuration
    Status,

    /// Diagnose configuration
    Doctor,

    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging settings come from config when it loads; defaults otherwise.
    let (logging, config_error) = logging_settings(SkillConfig::load());
    let filter = if cli.verbose { "debug" } else { logging.level.as_str() };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Config failed to load, logging with defaults");
    }

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Invoke { event } => commands::invoke::run(&event).await?,
        Commands::Simulate { kind } => commands::simulate::run(kind).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Init => commands::init::run().await?,
    }

    Ok(())
}

/// Logging settings from a config load, keeping the error for reporting
/// once a subscriber is installed.
fn logging_settings(
    loaded: Result<SkillConfig, ConfigError>,
) -> (LoggingConfig, Option<ConfigError>) {
    match loaded {
        Ok(config) => (config.logging, None),
        Err(e) => (LoggingConfig::default(), Some(e)),
    }
}
