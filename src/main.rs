//! wireplay - Strategy game client
//!
//! Connects to a game server and plays a match with the built-in strategy.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wireplay::config::{self, Config};
use wireplay::network::Client;
use wireplay::protocol;
use wireplay::IdleStrategy;

/// wireplay - Strategy game client
#[derive(Parser)]
#[command(name = "wireplay")]
#[command(version)]
#[command(about = "Play a match against the game server", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the server and play one match
    Run {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(short, long)]
        port: Option<u16>,

        /// Authentication token
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Show current configuration
    Config {
        /// Generate sample configuration
        #[arg(long)]
        generate: bool,

        /// Output path for generated config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show protocol information
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default().unwrap_or_default()
    };

    // Initialize logging
    let filter = EnvFilter::new(config.log_filter(cli.verbose));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { host, port, token } => {
            run_client(&config, host, port, token).await?;
        }
        Commands::Config { generate, output } => {
            if generate {
                let sample = config::generate_sample_config()?;
                if let Some(path) = output {
                    std::fs::write(&path, &sample)?;
                    println!("Configuration written to: {}", path.display());
                } else {
                    println!("{}", sample);
                }
            } else if let Some(path) = output {
                config.save(&path)?;
                println!("Configuration written to: {}", path.display());
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Commands::Info => {
            print_protocol_info();
        }
    }

    Ok(())
}

/// Play one match with the idle strategy
async fn run_client(
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
    token: Option<String>,
) -> anyhow::Result<()> {
    let net_config = config.network_config(host, port, token);
    tracing::info!(
        "Playing against {}:{}",
        net_config.host,
        net_config.port
    );

    let client = Client::new(net_config);
    let mut strategy = IdleStrategy;

    tokio::select! {
        result = client.run(&mut strategy) => {
            let summary = result?;
            println!(
                "Match finished: {} ticks played, last tick {}",
                summary.ticks_played, summary.last_tick_index
            );
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nInterrupted, leaving the match.");
        }
    }

    Ok(())
}

/// Print protocol information
fn print_protocol_info() {
    println!("wireplay Protocol Information");
    println!("=============================\n");

    println!("Protocol Version: {}", protocol::PROTOCOL_VERSION);
    println!("Default Host: {}", protocol::DEFAULT_HOST);
    println!("Default Port: {}", protocol::DEFAULT_PORT);
    println!("Default Token: {}", protocol::DEFAULT_TOKEN);
    println!("Max Payload: {} bytes", protocol::MAX_PAYLOAD_SIZE);
    println!("Tile Size: {}", wireplay::model::TILE_SIZE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["wireplay", "info"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from(["wireplay", "-v", "run", "--host", "10.0.0.2", "-p", "4000"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run { host, port, token } => {
                assert_eq!(host.as_deref(), Some("10.0.0.2"));
                assert_eq!(port, Some(4000));
                assert_eq!(token, None);
            }
            _ => panic!("expected run"),
        }
    }
}
