//! Portstore CLI - Port record upload and management
//!
//! Thin client over the Portstore HTTP API.

mod api;
mod config;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;

use api::{PortResponse, PortstoreClient};
use config::Config;

#[derive(Parser)]
#[command(name = "portstore")]
#[command(about = "Portstore CLI - Port record upload and management", long_about = None)]
#[command(version)]
struct Cli {
    /// Server URL (overrides the stored config for this call)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up
    Health,

    /// Show a single port
    Get {
        /// Port ID (e.g. USNYC)
        id: String,
    },

    /// Number of stored ports
    Count,

    /// Upload a JSON file of ports keyed by ID
    Upload {
        /// Path to the ports file
        file: PathBuf,
    },

    /// Delete one port, or all of them with --all
    Delete {
        /// Port ID
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<String>,
        /// Delete every stored port
        #[arg(long)]
        all: bool,
    },

    /// Show configuration; with --base-url, store the new server URL
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_url = cli.base_url;

    match cli.command {
        Commands::Config => cmd_config(base_url)?,
        Commands::Health => {
            let health = connect(base_url)?.health().await?;
            println!(
                "{} {} (v{})",
                "✓".green(),
                health.message,
                health.version.dimmed()
            );
            if health.status != "ok" {
                bail!("Server reported status '{}'", health.status);
            }
        }
        Commands::Get { id } => {
            let port = connect(base_url)?.get_port(&id).await?;
            print_port(&port);
        }
        Commands::Count => {
            let count = connect(base_url)?.count().await?;
            println!("{} ports stored", count.to_string().green());
        }
        Commands::Upload { file } => {
            let client = connect(base_url)?;
            print!("Uploading {:?}... ", file);
            io::stdout().flush()?;
            match client.upload(&file).await {
                Ok(total) => println!("{} {} ports stored", "OK".green(), total),
                Err(e) => {
                    println!("{}", "Failed".red());
                    return Err(e);
                }
            }
        }
        Commands::Delete { all: true, .. } => {
            let message = connect(base_url)?.delete_all().await?;
            println!("{} {}", "✓".green(), message);
        }
        Commands::Delete { id: Some(id), .. } => {
            let message = connect(base_url)?.delete_port(&id).await?;
            println!("{} {}", "✓".green(), message);
        }
        Commands::Delete { .. } => bail!("Specify a port ID or --all"),
    }

    Ok(())
}

/// Client for the stored server URL, or `base_url` when given
fn connect(base_url: Option<String>) -> Result<PortstoreClient> {
    let mut config = Config::load()?;
    if let Some(url) = base_url {
        config.set_base_url(&url);
    }
    Ok(PortstoreClient::new(&config.base_url))
}

fn print_port(port: &PortResponse) {
    println!("{} {}", port.id.cyan().bold(), port.name.bold());
    println!("  City:     {}", port.city);
    println!("  Country:  {}", port.country);
    if !port.province.is_empty() {
        println!("  Province: {}", port.province);
    }
    if !port.code.is_empty() {
        println!("  Code:     {}", port.code);
    }
    if !port.timezone.is_empty() {
        println!("  Timezone: {}", port.timezone);
    }
    if let [lon, lat] = port.coordinates.as_slice() {
        println!("  Location: {}, {}", lat, lon);
    }
    for (label, values) in [
        ("Alias", &port.alias),
        ("Regions", &port.regions),
        ("UN/LOCODEs", &port.unlocs),
    ] {
        if !values.is_empty() {
            println!("  {}: {}", label, values.join(", ").dimmed());
        }
    }
}

fn cmd_config(set_base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = set_base_url {
        config.set_base_url(&url);
        config.save()?;
        println!("{} Base URL saved to {:?}", "✓".green(), Config::config_path()?);
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);

    Ok(())
}
