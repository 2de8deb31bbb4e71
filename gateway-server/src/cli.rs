use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gateway_core::Config;
use inquire::{CustomType, Password, PasswordDisplayMode};

use crate::{logging, routes};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "GitHub repositories and weather, behind one API")]
pub struct Cli {
    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server.
    Serve(ServeArgs),

    /// Interactively write the config file (API key, port).
    Configure {
        /// Config file to write instead of the platform default.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration with secrets masked.
    ShowConfig {
        /// Config file to read instead of the platform default.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Port to listen on; overrides `PORT` and the config file.
    #[arg(long)]
    pub port: Option<u16>,

    /// Config file to read instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Serve(ServeArgs::default())) {
            Command::Serve(args) => serve(args).await,
            Command::Configure { config } => configure(config.as_deref()),
            Command::ShowConfig { config } => show_config(config.as_deref()),
        }
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    logging::init(args.json_logs)?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.port = port;
    }

    routes::serve(config).await
}

fn resolve_path(path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => Config::config_file_path(),
    }
}

fn configure(path: Option<&Path>) -> anyhow::Result<()> {
    let path = resolve_path(path)?;
    let mut config = Config::from_file(&path)?;

    let api_key = Password::new("OpenWeather API key (leave empty to keep current):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    config.port = CustomType::<u16>::new("Port:")
        .with_default(config.port)
        .with_error_message("Please enter a port number between 0 and 65535")
        .prompt()
        .context("Failed to read port")?;

    config.save(&path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn show_config(path: Option<&Path>) -> anyhow::Result<()> {
    let path = resolve_path(path)?;
    let config = Config::load(Some(path.as_path()))?;

    let rendered = toml::to_string_pretty(&config.redacted())
        .context("Failed to render configuration")?;

    println!("# {}", path.display());
    print!("{rendered}");
    Ok(())
}
