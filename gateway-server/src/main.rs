//! Binary crate for the `gateway` HTTP server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and assembling configuration
//! - Routing, request validation and response shaping
//! - Interactive configuration

use clap::Parser;

mod cli;
mod envelope;
mod error;
mod handlers;
mod logging;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
