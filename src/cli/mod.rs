//! CLI for the GearCheck engine

pub mod serve;

use clap::{Parser, Subcommand};

/// GearCheck - collectible equipment identification and valuation engine
#[derive(Parser)]
#[command(name = "gearcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the engine API server
    Serve,
}
