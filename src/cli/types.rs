//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::check::CheckArgs;
use super::commands::show::ShowArgs;

#[derive(Parser)]
#[command(name = "shortener-config")]
#[command(about = "Resolve and inspect the URL shortener configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the environment and report every invalid variable
    Check(CheckArgs),

    /// Print every resolved field with its value and origin
    Show(ShowArgs),
}
