//! Mapfill CLI - Command-line interface
//!
//! This binary provides a command-line interface to the mapfill library.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;

#[derive(Parser)]
#[command(name = "mapfill")]
#[command(version = mapfill::VERSION)]
#[command(about = "Fill an image file with a static map of a street address", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Geocode an address and save a static map image
    Generate(GenerateArgs),

    /// View and modify stored dialog preferences
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
