//! shortener-config CLI entry point.

use clap::Parser;

use shortener_config::cli::{commands, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Check(args) => commands::check::execute(args, cli.json),
        Commands::Show(args) => commands::show::execute(args, cli.json),
    };

    if let Err(err) = result {
        shortener_config::cli::handle_error(err, cli.json);
    }
}
