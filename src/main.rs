mod aggregator;
mod classifier;
mod cli;
mod error;
mod fmt;
mod models;
mod reports;
mod settings;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::stats::run(&cli.iucr, &cli.crimes) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
