mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{breaks, join, render};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Render(args) => render::run(cli, args),
        Commands::Breaks(args) => breaks::run(cli, args),
        Commands::Join(args) => join::run(cli, args),
    }
}

fn main() -> std::process::ExitCode {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            std::process::ExitCode::FAILURE
        }
    }
}
