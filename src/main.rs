//! Main entry point for ddlog CLI

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use ddlog::cli::Cli;
use ddlog::commands::run;
use ddlog::logfile::LOG_UPDATED;
use ddlog::RunConfig;

fn main() {
    // Parse command line arguments; malformed input gets the full help text
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let show_help = !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
            let _ = e.print();
            if show_help {
                let _ = Cli::command().print_help();
            }
            std::process::exit(e.exit_code());
        }
    };

    // Initialize logging; RUST_LOG overrides the default level
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match RunConfig::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match run(&config) {
        Ok(outcome) if outcome.written => println!("{}", LOG_UPDATED),
        Ok(outcome) => print!("{}", outcome.entry),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
