//! ucl - userChrome.css bundle manager
//!
//! Installs stylesheet bundles from local files, archives and remote
//! repositories into a browser profile and manages the `@import` lines of
//! its root stylesheet.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod archive;
mod cli;
mod commands;
mod config;
mod directive;
mod domain;
mod error;
mod fetch;
mod hash;
mod installer;
mod operations;
mod path_utils;
mod progress;
mod registry;
mod resolver;
mod source;
mod stylesheet;
mod temp;
mod transaction;

use cli::{Cli, Commands};
use config::Settings;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "UCL_LOG";

/// Log to stderr so command output on stdout stays clean
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Version and completions need no profile or registry
    let result = match cli.command {
        Commands::Version => commands::version::run(),
        Commands::Completions(ref args) => commands::completions::run(args),
        command => Settings::resolve(cli.profile, cli.registry).and_then(|settings| {
            match command {
                Commands::Install(args) => commands::install::run(&settings, args),
                Commands::Uninstall(args) => commands::uninstall::run(&settings, args),
                Commands::Toggle(args) => commands::toggle::run(&settings, args),
                Commands::List(args) => commands::list::run(&settings, args),
                Commands::Update(args) => commands::update::run(&settings, args),
                Commands::Backup => commands::backup::run_backup(&settings),
                Commands::Restore { discard } => commands::backup::run_restore(&settings, discard),
                Commands::Version | Commands::Completions(_) => Ok(()),
            }
        }),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}
