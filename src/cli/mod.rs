//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments
//! - toggle: Toggle command arguments
//! - list: List command arguments
//! - update: Update command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod list;
pub mod toggle;
pub mod uninstall;
pub mod update;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use toggle::ToggleArgs;
pub use uninstall::UninstallArgs;
pub use update::UpdateArgs;

/// userChrome loader - stylesheet bundle manager
///
/// Install, toggle and remove userChrome.css bundles in a browser profile.
#[derive(Parser, Debug)]
#[command(
    name = "ucl",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Stylesheet bundle manager for browser profiles",
    long_about = "ucl installs userChrome.css bundles from local files, archives, GitHub, GitLab \
                  or plain URLs into a profile's chrome directory and manages their @import lines.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  ucl install ./theme.zip                      \x1b[90m# Install a local archive\x1b[0m\n   \
                  ucl install https://github.com/owner/repo    \x1b[90m# Install a GitHub repository\x1b[0m\n   \
                  ucl toggle theme/userChrome.css              \x1b[90m# Disable or enable an import\x1b[0m\n   \
                  ucl uninstall theme/userChrome.css           \x1b[90m# Remove an import and its files\x1b[0m\n   \
                  ucl list --bundles                           \x1b[90m# Show imports and bundles\x1b[0m\n   \
                  ucl update --check                           \x1b[90m# Look for updates\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Browser profile directory
    #[arg(long, short = 'p', global = true, env = "UCL_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Registry file (defaults to the user data directory)
    #[arg(long, global = true, env = "UCL_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a bundle from a file, directory, archive or URL
    Install(InstallArgs),

    /// Remove an import, and the bundle files once nothing uses them
    Uninstall(UninstallArgs),

    /// Enable or disable imports
    Toggle(ToggleArgs),

    /// List imports and installed bundles
    List(ListArgs),

    /// Check for and apply bundle updates
    Update(UpdateArgs),

    /// Back up userChrome.css
    Backup,

    /// Restore userChrome.css from its backup
    Restore {
        /// Delete the backup once restored
        #[arg(long)]
        discard: bool,
    },

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
