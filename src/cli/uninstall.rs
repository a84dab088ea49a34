use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove a bundle's import:\n    ucl uninstall theme/userChrome.css\n\n\
                  Remove without confirmation:\n    ucl uninstall tabs.css -y")]
pub struct UninstallArgs {
    /// Import path as written in userChrome.css
    pub directive: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}
