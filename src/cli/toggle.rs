use clap::Parser;

/// Arguments for the toggle command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Disable an import:\n    ucl toggle theme/userChrome.css\n\n\
                  Flip several imports at once:\n    ucl toggle tabs.css theme/userChrome.css")]
pub struct ToggleArgs {
    /// Import paths as written in userChrome.css
    #[arg(required = true, num_args = 1..)]
    pub directives: Vec<String>,
}
