use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List imports:\n    ucl list\n\n\
                  Also list installed bundles:\n    ucl list --bundles")]
pub struct ListArgs {
    /// Also show the installed bundle registry
    #[arg(long, short = 'b')]
    pub bundles: bool,
}
