use clap::Parser;

/// Arguments for the update command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check every bundle:\n    ucl update --check\n\n\
                  Update every bundle with a newer version:\n    ucl update\n\n\
                  Update one bundle:\n    ucl update dark")]
pub struct UpdateArgs {
    /// Bundle name (all bundles when omitted)
    pub name: Option<String>,

    /// Only report, do not install
    #[arg(long)]
    pub check: bool,
}
