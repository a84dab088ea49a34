use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install a single stylesheet:\n    ucl install ./tabs.css\n\n\
                  Install a directory of stylesheets:\n    ucl install ./my-theme\n\n\
                  Install an archive under a chosen name:\n    ucl install ./theme.zip --name dark\n\n\
                  Install from GitHub:\n    ucl install https://github.com/owner/repo/tree/main\n\n\
                  Install one file from GitLab:\n    ucl install https://gitlab.com/group/project/-/blob/main/tabs.css")]
pub struct InstallArgs {
    /// Local path or http(s) URL
    pub source: String,

    /// Bundle name (defaults to the repository, project or file name)
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}
