use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    ucl completions --shell bash > ~/.bash_completion.d/ucl\n\n\
                  Generate zsh completions:\n    ucl completions --shell zsh > ~/.zfunc/_ucl\n\n\
                  Generate fish completions:\n    ucl completions --shell fish > ~/.config/fish/completions/ucl.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, short = 's', value_enum, ignore_case = true)]
    pub shell: Shell,
}
