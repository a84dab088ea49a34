//! Install command implementation

use console::Style;

use crate::cli::InstallArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::fetch::HttpFetcher;
use crate::operations::ImportOperation;
use crate::progress::Spinner;

/// Run install command
pub fn run(settings: &Settings, args: InstallArgs) -> Result<()> {
    let profile = settings.profile()?;
    let registry = settings.registry();
    let fetcher = HttpFetcher::new()?;

    let spinner = Spinner::start(format!("Installing {}", args.source));
    let result = ImportOperation::new(&profile, &registry, &fetcher)
        .import(&args.source, args.name.as_deref());
    spinner.finish();
    let meta = result?;

    println!(
        "{} {} ({} file(s), version {})",
        Style::new().green().bold().apply_to("Installed"),
        Style::new().bold().apply_to(&meta.name),
        meta.files.len(),
        meta.display_version()
    );
    Ok(())
}
