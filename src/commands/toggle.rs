//! Toggle command implementation

use console::Style;

use crate::cli::ToggleArgs;
use crate::config::Settings;
use crate::error::{LoaderError, Result};
use crate::installer::ModInstaller;

/// Run toggle command
pub fn run(settings: &Settings, args: ToggleArgs) -> Result<()> {
    let profile = settings.profile()?;
    let registry = settings.registry();
    let installer = ModInstaller::new(&profile, &registry);

    if let [directive] = args.directives.as_slice() {
        let enabled = installer.toggle(directive)?;
        let state = if enabled {
            Style::new().green().bold().apply_to("Enabled")
        } else {
            Style::new().yellow().bold().apply_to("Disabled")
        };
        println!("{state} {directive}");
        return Ok(());
    }

    let summary = installer.toggle_many(&args.directives)?;
    println!(
        "Toggled {} of {} import(s)",
        summary.succeeded,
        args.directives.len()
    );
    for missing in &summary.missing {
        println!("  {} {missing}", Style::new().yellow().apply_to("not found:"));
    }
    for commented in &summary.in_comment {
        println!(
            "  {} {commented}",
            Style::new().yellow().apply_to("inside a comment:")
        );
    }

    if summary.succeeded > 0 {
        return Ok(());
    }
    match (summary.missing.first(), summary.in_comment.first()) {
        (Some(first), _) => Err(LoaderError::DirectiveNotFound {
            path: first.clone(),
        }),
        (None, Some(first)) => Err(LoaderError::DirectiveInComment {
            path: first.clone(),
        }),
        (None, None) => Ok(()),
    }
}
