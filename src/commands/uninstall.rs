//! Uninstall command implementation

use console::Style;
use inquire::Confirm;

use crate::cli::UninstallArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::installer::{ModInstaller, UninstallOutcome};

/// Run uninstall command
pub fn run(settings: &Settings, args: UninstallArgs) -> Result<()> {
    let profile = settings.profile()?;
    let registry = settings.registry();

    if !args.yes && !confirm(&args.directive)? {
        println!("Uninstall cancelled.");
        return Ok(());
    }

    let outcome = ModInstaller::new(&profile, &registry).uninstall(&args.directive)?;
    let green = Style::new().green().bold();
    match outcome {
        UninstallOutcome::Purged { namespace, bundle } => {
            println!("{} {}", green.apply_to("Removed"), args.directive);
            match bundle {
                Some(name) => println!("  Deleted bundle {name} ({namespace})"),
                None => println!("  No registered bundle for {namespace}"),
            }
        }
        UninstallOutcome::Retained {
            namespace,
            remaining,
        } => {
            println!("{} {}", green.apply_to("Removed"), args.directive);
            println!("  Kept {namespace}: still used by {remaining} import(s)");
        }
    }
    Ok(())
}

fn confirm(directive: &str) -> Result<bool> {
    Ok(Confirm::new(&format!("Remove import '{directive}'?"))
        .with_default(true)
        .with_help_message("Bundle files are deleted once no import uses them")
        .prompt()?)
}
