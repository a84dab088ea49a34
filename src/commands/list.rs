//! List command implementation
//!
//! This command lists the imports of userChrome.css with their state and,
//! on request, the installed bundle registry.

use console::Style;

use crate::cli::ListArgs;
use crate::config::Settings;
use crate::directive::list_directives;
use crate::domain::BundleMetadata;
use crate::error::Result;
use crate::registry::ModRegistry;
use crate::stylesheet::read_root;

/// Run list command
pub fn run(settings: &Settings, args: ListArgs) -> Result<()> {
    let profile = settings.profile()?;

    match read_root(&profile)? {
        None => println!("No userChrome.css in {}", profile.root_path.display()),
        Some(text) => {
            let directives = list_directives(&text);
            if directives.is_empty() {
                println!("No imports.");
            } else {
                println!("Imports ({}):", directives.len());
                for directive in &directives {
                    let state = if directive.enabled {
                        Style::new().green().apply_to("on ")
                    } else {
                        Style::new().dim().apply_to("off")
                    };
                    let line = directive
                        .line_number
                        .map_or_else(String::new, |n| format!("(line {n})"));
                    println!(
                        "  [{state}] {} {}",
                        directive.raw_path,
                        Style::new().dim().apply_to(line)
                    );
                }
            }
        }
    }

    if args.bundles {
        println!();
        list_bundles(&settings.registry())?;
    }
    Ok(())
}

fn list_bundles(registry: &ModRegistry) -> Result<()> {
    let bundles = registry.list()?;
    if bundles.is_empty() {
        println!("No bundles installed.");
        return Ok(());
    }

    println!("Installed bundles ({}):", bundles.len());
    for bundle in &bundles {
        display_bundle(bundle);
    }
    Ok(())
}

fn display_bundle(bundle: &BundleMetadata) {
    let bold = Style::new().bold();
    println!("  {}", Style::new().bold().yellow().apply_to(&bundle.name));
    println!("    {} {}", bold.apply_to("Version:"), bundle.display_version());
    if let Some(ref url) = bundle.source_url {
        println!("    {} {url}", bold.apply_to("Source:"));
    } else if let Some(path) = bundle.provenance_str("path") {
        println!("    {} {path}", bold.apply_to("Source:"));
    }
    println!("    {} {}", bold.apply_to("Files:"), bundle.files.len());
    println!(
        "    {} {}",
        bold.apply_to("Installed:"),
        bundle.installed_at.format("%Y-%m-%d %H:%M")
    );
}
