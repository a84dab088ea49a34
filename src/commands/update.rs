//! Update command implementation

use console::Style;

use crate::cli::UpdateArgs;
use crate::config::Settings;
use crate::error::{LoaderError, Result};
use crate::fetch::HttpFetcher;
use crate::operations::{OperationOutcome, UpdateOperation, UpdateStatus};
use crate::progress::Spinner;

/// Run update command
pub fn run(settings: &Settings, args: UpdateArgs) -> Result<()> {
    let profile = settings.profile()?;
    let registry = settings.registry();
    let fetcher = HttpFetcher::new()?;
    let operation = UpdateOperation::new(&profile, &registry, &fetcher);

    let spinner = Spinner::start("Checking for updates");
    let statuses = match args.name {
        Some(ref name) => {
            let meta = registry
                .get(name)?
                .ok_or_else(|| LoaderError::BundleNotFound { name: name.clone() })?;
            vec![operation.check(&meta)]
        }
        None => operation.check_for_updates()?,
    };
    spinner.finish();

    if statuses.is_empty() {
        println!("No bundles installed.");
        return Ok(());
    }

    if args.check {
        for status in &statuses {
            display_status(status);
        }
        return Ok(());
    }

    let pending: Vec<&UpdateStatus> = statuses.iter().filter(|s| s.has_update).collect();
    if pending.is_empty() {
        println!("All bundles are up to date.");
        return Ok(());
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    for status in pending {
        let spinner = Spinner::start(format!("Updating {}", status.name));
        let outcome = OperationOutcome::from_result(operation.apply_update(&status.name), |meta| {
            meta.as_ref().map_or_else(
                || "already up to date".to_string(),
                |m| format!("updated to {}", m.display_version()),
            )
        });
        spinner.finish();
        outcomes.push((status.name.clone(), outcome));
    }

    if !super::report(&outcomes) {
        std::process::exit(1);
    }
    Ok(())
}

fn display_status(status: &UpdateStatus) {
    let marker = if status.has_update {
        Style::new().cyan().bold().apply_to("update")
    } else {
        Style::new().dim().apply_to("  --  ")
    };
    println!("  [{marker}] {}: {}", status.name, status.message);
}
