//! Command implementations for the ucl CLI

pub mod backup;
pub mod completions;
pub mod install;
pub mod list;
pub mod toggle;
pub mod uninstall;
pub mod update;
pub mod version;

use console::Style;

use crate::operations::OperationOutcome;

/// Print one outcome line per operation; returns whether all succeeded
pub(crate) fn report(outcomes: &[(String, OperationOutcome)]) -> bool {
    let ok = Style::new().green().bold();
    let failed = Style::new().red().bold();
    for (subject, outcome) in outcomes {
        if outcome.success {
            println!("  {} {subject}: {}", ok.apply_to("✓"), outcome.message);
        } else {
            println!("  {} {subject}: {}", failed.apply_to("✗"), outcome.message);
        }
    }
    outcomes.iter().all(|(_, outcome)| outcome.success)
}
