//! Backup and restore commands

use console::Style;

use crate::config::Settings;
use crate::error::{Result, file_operation};
use crate::stylesheet::{backup, backup_path, cleanup_backup, restore_backup};

/// Copy userChrome.css to its backup file
pub fn run_backup(settings: &Settings) -> Result<()> {
    let profile = settings.profile()?;
    if !profile.has_root_stylesheet() || !backup(&profile)? {
        println!("No userChrome.css to back up.");
        return Ok(());
    }
    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Backed up to"),
        backup_path(&profile).display()
    );
    Ok(())
}

/// Restore userChrome.css from its backup file, deleting the backup when
/// `discard` is set
pub fn run_restore(settings: &Settings, discard: bool) -> Result<()> {
    let profile = settings.profile()?;
    let path = backup_path(&profile);
    if !restore_backup(&profile)? {
        return Err(file_operation(path.display().to_string(), "no backup found"));
    }
    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Restored from"),
        path.display()
    );
    if discard {
        cleanup_backup(&profile)?;
        println!("  Backup deleted");
    }
    Ok(())
}
