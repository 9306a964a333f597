use std::io;

use stringslator::{Catalog, DeleteTarget};

use stringslator_cli::{prompt::ask, render::render_deleting};

/// Deletes the matching applications after confirmation.
///
/// The deletes run first; declining (or closing stdin) rolls them back.
pub fn run_delete_command(
    catalog: &mut Catalog,
    targets: &[DeleteTarget],
    recursive: bool,
    assume_yes: bool,
) -> Result<(), String> {
    let pending = catalog
        .stage_delete(targets, recursive)
        .map_err(|e| format!("Failed to delete: {}", e))?;

    if pending.is_empty() || pending.translations() == 0 {
        pending.rollback().map_err(|e| e.to_string())?;
        println!("Nothing to do.");
        return Ok(());
    }

    println!("{}\n", render_deleting(pending.files()));
    let question = format!("Deleting {} translations. Continue?", pending.translations());
    let confirmed = assume_yes
        || ask(&question, io::stdin().lock(), io::stdout())
            .map_err(|e| format!("Failed to read answer: {}", e))?;

    if confirmed {
        let deleted = pending.commit().map_err(|e| format!("Failed to delete: {}", e))?;
        println!("Deleted {} application(s).", deleted.len());
    } else {
        pending.rollback().map_err(|e| e.to_string())?;
        println!("Nothing deleted.");
    }
    Ok(())
}
