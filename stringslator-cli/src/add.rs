use std::path::PathBuf;

use stringslator::Catalog;
use tracing::warn;

/// Adds every application found for `paths`.
///
/// Each application is reported on its own line. A failing application does
/// not stop the others, but makes the command fail once all are done.
pub fn run_add_command(catalog: &mut Catalog, paths: &[PathBuf], recursive: bool) -> Result<(), String> {
    let mut failed = 0usize;
    for path in paths {
        let results = catalog.add(path, recursive);
        if results.is_empty() {
            warn!("no applications below '{}'", path.display());
        }
        for (app, result) in results {
            match result {
                Ok(outcome) => println!("{}", outcome),
                Err(e) => {
                    failed += 1;
                    eprintln!("Error adding '{}': {}", app.display(), e);
                }
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} application(s) could not be added", failed));
    }
    Ok(())
}
