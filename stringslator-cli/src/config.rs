use std::path::{Path, PathBuf};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the catalog file.
pub const DB_ENV: &str = "STRINGSLATOR_DB";

/// Language patterns a value search is limited to unless told otherwise.
pub const DEFAULT_SEARCH_LANGUAGES: [&str; 3] = ["en%", "de%", "Ger%"];

const DB_FILE_NAME: &str = "stringslator.db";

/// The catalog used when neither `--db` nor the environment names one.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("stringslator").join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}

/// Creates the directory the catalog lives in.
pub fn ensure_parent_dir(db_path: &Path) -> Result<(), String> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e)),
        _ => Ok(()),
    }
}

/// Picks the language patterns for a value search.
///
/// Explicit patterns win over the defaults; `all_languages` lifts the
/// restriction entirely.
pub fn search_languages(patterns: Vec<String>, all_languages: bool) -> Vec<String> {
    if all_languages {
        Vec::new()
    } else if patterns.is_empty() {
        DEFAULT_SEARCH_LANGUAGES.iter().map(|p| p.to_string()).collect()
    } else {
        patterns
    }
}

fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the stderr log subscriber.
///
/// `-v` flags take precedence over `RUST_LOG`.
pub fn init_tracing(verbose: u8) {
    let filter = if verbose > 0 {
        EnvFilter::new(verbosity_filter(verbose))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity_filter(0)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
