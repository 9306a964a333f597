#![forbid(unsafe_code)]
//! Catalog the localizable strings of application bundles.
//!
//! stringslator walks `App.app/Contents/Resources/<lang>.lproj/*.strings`,
//! reads every string table (XML or binary property list, or `.strings` source,
//! UTF-8/16/32 detected from the byte-order mark) and stores the translations
//! in an SQLite catalog that can be searched and exported across applications
//! and languages.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use stringslator::{Catalog, SearchMode};
//!
//! let mut catalog = Catalog::open("stringslator.db")?;
//! for (path, outcome) in catalog.add(Path::new("/Applications"), true) {
//!     match outcome {
//!         Ok(outcome) => println!("{}", outcome),
//!         Err(e) => eprintln!("{}: {}", path.display(), e),
//!     }
//! }
//!
//! let mode = SearchMode::Values { languages: vec!["en%".to_string()] };
//! for row in catalog.search("% Update%", &mode)? {
//!     println!("{} | {}", row.component_id, row.value);
//! }
//! # Ok::<(), stringslator::Error>(())
//! ```

pub mod catalog;
pub mod encoding;
pub mod error;
pub mod formats;
pub mod options;
pub mod traits;
pub mod types;
pub mod walker;

// Re-export most used types for easy consumption
pub use crate::{
    catalog::{Catalog, PendingDelete},
    encoding::TextEncoding,
    error::Error,
    formats::{StringPairs, read_string_pairs},
    options::CatalogOptions,
    types::{
        AddOutcome, Counts, DeleteTarget, DeletedFile, EntityKind, ExportRow, FileInfo, FileRow,
        InfoTarget, ListFilter, NamedRow, Pair, SearchMode, TitleRow, TranslationRow,
    },
};
