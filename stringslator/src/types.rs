//! Row and outcome types exchanged between the catalog and its callers.
//!
//! Every query returns its own row type so that callers never have to guess
//! the shape of a result from its arity.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use serde::Serialize;

/// A single key/value pair read from a string-resource file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Pair {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<(String, String)> for Pair {
    fn from((key, value): (String, String)) -> Self {
        Pair { key, value }
    }
}

/// A cataloged application (`_file` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    pub id: i64,
    pub name: String,
    pub dir: String,
}

/// An `(id, name)` row of a file, component or language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRow {
    pub id: i64,
    pub name: String,
}

/// One localized string (`_trans` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRow {
    pub file_id: i64,
    pub component_id: i64,
    pub language_id: i64,
    pub key: String,
    pub value: String,
}

/// A distinct key of some component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleRow {
    pub component_id: i64,
    pub key: String,
}

/// The value of one key in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub language: String,
    pub value: String,
}

/// Summary counts of one cataloged application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Number of distinct languages with at least one translation.
    pub languages: usize,
    /// Largest number of translations found in any single language.
    pub translations: usize,
    /// Total number of translation rows.
    pub total: usize,
}

/// Everything `info` reports about one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub file: FileRow,
    pub components: Vec<NamedRow>,
    pub counts: Counts,
}

/// The entity kinds that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    File,
    Component,
    Language,
}

impl EntityKind {
    /// Physical table name in the catalog.
    pub(crate) fn table(self) -> &'static str {
        match self {
            EntityKind::File => "_file",
            EntityKind::Component => "_comp",
            EntityKind::Language => "_lang",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::File => write!(f, "file"),
            EntityKind::Component => write!(f, "component"),
            EntityKind::Language => write!(f, "language"),
        }
    }
}

/// Optional filter for [`crate::Catalog::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    /// Exact row id.
    Id(i64),
    /// Substring of the name (SQL `LIKE` wildcards `%` and `_` are honored).
    Name(String),
}

impl FromStr for ListFilter {
    type Err = std::convert::Infallible;

    /// An all-digit term is an id, anything else a name substring.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match parse_row_id(s) {
            Some(id) => ListFilter::Id(id),
            None => ListFilter::Name(s.to_string()),
        })
    }
}

/// What a delete operation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// A single file row id.
    Id(i64),
    /// An application directory (exact, or as a prefix when recursive).
    Path(PathBuf),
}

impl FromStr for DeleteTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match parse_row_id(s) {
            Some(id) => DeleteTarget::Id(id),
            None => DeleteTarget::Path(PathBuf::from(s)),
        })
    }
}

fn parse_row_id(s: &str) -> Option<i64> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// How [`crate::Catalog::search`] matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Match translation values, optionally only in languages whose name
    /// matches one of the given `LIKE` patterns. An empty list means all languages.
    Values { languages: Vec<String> },
    /// Match keys in every language.
    Keys,
}

/// Which id `info` was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoTarget {
    File(i64),
    Component(i64),
}

/// The result of ingesting one application root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
    /// Translations were committed.
    Added {
        file_id: i64,
        name: String,
        translations: usize,
        languages: usize,
    },
    /// The application is already cataloged; nothing was scanned.
    SkippedExisting { name: String },
    /// Too few translations or languages to keep; everything was rolled back.
    SkippedEmpty { name: String },
    /// The path has no resources folder.
    SkippedInvalidPath { path: PathBuf },
}

impl Display for AddOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddOutcome::Added {
                file_id,
                name,
                translations,
                languages,
            } => write!(
                f,
                "added id {} '{}' ({} strings, {} languages)",
                file_id, name, translations, languages
            ),
            AddOutcome::SkippedExisting { name } => write!(f, "skip existing. '{}'", name),
            AddOutcome::SkippedEmpty { name } => write!(f, "ignored, empty. '{}'", name),
            AddOutcome::SkippedInvalidPath { path } => {
                write!(f, "'{}' has no 'Resources' folder.", path.display())
            }
        }
    }
}

/// A file removed (or staged for removal) by a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedFile {
    pub id: i64,
    pub name: String,
    /// Number of translation rows removed with it.
    pub translations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filter_from_str() {
        assert_eq!("42".parse::<ListFilter>().unwrap(), ListFilter::Id(42));
        assert_eq!(
            "Finder".parse::<ListFilter>().unwrap(),
            ListFilter::Name("Finder".to_string())
        );
        assert_eq!(
            "-1".parse::<ListFilter>().unwrap(),
            ListFilter::Name("-1".to_string())
        );
    }

    #[test]
    fn test_delete_target_from_str() {
        assert_eq!("7".parse::<DeleteTarget>().unwrap(), DeleteTarget::Id(7));
        assert_eq!(
            "/Applications/Safari.app".parse::<DeleteTarget>().unwrap(),
            DeleteTarget::Path(PathBuf::from("/Applications/Safari.app"))
        );
        // Too large for a row id, so it can only be a path.
        assert!(matches!(
            "99999999999999999999".parse::<DeleteTarget>().unwrap(),
            DeleteTarget::Path(_)
        ));
    }

    #[test]
    fn test_add_outcome_display() {
        let added = AddOutcome::Added {
            file_id: 3,
            name: "Mail.app".to_string(),
            translations: 120,
            languages: 4,
        };
        assert_eq!(added.to_string(), "added id 3 'Mail.app' (120 strings, 4 languages)");
        let skipped = AddOutcome::SkippedExisting {
            name: "Mail.app".to_string(),
        };
        assert_eq!(skipped.to_string(), "skip existing. 'Mail.app'");
    }
}
