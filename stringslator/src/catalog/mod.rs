//! The SQLite-backed translation catalog.
//!
//! Four tables hold the catalog: applications (`_file`), their string-resource
//! files (`_comp`), languages (`_lang`, shared by all applications) and the
//! individual translations (`_trans`). Rows are only ever inserted or deleted.
//!
//! Ingesting an application and deleting applications each run in one
//! transaction: ingestion commits all of an application's translations or none
//! of them, and a delete is staged first so the caller can still back out.

mod query;

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use rusqlite::{Connection, OptionalExtension, ToSql, Transaction, params};
use tracing::{debug, info};

use crate::{
    error::Error,
    formats::read_string_pairs,
    options::CatalogOptions,
    types::{AddOutcome, DeleteTarget, DeletedFile, EntityKind, TranslationRow},
    walker,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS _file (
        id integer NOT NULL PRIMARY KEY,
        name text,
        dir text
    );
    CREATE TABLE IF NOT EXISTS _comp (
        id integer NOT NULL PRIMARY KEY,
        fid integer NOT NULL REFERENCES _file(id),
        name text
    );
    CREATE TABLE IF NOT EXISTS _lang (
        id integer NOT NULL PRIMARY KEY,
        name text
    );
    CREATE TABLE IF NOT EXISTS _trans (
        fid integer NOT NULL REFERENCES _file(id),
        cid integer NOT NULL REFERENCES _comp(id),
        lid integer NOT NULL REFERENCES _lang(id),
        key text,
        value text
    );
";

/// A handle on one catalog database.
///
/// Construct it once per process and pass it to every operation.
pub struct Catalog {
    conn: Connection,
    options: CatalogOptions,
}

impl Catalog {
    /// Opens (or creates) the catalog at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a catalog that lives only as long as the handle.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, Error> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Catalog {
            conn,
            options: CatalogOptions::default(),
        })
    }

    /// Replaces the scan options.
    pub fn with_options(mut self, options: CatalogOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    /// Adds every application found for `path`.
    ///
    /// With `recursive`, all bundles below `path` are added; otherwise `path`
    /// itself is. A failing application does not stop the others; each result
    /// is reported next to the path it belongs to.
    pub fn add(&mut self, path: &Path, recursive: bool) -> Vec<(PathBuf, Result<AddOutcome, Error>)> {
        walker::discover_app_roots(path, recursive)
            .into_iter()
            .map(|app| {
                let outcome = self.add_app(&app);
                (app, outcome)
            })
            .collect()
    }

    /// Ingests one application.
    ///
    /// Already cataloged applications are skipped without scanning. The
    /// translations are committed only if there are any and they span at
    /// least [`CatalogOptions::min_languages`] languages; otherwise, and on
    /// any error, every row created for this application is rolled back.
    pub fn add_app(&mut self, path: &Path) -> Result<AddOutcome, Error> {
        let Some(resources) = walker::resources_root(path) else {
            info!("'{}' has no 'Resources' folder", path.display());
            return Ok(AddOutcome::SkippedInvalidPath {
                path: path.to_path_buf(),
            });
        };
        let app = walker::app_root(&resources)?;
        let name = app
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = app.to_string_lossy().into_owned();

        let tx = self.conn.transaction()?;
        let (file_id, existed) = find_or_insert(&tx, EntityKind::File, &["name", "dir"], params![name, dir])?;
        if existed {
            info!("skip existing '{}'", name);
            return Ok(AddOutcome::SkippedExisting { name });
        }

        info!("processing '{}'", name);
        let scan = scan_resources(&tx, &self.options, file_id, &resources)?;

        if scan.translations.is_empty() || scan.languages.len() < self.options.min_languages {
            tx.rollback()?;
            info!("ignored '{}', empty", name);
            return Ok(AddOutcome::SkippedEmpty { name });
        }

        insert_translations(&tx, &scan.translations)?;
        tx.commit()?;
        info!(
            "added id {} '{}' ({} strings, {} languages)",
            file_id,
            name,
            scan.translations.len(),
            scan.languages.len()
        );
        Ok(AddOutcome::Added {
            file_id,
            name,
            translations: scan.translations.len(),
            languages: scan.languages.len(),
        })
    }

    /// Deletes the matching applications without asking, and commits.
    pub fn delete(&mut self, targets: &[DeleteTarget], recursive: bool) -> Result<Vec<DeletedFile>, Error> {
        self.stage_delete(targets, recursive)?.commit()
    }

    /// Runs the deletes for every target inside an open transaction.
    ///
    /// Nothing is final until [`PendingDelete::commit`] is called; dropping the
    /// returned value or calling [`PendingDelete::rollback`] restores all rows.
    /// Path targets are resolved to their application root and matched
    /// exactly, or as a directory prefix with `recursive`. Targets matching
    /// nothing are ignored.
    pub fn stage_delete(&mut self, targets: &[DeleteTarget], recursive: bool) -> Result<PendingDelete<'_>, Error> {
        let tx = self.conn.transaction()?;
        let mut files = Vec::new();
        for target in targets {
            let matched: Vec<(i64, String)> = match target {
                DeleteTarget::Id(id) => query::fetch_file(&tx, *id)?
                    .map(|file| (file.id, file.name))
                    .into_iter()
                    .collect(),
                DeleteTarget::Path(path) => {
                    let dir = walker::app_root(path)?;
                    files_with_dir(&tx, &dir.to_string_lossy(), recursive)?
                }
            };
            for (id, name) in matched {
                let translations = delete_file(&tx, id)?;
                debug!("staged delete of id {} '{}' ({} translations)", id, name, translations);
                files.push(DeletedFile { id, name, translations });
            }
        }
        Ok(PendingDelete { tx, files })
    }
}

/// Deletes that ran but are not committed yet.
pub struct PendingDelete<'a> {
    tx: Transaction<'a>,
    files: Vec<DeletedFile>,
}

impl PendingDelete<'_> {
    /// The files this delete removes.
    pub fn files(&self) -> &[DeletedFile] {
        &self.files
    }

    /// Total number of translation rows this delete removes.
    pub fn translations(&self) -> usize {
        self.files.iter().map(|file| file.translations).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Makes the delete permanent.
    pub fn commit(self) -> Result<Vec<DeletedFile>, Error> {
        self.tx.commit()?;
        Ok(self.files)
    }

    /// Restores every staged row.
    pub fn rollback(self) -> Result<(), Error> {
        self.tx.rollback()?;
        Ok(())
    }
}

/// Returns the id of the row whose `columns` equal `values`, inserting it if absent.
///
/// The flag is `true` if the row existed before.
fn find_or_insert(
    conn: &Connection,
    kind: EntityKind,
    columns: &[&str],
    values: &[&dyn ToSql],
) -> Result<(i64, bool), Error> {
    let table = kind.table();
    let filter = columns
        .iter()
        .map(|name| format!("{} = ?", name))
        .collect::<Vec<_>>()
        .join(" AND ");
    let existing: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {} WHERE {}", table, filter),
            values,
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok((id, true));
    }

    let placeholders = vec!["?"; values.len()].join(",");
    conn.execute(
        &format!("INSERT INTO {}({}) VALUES ({})", table, columns.join(","), placeholders),
        values,
    )?;
    Ok((conn.last_insert_rowid(), false))
}

/// What a walk over one resources folder collected.
struct Scan {
    translations: Vec<TranslationRow>,
    /// Languages that contributed at least one string-resource file.
    languages: HashSet<i64>,
}

fn scan_resources(conn: &Connection, options: &CatalogOptions, file_id: i64, resources: &Path) -> Result<Scan, Error> {
    let mut scan = Scan {
        translations: Vec::new(),
        languages: HashSet::new(),
    };

    let mut locales = walker::enumerate_with_ext(resources, &options.locale_extension)?;
    locales.sort();
    for (language, locale_dir) in locales {
        if !locale_dir.is_dir() {
            continue;
        }
        let (language_id, _) = find_or_insert(conn, EntityKind::Language, &["name"], params![language])?;

        let mut files = walker::enumerate_with_ext(&locale_dir, &options.strings_extension)?;
        files.sort();
        for (component, strings_file) in files {
            if !strings_file.is_file() {
                continue;
            }
            scan.languages.insert(language_id);
            let (component_id, _) =
                find_or_insert(conn, EntityKind::Component, &["fid", "name"], params![file_id, component])?;
            let before = scan.translations.len();
            for pair in read_string_pairs(&strings_file)? {
                scan.translations.push(TranslationRow {
                    file_id,
                    component_id,
                    language_id,
                    key: pair.key,
                    value: pair.value,
                });
            }
            debug!(
                "{}/{}: {} strings",
                language,
                component,
                scan.translations.len() - before
            );
        }
    }
    Ok(scan)
}

fn insert_translations(conn: &Connection, rows: &[TranslationRow]) -> Result<(), Error> {
    let mut stmt = conn.prepare("INSERT INTO _trans (fid, cid, lid, key, value) VALUES (?1, ?2, ?3, ?4, ?5)")?;
    for row in rows {
        stmt.execute(params![row.file_id, row.component_id, row.language_id, row.key, row.value])?;
    }
    Ok(())
}

/// Files whose directory is `dir`, or lies below it when `recursive`.
fn files_with_dir(conn: &Connection, dir: &str, recursive: bool) -> Result<Vec<(i64, String)>, Error> {
    let sql = if recursive {
        "SELECT id, name FROM _file WHERE substr(dir, 1, length(?1)) = ?1 ORDER BY name COLLATE NOCASE"
    } else {
        "SELECT id, name FROM _file WHERE dir = ?1 ORDER BY name COLLATE NOCASE"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([dir], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Removes a file with its components and translations.
///
/// Children go before their parents. Returns the number of translation rows
/// removed.
fn delete_file(conn: &Connection, file_id: i64) -> Result<usize, Error> {
    let translations = conn.execute("DELETE FROM _trans WHERE fid = ?1", [file_id])?;
    conn.execute("DELETE FROM _comp WHERE fid = ?1", [file_id])?;
    conn.execute("DELETE FROM _file WHERE id = ?1", [file_id])?;
    Ok(translations)
}
