//! Read-only queries over the catalog.
//!
//! Patterns use SQL `LIKE` syntax: `%` matches any run of characters, `_` a
//! single character, ASCII letters match case-insensitively.

use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use super::Catalog;
use crate::{
    error::Error,
    types::{
        Counts, EntityKind, ExportRow, FileInfo, FileRow, InfoTarget, ListFilter, NamedRow,
        SearchMode, TitleRow, TranslationRow,
    },
};

impl Catalog {
    /// Finds translations whose value (or key, with [`SearchMode::Keys`])
    /// matches `pattern`.
    pub fn search(&self, pattern: &str, mode: &SearchMode) -> Result<Vec<TranslationRow>, Error> {
        let mut sql = String::from("SELECT fid, cid, lid, key, value FROM _trans WHERE ");
        let mut args: Vec<&str> = vec![pattern];
        match mode {
            SearchMode::Keys => sql.push_str("key LIKE ?"),
            SearchMode::Values { languages } if languages.is_empty() => sql.push_str("value LIKE ?"),
            SearchMode::Values { languages } => {
                let filter = vec!["name LIKE ?"; languages.len()].join(" OR ");
                sql.push_str(&format!(
                    "value LIKE ? AND lid IN (SELECT id FROM _lang WHERE {})",
                    filter
                ));
                args.extend(languages.iter().map(String::as_str));
            }
        }
        sql.push_str(" ORDER BY rowid");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args), |row| {
                Ok(TranslationRow {
                    file_id: row.get(0)?,
                    component_id: row.get(1)?,
                    language_id: row.get(2)?,
                    key: row.get(3)?,
                    value: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Lists files, components or languages, ordered by name ignoring case.
    pub fn list(&self, kind: EntityKind, filter: Option<&ListFilter>) -> Result<Vec<NamedRow>, Error> {
        let table = kind.table();
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<NamedRow> {
            Ok(NamedRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        };
        let rows = match filter {
            None => {
                let sql = format!("SELECT id, name FROM {} ORDER BY name COLLATE NOCASE", table);
                let mut stmt = self.conn.prepare(&sql)?;
                stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?
            }
            Some(ListFilter::Id(id)) => {
                let sql = format!(
                    "SELECT id, name FROM {} WHERE id = ?1 ORDER BY name COLLATE NOCASE",
                    table
                );
                let mut stmt = self.conn.prepare(&sql)?;
                stmt.query_map([id], map_row)?.collect::<Result<Vec<_>, _>>()?
            }
            Some(ListFilter::Name(term)) => {
                let sql = format!(
                    "SELECT id, name FROM {} WHERE name LIKE ?1 ORDER BY name COLLATE NOCASE",
                    table
                );
                let mut stmt = self.conn.prepare(&sql)?;
                stmt.query_map([format!("%{}%", term)], map_row)?
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    /// Lists the distinct `(component, key)` pairs of a file, ordered by key ignoring case.
    pub fn list_titles(&self, file_id: i64) -> Result<Vec<TitleRow>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT cid, key FROM _trans WHERE fid = ?1
             ORDER BY key COLLATE NOCASE, cid",
        )?;
        let rows = stmt
            .query_map([file_id], |row| {
                Ok(TitleRow {
                    component_id: row.get(0)?,
                    key: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Returns every translation of `key` in a component, ordered by language
    /// name ignoring case.
    pub fn export(&self, component_id: i64, key: &str) -> Result<Vec<ExportRow>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT l.name, t.value
             FROM _trans t INNER JOIN _lang l ON l.id = t.lid
             WHERE t.cid = ?1 AND t.key = ?2
             ORDER BY l.name COLLATE NOCASE",
        )?;
        let rows = stmt
            .query_map(params![component_id, key], |row| {
                Ok(ExportRow {
                    language: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Describes a file, given its id or the id of one of its components.
    ///
    /// Returns `None` if no such file exists.
    pub fn info(&self, target: InfoTarget) -> Result<Option<FileInfo>, Error> {
        let file_id = match target {
            InfoTarget::File(id) => id,
            InfoTarget::Component(id) => match file_of_component(&self.conn, id)? {
                Some(file_id) => file_id,
                None => return Ok(None),
            },
        };
        let Some(file) = fetch_file(&self.conn, file_id)? else {
            return Ok(None);
        };
        Ok(Some(FileInfo {
            components: fetch_components(&self.conn, file_id)?,
            counts: fetch_counts(&self.conn, file_id)?,
            file,
        }))
    }
}

pub(super) fn fetch_file(conn: &Connection, file_id: i64) -> Result<Option<FileRow>, Error> {
    let file = conn
        .query_row(
            "SELECT id, name, dir FROM _file WHERE id = ?1",
            [file_id],
            |row| {
                Ok(FileRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    dir: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(file)
}

fn file_of_component(conn: &Connection, component_id: i64) -> Result<Option<i64>, Error> {
    let file_id = conn
        .query_row("SELECT fid FROM _comp WHERE id = ?1", [component_id], |row| row.get(0))
        .optional()?;
    Ok(file_id)
}

fn fetch_components(conn: &Connection, file_id: i64) -> Result<Vec<NamedRow>, Error> {
    let mut stmt = conn.prepare("SELECT id, name FROM _comp WHERE fid = ?1 ORDER BY name")?;
    let rows = stmt
        .query_map([file_id], |row| {
            Ok(NamedRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn fetch_counts(conn: &Connection, file_id: i64) -> Result<Counts, Error> {
    let mut stmt = conn.prepare("SELECT count(*) FROM _trans WHERE fid = ?1 GROUP BY lid")?;
    let per_language = stmt
        .query_map([file_id], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut counts = Counts::default();
    for count in per_language {
        let count = usize::try_from(count).unwrap_or_default();
        counts.languages += 1;
        counts.translations = counts.translations.max(count);
        counts.total += count;
    }
    Ok(counts)
}
