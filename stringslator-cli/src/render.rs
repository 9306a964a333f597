//! Plain-text and JSON renderings of query results.

use serde::Serialize;
use stringslator::{DeletedFile, ExportRow, FileInfo, NamedRow, TitleRow, TranslationRow};

pub const NOTHING_FOUND: &str = "Nothing found.";

fn with_total(lines: Vec<String>) -> String {
    if lines.is_empty() {
        return NOTHING_FOUND.to_string();
    }
    let total = lines.len();
    format!("{}\n\n{} results.", lines.join("\n"), total)
}

/// `id | name` rows of a list query.
pub fn render_named_rows(rows: &[NamedRow]) -> String {
    with_total(rows.iter().map(|row| format!("{:>5} | {}", row.id, row.name)).collect())
}

/// `component | key` rows of a file's keys.
pub fn render_titles(rows: &[TitleRow]) -> String {
    with_total(
        rows.iter()
            .map(|row| format!("{:>5} | {}", row.component_id, row.key))
            .collect(),
    )
}

/// Search hits, one line each, with line breaks in values shown as `\n`.
pub fn render_translations(rows: &[TranslationRow]) -> String {
    with_total(
        rows.iter()
            .map(|row| {
                format!(
                    "{:>5} | {}  ---  ('{}')",
                    row.component_id,
                    row.value.replace('\n', "\\n"),
                    row.key
                )
            })
            .collect(),
    )
}

pub fn render_info(info: &FileInfo) -> String {
    let mut lines = vec![
        "Info for file:".to_string(),
        format!("  id: {}", info.file.id),
        format!("  name: '{}'", info.file.name),
        format!("  path: '{}'", info.file.dir),
        "components:".to_string(),
    ];
    if info.components.is_empty() {
        lines.push(format!("  {}", NOTHING_FOUND));
    }
    for component in &info.components {
        lines.push(format!("{:>5} | {}", component.id, component.name));
    }
    lines.push("localizable strings:".to_string());
    lines.push(format!("   languages: {}", info.counts.languages));
    lines.push(format!("   translations: {}", info.counts.translations));
    lines.push(format!("   total: {}", info.counts.total));
    lines.join("\n")
}

/// `language|value` records. Values holding the delimiter, quotes or line
/// breaks are quoted.
pub fn render_export_csv(rows: &[ExportRow]) -> Result<String, String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .from_writer(Vec::new());
    for row in rows {
        writer
            .write_record([row.language.as_str(), row.value.as_str()])
            .map_err(|e| format!("Failed to write export row: {}", e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| format!("Failed to finish export: {}", e))?;
    let text = String::from_utf8(bytes).map_err(|e| format!("Export is not valid UTF-8: {}", e))?;
    Ok(text.trim_end_matches('\n').to_string())
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize JSON: {}", e))
}

/// The files a delete is about to remove, sorted by name.
pub fn render_deleting(files: &[DeletedFile]) -> String {
    let mut names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
    names.sort_unstable();
    let mut lines = vec!["Deleting:".to_string()];
    lines.extend(names.into_iter().map(|name| format!("  - {}", name)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringslator::{Counts, FileRow};

    #[test]
    fn test_empty_results() {
        assert_eq!(render_named_rows(&[]), NOTHING_FOUND);
        assert_eq!(render_titles(&[]), NOTHING_FOUND);
        assert_eq!(render_translations(&[]), NOTHING_FOUND);
    }

    #[test]
    fn test_named_rows() {
        let rows = vec![
            NamedRow { id: 3, name: "de".to_string() },
            NamedRow { id: 12, name: "en".to_string() },
        ];
        assert_eq!(render_named_rows(&rows), "    3 | de\n   12 | en\n\n2 results.");
    }

    #[test]
    fn test_translation_newlines_are_escaped() {
        let rows = vec![TranslationRow {
            file_id: 1,
            component_id: 7,
            language_id: 2,
            key: "greeting".to_string(),
            value: "Hello\nWorld".to_string(),
        }];
        assert_eq!(
            render_translations(&rows),
            "    7 | Hello\\nWorld  ---  ('greeting')\n\n1 results."
        );
    }

    #[test]
    fn test_export_csv_quotes_delimiter() {
        let rows = vec![
            ExportRow { language: "de".to_string(), value: "B".to_string() },
            ExportRow { language: "en".to_string(), value: "a|b".to_string() },
        ];
        assert_eq!(render_export_csv(&rows).unwrap(), "de|B\nen|\"a|b\"");
        assert_eq!(render_export_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_info() {
        let info = FileInfo {
            file: FileRow {
                id: 1,
                name: "Demo.app".to_string(),
                dir: "/Applications/Demo.app".to_string(),
            },
            components: vec![NamedRow { id: 4, name: "Tooltips".to_string() }],
            counts: Counts { languages: 2, translations: 1, total: 2 },
        };
        let text = render_info(&info);
        assert!(text.contains("  name: 'Demo.app'"));
        assert!(text.contains("    4 | Tooltips"));
        assert!(text.ends_with("   total: 2"));
    }

    #[test]
    fn test_deleting_is_sorted() {
        let files = vec![
            DeletedFile { id: 2, name: "Zed.app".to_string(), translations: 4 },
            DeletedFile { id: 1, name: "Alpha.app".to_string(), translations: 2 },
        ];
        assert_eq!(render_deleting(&files), "Deleting:\n  - Alpha.app\n  - Zed.app");
    }
}
