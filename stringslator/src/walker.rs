//! Locating resource folders inside application bundles.
//!
//! A bundle looks like `App.app/Contents/Resources/<lang>.lproj/<name>.strings`.
//! Callers may point at the bundle, its `Contents`, its `Resources`, or (in
//! recursive mode) any ancestor directory.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use ignore::WalkBuilder;
use tracing::warn;

use crate::error::Error;

pub const CONTENTS_DIR: &str = "Contents";
pub const RESOURCES_DIR: &str = "Resources";

/// Computes the `Resources` directory for any bundle path.
///
/// Returns `None` when the computed directory does not exist, which means the
/// path should be skipped.
pub fn resources_root(path: &Path) -> Option<PathBuf> {
    let candidate = match path.file_name().and_then(|name| name.to_str()) {
        Some(RESOURCES_DIR) => path.to_path_buf(),
        Some(CONTENTS_DIR) => path.join(RESOURCES_DIR),
        _ => path.join(CONTENTS_DIR).join(RESOURCES_DIR),
    };
    candidate.exists().then_some(candidate)
}

/// Walks up from a resources root past every `Contents` and `Resources`
/// directory. The result is absolute and lexically normalized.
pub fn app_root(resources: &Path) -> Result<PathBuf, Error> {
    let mut dir = absolute_path(resources)?;
    while matches!(
        dir.file_name().and_then(|name| name.to_str()),
        Some(CONTENTS_DIR | RESOURCES_DIR)
    ) {
        if !dir.pop() {
            break;
        }
    }
    Ok(dir)
}

/// Makes `path` absolute and resolves `.` and `..` without touching the
/// filesystem, so it also works for directories that no longer exist.
pub fn absolute_path(path: &Path) -> Result<PathBuf, Error> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Lists the entries of `dir` whose extension ends with `extension`.
///
/// Yields `(name without extension, full path)` for one directory level, in
/// no particular order.
pub fn enumerate_with_ext(dir: &Path, extension: &str) -> Result<Vec<(String, PathBuf)>, Error> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.ends_with(extension));
        if !matches {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            found.push((stem.to_string(), path.clone()));
        }
    }
    Ok(found)
}

/// Finds the application paths to ingest for `path`.
///
/// Non-recursive mode returns `path` unchanged. Recursive mode walks the tree
/// below `path` and returns every `Contents` directory that has a `Resources`
/// subdirectory. Unreadable directories are skipped with a warning.
pub fn discover_app_roots(path: &Path, recursive: bool) -> Vec<PathBuf> {
    if !recursive {
        return vec![path.to_path_buf()];
    }

    let walker = WalkBuilder::new(path)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut roots = Vec::new();
    for dent in walker {
        let dent = match dent {
            Ok(d) => d,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !dent.file_type().is_some_and(|t| t.is_dir()) {
            continue;
        }
        if dent.file_name() == CONTENTS_DIR && dent.path().join(RESOURCES_DIR).is_dir() {
            roots.push(dent.into_path());
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bundle(root: &Path, name: &str) -> PathBuf {
        let app = root.join(name);
        fs::create_dir_all(app.join("Contents/Resources/en.lproj")).unwrap();
        app
    }

    #[test]
    fn test_resources_root_variants() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_bundle(dir.path(), "Demo.app");
        let resources = app.join("Contents/Resources");

        assert_eq!(resources_root(&app), Some(resources.clone()));
        assert_eq!(resources_root(&app.join("Contents")), Some(resources.clone()));
        assert_eq!(resources_root(&resources), Some(resources.clone()));
        assert_eq!(resources_root(&dir.path().join("Missing.app")), None);
        assert_eq!(resources_root(dir.path()), None);
    }

    #[test]
    fn test_app_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_bundle(dir.path(), "Demo.app");
        let expected = absolute_path(&app).unwrap();
        assert_eq!(app_root(&app.join("Contents/Resources")).unwrap(), expected);
        assert_eq!(app_root(&app.join("Contents")).unwrap(), expected);
        assert_eq!(app_root(&app).unwrap(), expected);
    }

    #[test]
    fn test_absolute_path_normalizes() {
        let base = std::env::current_dir().unwrap();
        assert_eq!(absolute_path(Path::new("a/./b/../c")).unwrap(), base.join("a/c"));
        assert_eq!(
            absolute_path(Path::new("/x/y/../z")).unwrap(),
            PathBuf::from("/x/z")
        );
    }

    #[test]
    fn test_enumerate_with_ext() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path();
        fs::create_dir(res.join("en.lproj")).unwrap();
        fs::create_dir(res.join("de.lproj")).unwrap();
        fs::create_dir(res.join("Base.lproj")).unwrap();
        fs::write(res.join("icon.png"), b"").unwrap();
        fs::write(res.join(".lproj"), b"").unwrap();

        let mut found = enumerate_with_ext(res, "lproj").unwrap();
        found.sort();
        let names: Vec<_> = found.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Base", "de", "en"]);
        assert_eq!(found[1].1, res.join("de.lproj"));
    }

    #[test]
    fn test_enumerate_keeps_inner_dots() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Main.v2.strings"), b"").unwrap();
        let found = enumerate_with_ext(dir.path(), "strings").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "Main.v2");
    }

    #[test]
    fn test_discover_app_roots() {
        let dir = tempfile::tempdir().unwrap();
        make_bundle(dir.path(), "One.app");
        make_bundle(&dir.path().join("nested"), "Two.app");
        fs::create_dir_all(dir.path().join("Empty.app/Contents")).unwrap();

        let roots = discover_app_roots(dir.path(), true);
        assert_eq!(
            roots,
            vec![
                dir.path().join("One.app/Contents"),
                dir.path().join("nested/Two.app/Contents"),
            ]
        );

        let single = discover_app_roots(dir.path(), false);
        assert_eq!(single, vec![dir.path().to_path_buf()]);
    }
}
