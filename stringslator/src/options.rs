//! Options controlling how bundles are scanned into the catalog.

/// Scan behavior for [`crate::Catalog`] ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Extension of locale directories inside `Resources`.
    pub locale_extension: String,
    /// Extension of string-resource files inside a locale directory.
    pub strings_extension: String,
    /// Applications with fewer languages than this are not kept.
    pub min_languages: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        CatalogOptions {
            locale_extension: "lproj".to_string(),
            strings_extension: "strings".to_string(),
            min_languages: 2,
        }
    }
}

impl CatalogOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the locale directory extension.
    pub fn with_locale_extension(mut self, extension: impl Into<String>) -> Self {
        self.locale_extension = extension.into();
        self
    }

    /// Sets the string-resource file extension.
    pub fn with_strings_extension(mut self, extension: impl Into<String>) -> Self {
        self.strings_extension = extension.into();
        self
    }

    /// Sets the minimum number of languages an application needs to be kept.
    pub fn with_min_languages(mut self, min_languages: usize) -> Self {
        self.min_languages = min_languages;
        self
    }
}
