//! All error types for the stringslator crate.
//!
//! These are returned from all fallible operations (decoding, parsing, catalog access, etc.).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The content is not in the format the parser expects.
    ///
    /// This is the only error the dual-format reader recovers from.
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("cannot decode content as {encoding}: {message}")]
    Decode {
        encoding: &'static str,
        message: String,
    },

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("property list error: {0}")]
    Plist(#[from] ::plist::Error),

    #[error("couldn't read strings file `{}`: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attaches the path of the offending string-resource file.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Creates a new decode error for the given encoding label.
    pub fn decode_error(encoding: &'static str, message: impl Into<String>) -> Self {
        Error::Decode {
            encoding,
            message: message.into(),
        }
    }

    /// Returns `true` if this is the recoverable "format not recognized" outcome.
    pub fn is_unknown_format(&self) -> bool {
        matches!(self, Error::UnknownFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("plist".to_string());
        assert_eq!(error.to_string(), "unknown format `plist`");
        assert!(error.is_unknown_format());
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
        assert!(!error.is_unknown_format());
    }

    #[test]
    fn test_decode_error() {
        let error = Error::decode_error("utf-8", "invalid byte sequence");
        assert_eq!(
            error.to_string(),
            "cannot decode content as utf-8: invalid byte sequence"
        );
    }

    #[test]
    fn test_file_error_names_path() {
        let error = Error::InvalidResource("unterminated dict".to_string())
            .in_file("/tmp/App.app/Contents/Resources/en.lproj/Main.strings");
        let display = error.to_string();
        assert!(display.contains("en.lproj/Main.strings"));
        assert!(display.contains("unterminated dict"));
        assert!(!error.is_unknown_format());
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidResource("array values are not supported".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidResource"));
    }
}
