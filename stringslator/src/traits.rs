//! Traits for format-agnostic parsing of string-resource files.

use std::{fs, path::Path};

use crate::{encoding::TextEncoding, error::Error};

/// A trait for parsing one string-resource file into a lazy sequence of pairs.
///
/// # Example
///
/// ```rust,no_run
/// use stringslator::traits::Parser;
/// let format = stringslator::formats::strings::Format::read_from("en.lproj/Main.strings")?;
/// for pair in format {
///     println!("{} = {}", pair.key, pair.value);
/// }
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from already decoded text.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from raw bytes, decoding them according to their byte-order mark.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let text = TextEncoding::detect(bytes).decode(bytes)?;
        Self::from_str(&text)
    }

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
