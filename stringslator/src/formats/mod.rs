//! The string-resource formats stringslator reads.
//!
//! A `.strings` file is either a property list ([`plist`], XML or binary) or Apple's
//! source-like assignment format ([`strings`]). [`read_string_pairs`] tries
//! the property list first and falls back to the source format only when the
//! content is not recognized as a property list.

pub mod plist;
pub mod strings;

use std::{fs, path::Path};

// Reexporting the formats for easier access
pub use plist::Format as PlistFormat;
pub use strings::Format as StringsFormat;

use crate::{encoding::TextEncoding, error::Error, traits::Parser, types::Pair};

/// The key/value pairs of one string-resource file, in file order.
///
/// Single pass: the sequence is consumed as it is iterated.
#[derive(Debug)]
pub enum StringPairs {
    Plist(plist::Flatten),
    Strings(strings::Tokens),
}

impl Iterator for StringPairs {
    type Item = Pair;

    fn next(&mut self) -> Option<Pair> {
        match self {
            StringPairs::Plist(pairs) => pairs.next(),
            StringPairs::Strings(pairs) => pairs.next(),
        }
    }
}

/// Parses already decoded text, trying the property-list format first.
///
/// Only [`Error::UnknownFormat`] from the property-list parser triggers the
/// fallback; any other failure is returned as is.
pub fn parse_string_pairs(text: &str) -> Result<StringPairs, Error> {
    match PlistFormat::from_str(text) {
        Ok(format) => Ok(StringPairs::Plist(format.into_iter())),
        Err(Error::UnknownFormat(_)) => {
            Ok(StringPairs::Strings(StringsFormat::from_str(text)?.into_iter()))
        }
        Err(e) => Err(e),
    }
}

/// Reads a string-resource file in either format.
///
/// Every failure is wrapped in [`Error::File`] naming `path`.
pub fn read_string_pairs<P: AsRef<Path>>(path: P) -> Result<StringPairs, Error> {
    let path = path.as_ref();
    let read = || -> Result<StringPairs, Error> {
        let bytes = fs::read(path)?;
        if bytes.starts_with(plist::BINARY_MAGIC) {
            return Ok(StringPairs::Plist(PlistFormat::from_binary(&bytes)?.into_iter()));
        }
        let text = TextEncoding::detect(&bytes).decode(&bytes)?;
        parse_string_pairs(&text)
    };
    read().map_err(|e| e.in_file(path))
}
