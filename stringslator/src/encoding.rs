//! Byte-order-mark based text encoding detection.
//!
//! String-resource files carry no encoding metadata; Apple tooling writes
//! them as UTF-8 or UTF-16 with a BOM, occasionally UTF-32. The BOM is the
//! only signal used. Without one, content is assumed to be UTF-8.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Error;

/// Text encodings recognized from a byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf32Be,
    Utf32Le,
    Utf16Be,
    Utf16Le,
    Utf8,
}

/// Marks in match order. 4-byte marks come first so that the UTF-16-LE mark
/// (`FF FE`) is not mistaken for the start of a UTF-32-LE mark (`FF FE 00 00`).
const BOMS: [(&[u8], TextEncoding); 5] = [
    (&[0x00, 0x00, 0xFE, 0xFF], TextEncoding::Utf32Be),
    (&[0xFF, 0xFE, 0x00, 0x00], TextEncoding::Utf32Le),
    (&[0xFE, 0xFF], TextEncoding::Utf16Be),
    (&[0xFF, 0xFE], TextEncoding::Utf16Le),
    (&[0xEF, 0xBB, 0xBF], TextEncoding::Utf8),
];

impl TextEncoding {
    /// Detects the encoding from the leading bytes of some content.
    ///
    /// Only the first 4 bytes are inspected. Falls back to UTF-8.
    pub fn detect(header: &[u8]) -> Self {
        let header = &header[..header.len().min(4)];
        BOMS.iter()
            .find(|(bom, _)| header.starts_with(bom))
            .map(|(_, encoding)| *encoding)
            .unwrap_or(TextEncoding::Utf8)
    }

    /// Reads the first 4 bytes of a file and detects its encoding.
    pub fn detect_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut header = Vec::with_capacity(4);
        File::open(path)?.take(4).read_to_end(&mut header)?;
        Ok(Self::detect(&header))
    }

    /// The byte-order mark for this encoding.
    pub fn bom(self) -> &'static [u8] {
        BOMS.iter()
            .find(|(_, encoding)| *encoding == self)
            .map(|(bom, _)| *bom)
            .unwrap_or_default()
    }

    /// Lowercase label, e.g. `utf-16-le`.
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf32Be => "utf-32-be",
            TextEncoding::Utf32Le => "utf-32-le",
            TextEncoding::Utf16Be => "utf-16-be",
            TextEncoding::Utf16Le => "utf-16-le",
            TextEncoding::Utf8 => "utf-8",
        }
    }

    /// Decodes `bytes` strictly, dropping a leading byte-order mark if present.
    ///
    /// Malformed sequences are an error, never replaced.
    pub fn decode(self, bytes: &[u8]) -> Result<String, Error> {
        let body = bytes.strip_prefix(self.bom()).unwrap_or(bytes);
        let decoded = match self {
            TextEncoding::Utf8 => encoding_rs::UTF_8
                .decode_without_bom_handling_and_without_replacement(body)
                .map(|text| text.into_owned()),
            TextEncoding::Utf16Le => encoding_rs::UTF_16LE
                .decode_without_bom_handling_and_without_replacement(body)
                .map(|text| text.into_owned()),
            TextEncoding::Utf16Be => encoding_rs::UTF_16BE
                .decode_without_bom_handling_and_without_replacement(body)
                .map(|text| text.into_owned()),
            TextEncoding::Utf32Le => decode_utf32(body, u32::from_le_bytes),
            TextEncoding::Utf32Be => decode_utf32(body, u32::from_be_bytes),
        };
        decoded.ok_or_else(|| Error::decode_error(self.label(), "malformed byte sequence"))
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// encoding_rs has no UTF-32 decoder.
fn decode_utf32(body: &[u8], to_u32: fn([u8; 4]) -> u32) -> Option<String> {
    let chunks = body.chunks_exact(4);
    if !chunks.remainder().is_empty() {
        return None;
    }
    chunks
        .map(|chunk| {
            let unit = [chunk[0], chunk[1], chunk[2], chunk[3]];
            char::from_u32(to_u32(unit))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn utf16be(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_be_bytes).collect()
    }

    #[test]
    fn test_detect_all_marks() {
        assert_eq!(TextEncoding::detect(&[0x00, 0x00, 0xFE, 0xFF]), TextEncoding::Utf32Be);
        assert_eq!(TextEncoding::detect(&[0xFF, 0xFE, 0x00, 0x00]), TextEncoding::Utf32Le);
        assert_eq!(TextEncoding::detect(&[0xFE, 0xFF, 0x00, 0x22]), TextEncoding::Utf16Be);
        assert_eq!(TextEncoding::detect(&[0xFF, 0xFE, 0x22, 0x00]), TextEncoding::Utf16Le);
        assert_eq!(TextEncoding::detect(&[0xEF, 0xBB, 0xBF, b'"']), TextEncoding::Utf8);
    }

    #[test]
    fn test_detect_defaults_to_utf8() {
        assert_eq!(TextEncoding::detect(b"\"a\" = \"b\";"), TextEncoding::Utf8);
        assert_eq!(TextEncoding::detect(&[]), TextEncoding::Utf8);
        assert_eq!(TextEncoding::detect(&[0xFF]), TextEncoding::Utf8);
    }

    #[test]
    fn test_detect_only_looks_at_header() {
        let mut bytes = b"abcd".to_vec();
        bytes.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        assert_eq!(TextEncoding::detect(&bytes), TextEncoding::Utf8);
        assert_eq!(TextEncoding::detect(&[0x41, 0xFF, 0xFE]), TextEncoding::Utf8);
    }

    #[test]
    fn test_decode_utf16le_with_utf8_lookalike_bytes() {
        let mut bytes = vec![0xFF, 0xFE];
        // "ï»¿" encodes as EF 00 BB 00 BF 00, bytes that resemble the UTF-8 mark.
        bytes.extend(utf16le("\"k\" = \"ï»¿\";"));
        let encoding = TextEncoding::detect(&bytes);
        assert_eq!(encoding, TextEncoding::Utf16Le);
        assert_eq!(encoding.decode(&bytes).unwrap(), "\"k\" = \"ï»¿\";");
    }

    #[test]
    fn test_decode_utf16be() {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(utf16be("Grüße"));
        assert_eq!(TextEncoding::detect(&bytes).decode(&bytes).unwrap(), "Grüße");
    }

    #[test]
    fn test_decode_utf32_both_orders() {
        let mut le = vec![0xFF, 0xFE, 0x00, 0x00];
        let mut be = vec![0x00, 0x00, 0xFE, 0xFF];
        for c in "a€😀".chars() {
            le.extend((c as u32).to_le_bytes());
            be.extend((c as u32).to_be_bytes());
        }
        assert_eq!(TextEncoding::detect(&le).decode(&le).unwrap(), "a€😀");
        assert_eq!(TextEncoding::detect(&be).decode(&be).unwrap(), "a€😀");
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let bytes = [0xEF, 0xBB, 0xBF, b'h', b'i'];
        assert_eq!(TextEncoding::detect(&bytes).decode(&bytes).unwrap(), "hi");
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        let err = TextEncoding::Utf8.decode(&[0x22, 0xC3, 0x28]).unwrap_err();
        assert!(err.to_string().contains("utf-8"));
        assert!(TextEncoding::Utf32Le.decode(&[0xFF, 0xFE, 0x00, 0x00, 0x41]).is_err());
        assert!(TextEncoding::Utf16Le.decode(&[0xFF, 0xFE, 0x00, 0xD8]).is_err());
    }

    #[test]
    fn test_detect_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Localizable.strings");
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(utf16le("\"a\" = \"b\";"));
        std::fs::write(&path, &bytes).unwrap();
        assert_eq!(TextEncoding::detect_file(&path).unwrap(), TextEncoding::Utf16Le);
    }
}
