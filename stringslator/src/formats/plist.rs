//! Support for property-list string tables.
//!
//! Nested dictionaries are flattened into dot-joined keys, so
//! `<dict><key>Window</key><dict><key>Title</key>...` yields `Window.Title`.
//! The XML flavor is read with an event loop over the decoded text; the
//! binary flavor (`bplist` magic) is decoded by the `plist` crate.

use std::{io::Cursor, vec};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{error::Error, traits::Parser, types::Pair};

/// A parsed property list value, reduced to what a string table can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Any scalar, rendered as text.
    Scalar(String),
    /// A dictionary, in document order.
    Dict(Vec<(String, Value)>),
}

/// A property list whose root is a dictionary.
///
/// Iterating a `Format` walks the tree depth-first and yields one [`Pair`]
/// per non-dictionary leaf. There is no depth limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub root: Vec<(String, Value)>,
}

/// Leading bytes of a binary property list.
pub const BINARY_MAGIC: &[u8] = b"bplist";

/// Returns `true` if the text starts like an XML property list.
pub fn looks_like_plist(text: &str) -> bool {
    let head = text.trim_start();
    head.starts_with("<?xml") || head.starts_with("<!DOCTYPE plist") || head.starts_with("<plist")
}

impl Parser for Format {
    fn from_str(s: &str) -> Result<Self, Error> {
        if !looks_like_plist(s) {
            return Err(Error::UnknownFormat("plist".to_string()));
        }
        match parse_document(s)? {
            Value::Dict(root) => Ok(Format { root }),
            Value::Scalar(_) => Err(Error::InvalidResource(
                "property list root is not a dictionary".to_string(),
            )),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.starts_with(BINARY_MAGIC) {
            return Self::from_binary(bytes);
        }
        let text = crate::encoding::TextEncoding::detect(bytes).decode(bytes)?;
        Self::from_str(&text)
    }
}

impl Format {
    /// Reads a binary property list.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, Error> {
        let value = ::plist::Value::from_reader(Cursor::new(bytes))?;
        match from_plist_value(value)? {
            Value::Dict(root) => Ok(Format { root }),
            Value::Scalar(_) => Err(Error::InvalidResource(
                "property list root is not a dictionary".to_string(),
            )),
        }
    }
}

impl IntoIterator for Format {
    type Item = Pair;
    type IntoIter = Flatten;

    fn into_iter(self) -> Self::IntoIter {
        Flatten {
            stack: vec![(None, self.root.into_iter())],
        }
    }
}

/// Depth-first iterator over the leaves of a property list.
///
/// Each stack frame carries the dot-joined key path of the dictionary it walks.
#[derive(Debug)]
pub struct Flatten {
    stack: Vec<(Option<String>, vec::IntoIter<(String, Value)>)>,
}

impl Iterator for Flatten {
    type Item = Pair;

    fn next(&mut self) -> Option<Pair> {
        loop {
            let (prefix, entries) = self.stack.last_mut()?;
            let Some((key, value)) = entries.next() else {
                self.stack.pop();
                continue;
            };
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, key),
                None => key,
            };
            match value {
                Value::Scalar(text) => return Some(Pair::new(path, text)),
                Value::Dict(children) => self.stack.push((Some(path), children.into_iter())),
            }
        }
    }
}

/// An open container while reading the document.
enum Frame {
    Dict {
        entries: Vec<(String, Value)>,
        pending_key: Option<String>,
    },
    Array,
}

/// The scalar element whose text is currently being collected.
struct OpenScalar {
    tag: Vec<u8>,
    text: String,
}

fn parse_document(text: &str) -> Result<Value, Error> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Frame> = Vec::new();
    let mut scalar: Option<OpenScalar> = None;
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                if scalar.is_some() {
                    return Err(unexpected(e, "inside a scalar element"));
                }
                match e.name().as_ref() {
                    b"plist" => {}
                    b"dict" => stack.push(Frame::Dict {
                        entries: Vec::new(),
                        pending_key: None,
                    }),
                    b"array" => stack.push(Frame::Array),
                    b"key" | b"string" | b"integer" | b"real" | b"date" => {
                        scalar = Some(OpenScalar {
                            tag: e.name().as_ref().to_vec(),
                            text: String::new(),
                        });
                    }
                    b"data" => {
                        return Err(Error::InvalidResource(
                            "data values are not supported in string tables".to_string(),
                        ));
                    }
                    _ => return Err(unexpected(e, "in property list")),
                }
            }
            Event::Empty(ref e) => {
                if scalar.is_some() {
                    return Err(unexpected(e, "inside a scalar element"));
                }
                match e.name().as_ref() {
                    b"true" => attach(&mut stack, &mut root, Value::Scalar("true".to_string()))?,
                    b"false" => attach(&mut stack, &mut root, Value::Scalar("false".to_string()))?,
                    b"string" | b"integer" | b"real" | b"date" => {
                        attach(&mut stack, &mut root, Value::Scalar(String::new()))?
                    }
                    b"key" => set_key(&mut stack, String::new())?,
                    b"dict" => attach(&mut stack, &mut root, Value::Dict(Vec::new()))?,
                    b"array" => {
                        return Err(Error::InvalidResource(
                            "array values are not supported in string tables".to_string(),
                        ));
                    }
                    _ => return Err(unexpected(e, "in property list")),
                }
            }
            Event::Text(e) => {
                let unescaped = e.unescape()?;
                match scalar.as_mut() {
                    Some(open) => open.text.push_str(&unescaped),
                    None if unescaped.trim().is_empty() => {}
                    None => {
                        return Err(Error::InvalidResource(format!(
                            "unexpected text `{}` in property list",
                            unescaped.trim()
                        )));
                    }
                }
            }
            Event::CData(e) => {
                let raw = std::str::from_utf8(&e)
                    .map_err(|err| Error::InvalidResource(err.to_string()))?;
                match scalar.as_mut() {
                    Some(open) => open.text.push_str(raw),
                    None => {
                        return Err(Error::InvalidResource(
                            "unexpected CDATA in property list".to_string(),
                        ));
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"plist" => {}
                b"dict" => match stack.pop() {
                    Some(Frame::Dict {
                        entries,
                        pending_key: None,
                    }) => attach(&mut stack, &mut root, Value::Dict(entries))?,
                    Some(Frame::Dict {
                        pending_key: Some(key),
                        ..
                    }) => {
                        return Err(Error::InvalidResource(format!(
                            "key `{}` has no value",
                            key
                        )));
                    }
                    _ => {
                        return Err(Error::InvalidResource(
                            "unbalanced </dict>".to_string(),
                        ));
                    }
                },
                b"array" => {
                    // Arrays are leaves of a string table, which has no slot for them.
                    return Err(Error::InvalidResource(
                        "array values are not supported in string tables".to_string(),
                    ));
                }
                name => {
                    let open = scalar.take().ok_or_else(|| {
                        Error::InvalidResource(format!(
                            "unexpected </{}>",
                            String::from_utf8_lossy(name)
                        ))
                    })?;
                    if open.tag == b"key" {
                        set_key(&mut stack, open.text)?;
                    } else {
                        let text = if open.tag == b"string" {
                            open.text
                        } else {
                            open.text.trim().to_string()
                        };
                        attach(&mut stack, &mut root, Value::Scalar(text))?;
                    }
                }
            },
            Event::Eof => break,
            // Declarations, comments, doctypes and processing instructions carry no data.
            _ => {}
        }
    }

    if !stack.is_empty() || scalar.is_some() {
        return Err(Error::InvalidResource(
            "unexpected end of property list".to_string(),
        ));
    }
    root.ok_or_else(|| Error::InvalidResource("empty property list".to_string()))
}

/// Reduces a decoded binary value to a string-table value, with the same
/// scalar rendering as the XML reader.
fn from_plist_value(value: ::plist::Value) -> Result<Value, Error> {
    use ::plist::Value as Plist;

    match value {
        Plist::Dictionary(dict) => dict
            .into_iter()
            .map(|(key, value)| Ok((key, from_plist_value(value)?)))
            .collect::<Result<Vec<_>, Error>>()
            .map(Value::Dict),
        Plist::String(text) => Ok(Value::Scalar(text)),
        Plist::Boolean(flag) => Ok(Value::Scalar(flag.to_string())),
        Plist::Integer(number) => Ok(Value::Scalar(number.to_string())),
        Plist::Real(number) => Ok(Value::Scalar(number.to_string())),
        Plist::Date(date) => Ok(Value::Scalar(date.to_xml_format())),
        Plist::Array(_) => Err(Error::InvalidResource(
            "array values are not supported in string tables".to_string(),
        )),
        Plist::Data(_) => Err(Error::InvalidResource(
            "data values are not supported in string tables".to_string(),
        )),
        _ => Err(Error::InvalidResource(
            "unsupported value in binary property list".to_string(),
        )),
    }
}

fn unexpected(e: &BytesStart, context: &str) -> Error {
    Error::InvalidResource(format!(
        "unexpected <{}> {}",
        String::from_utf8_lossy(e.name().as_ref()),
        context
    ))
}

fn set_key(stack: &mut [Frame], key: String) -> Result<(), Error> {
    match stack.last_mut() {
        Some(Frame::Dict { pending_key, .. }) if pending_key.is_none() => {
            *pending_key = Some(key);
            Ok(())
        }
        Some(Frame::Dict { .. }) => Err(Error::InvalidResource(format!(
            "key `{}` follows another key",
            key
        ))),
        _ => Err(Error::InvalidResource(format!(
            "key `{}` outside of a dictionary",
            key
        ))),
    }
}

fn attach(stack: &mut [Frame], root: &mut Option<Value>, value: Value) -> Result<(), Error> {
    match stack.last_mut() {
        None if root.is_none() => {
            *root = Some(value);
            Ok(())
        }
        None => Err(Error::InvalidResource(
            "property list has more than one root value".to_string(),
        )),
        Some(Frame::Dict {
            entries,
            pending_key,
        }) => {
            let key = pending_key
                .take()
                .ok_or_else(|| Error::InvalidResource("value without a key".to_string()))?;
            entries.push((key, value));
            Ok(())
        }
        Some(Frame::Array) => Err(Error::InvalidResource(
            "array values are not supported in string tables".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
"#;

    fn plist(body: &str) -> String {
        format!("{}<plist version=\"1.0\">\n{}\n</plist>\n", HEADER, body)
    }

    fn pairs(text: &str) -> Vec<(String, String)> {
        Format::from_str(text)
            .unwrap()
            .into_iter()
            .map(|p| (p.key, p.value))
            .collect()
    }

    #[test]
    fn test_flat_dictionary() {
        let text = plist(
            "<dict>\n  <key>Title</key>\n  <string>Hello</string>\n  <key>Quit</key>\n  <string>Beenden</string>\n</dict>",
        );
        assert_eq!(
            pairs(&text),
            vec![
                ("Title".to_string(), "Hello".to_string()),
                ("Quit".to_string(), "Beenden".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_dictionaries_are_dot_joined() {
        let text = plist(
            r#"<dict>
  <key>WindowA</key>
  <dict>
    <key>Title</key><string>Main</string>
    <key>Toolbar</key>
    <dict><key>Tip</key><string>Click</string></dict>
  </dict>
  <key>Plain</key><string>p</string>
</dict>"#,
        );
        assert_eq!(
            pairs(&text),
            vec![
                ("WindowA.Title".to_string(), "Main".to_string()),
                ("WindowA.Toolbar.Tip".to_string(), "Click".to_string()),
                ("Plain".to_string(), "p".to_string()),
            ]
        );
    }

    #[test]
    fn test_string_whitespace_and_entities_are_preserved() {
        let text = plist("<dict><key>k</key><string>  a &amp; b\n c </string></dict>");
        assert_eq!(pairs(&text), vec![("k".to_string(), "  a & b\n c ".to_string())]);
    }

    #[test]
    fn test_scalar_kinds() {
        let text = plist(
            "<dict><key>n</key><integer> 42 </integer><key>on</key><true/><key>off</key><false/><key>e</key><string/></dict>",
        );
        assert_eq!(
            pairs(&text),
            vec![
                ("n".to_string(), "42".to_string()),
                ("on".to_string(), "true".to_string()),
                ("off".to_string(), "false".to_string()),
                ("e".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_empty_dictionary_yields_nothing() {
        assert!(pairs(&plist("<dict/>")).is_empty());
        assert!(pairs(&plist("<dict><key>a</key><dict/></dict>")).is_empty());
    }

    #[test]
    fn test_source_format_is_not_recognized() {
        let err = Format::from_str("\"key\" = \"value\";").unwrap_err();
        assert!(err.is_unknown_format());
    }

    #[test]
    fn test_malformed_plist_is_not_recoverable() {
        let err = Format::from_str(&plist("<dict><key>a</key><string>b</dict>")).unwrap_err();
        assert!(!err.is_unknown_format());
    }

    #[test]
    fn test_array_is_rejected() {
        let err = Format::from_str(&plist(
            "<dict><key>a</key><array><string>x</string></array></dict>",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
    }

    #[test]
    fn test_root_must_be_dictionary() {
        let err = Format::from_str(&plist("<string>lonely</string>")).unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
    }

    fn binary(root: ::plist::Dictionary) -> Vec<u8> {
        let mut bytes = Vec::new();
        ::plist::Value::Dictionary(root)
            .to_writer_binary(&mut bytes)
            .unwrap();
        bytes
    }

    #[test]
    fn test_binary_plist_is_flattened() {
        let mut window = ::plist::Dictionary::new();
        window.insert("Title".to_string(), ::plist::Value::String("Inbox".to_string()));
        let mut root = ::plist::Dictionary::new();
        root.insert("Quit".to_string(), ::plist::Value::String("Beenden".to_string()));
        root.insert("WindowA".to_string(), ::plist::Value::Dictionary(window));
        root.insert("Enabled".to_string(), ::plist::Value::Boolean(true));
        root.insert("Count".to_string(), ::plist::Value::Integer(3i64.into()));

        let bytes = binary(root);
        assert!(bytes.starts_with(BINARY_MAGIC));
        let mut pairs: Vec<(String, String)> = Format::from_bytes(&bytes)
            .unwrap()
            .into_iter()
            .map(|p| (p.key, p.value))
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("Count".to_string(), "3".to_string()),
                ("Enabled".to_string(), "true".to_string()),
                ("Quit".to_string(), "Beenden".to_string()),
                ("WindowA.Title".to_string(), "Inbox".to_string()),
            ]
        );
    }

    #[test]
    fn test_binary_plist_array_is_rejected() {
        let mut root = ::plist::Dictionary::new();
        root.insert("a".to_string(), ::plist::Value::Array(vec![]));
        let err = Format::from_binary(&binary(root)).unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
    }

    #[test]
    fn test_truncated_binary_plist_is_not_recoverable() {
        let err = Format::from_bytes(b"bplist00\xd1\x01\x02").unwrap_err();
        assert!(matches!(err, Error::Plist(_)));
        assert!(!err.is_unknown_format());
    }

    #[test]
    fn test_utf16_plist() {
        let text = plist("<dict><key>k</key><string>Grüße</string></dict>");
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
        let pairs: Vec<Pair> = Format::from_bytes(&bytes).unwrap().into_iter().collect();
        assert_eq!(pairs, vec![Pair::new("k", "Grüße")]);
    }
}
