//! Support for the Apple `.strings` source format.
//!
//! The file is a sequence of `"key" = "value";` assignments, possibly
//! surrounded by `/* ... */` block comments and `//` line comments.
//! Assignments are tokenized lazily over the decoded text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, traits::Parser, types::Pair};

lazy_static! {
    // Tokens in priority order: an assignment on a single line, a block
    // comment opener, a block comment closer.
    static ref TOKEN_REGEX: Regex = Regex::new(r"(?:(.*?)=(.*?);)|(/\*)|(\*/)").unwrap();
}

/// A `.strings` file in source form.
///
/// Iterating a `Format` yields the assignments outside block comments, in
/// file order. Keys starting with `//` are skipped. Surrounding whitespace and
/// one pair of matching quotes are removed from keys and values; escape
/// sequences are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub content: String,
}

impl Parser for Format {
    /// The source format accepts any text; a file without assignments is empty.
    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(Format {
            content: s.to_string(),
        })
    }
}

impl IntoIterator for Format {
    type Item = Pair;
    type IntoIter = Tokens;

    fn into_iter(self) -> Self::IntoIter {
        Tokens {
            content: self.content,
            pos: 0,
            in_block_comment: false,
        }
    }
}

/// Lazy tokenizer over the content of a `.strings` file.
#[derive(Debug)]
pub struct Tokens {
    content: String,
    pos: usize,
    in_block_comment: bool,
}

enum Token {
    Assignment { key: String, value: String },
    CommentOpen,
    CommentClose,
}

impl Tokens {
    fn next_token(&mut self) -> Option<Token> {
        loop {
            let caps = TOKEN_REGEX.captures_at(&self.content, self.pos)?;
            let whole = caps.get(0)?;
            let start = whole.start();
            if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
                let rest = &self.content[start..];
                // An assignment may not begin where a block comment begins.
                if rest.trim_start().starts_with("/*") {
                    if rest.starts_with("/*") {
                        self.pos = start + 2;
                        return Some(Token::CommentOpen);
                    }
                    if rest.starts_with("*/") {
                        self.pos = start + 2;
                        return Some(Token::CommentClose);
                    }
                    self.pos = start + rest.chars().next().map_or(1, char::len_utf8);
                    continue;
                }
                // Inside a comment, `/* note */ "k" = "v";` must not swallow the closer.
                if self.in_block_comment {
                    if let Some(offset) = key.as_str().find("*/") {
                        self.pos = key.start() + offset + 2;
                        return Some(Token::CommentClose);
                    }
                }
                self.pos = whole.end();
                return Some(Token::Assignment {
                    key: key.as_str().to_string(),
                    value: value.as_str().to_string(),
                });
            }
            self.pos = whole.end();
            return Some(if caps.get(3).is_some() {
                Token::CommentOpen
            } else {
                Token::CommentClose
            });
        }
    }
}

impl Iterator for Tokens {
    type Item = Pair;

    fn next(&mut self) -> Option<Pair> {
        while let Some(token) = self.next_token() {
            match token {
                Token::CommentOpen => self.in_block_comment = true,
                Token::CommentClose => self.in_block_comment = false,
                Token::Assignment { .. } if self.in_block_comment => {}
                Token::Assignment { key, value } => {
                    let key = key.trim();
                    if key.starts_with("//") {
                        continue;
                    }
                    return Some(Pair::new(
                        strip_matching_quotes(key),
                        strip_matching_quotes(value.trim()),
                    ));
                }
            }
        }
        None
    }
}

/// Removes one pair of surrounding quotes if the first and last characters
/// are the same quote (`"` or `'`). Empty input is returned unchanged.
pub fn strip_matching_quotes(s: &str) -> &str {
    let (Some(first), Some(last)) = (s.chars().next(), s.chars().next_back()) else {
        return s;
    };
    if first != last || !matches!(first, '"' | '\'') {
        return s;
    }
    if s.len() == first.len_utf8() {
        // A lone quote is both the opening and the closing one.
        return "";
    }
    &s[first.len_utf8()..s.len() - last.len_utf8()]
}
