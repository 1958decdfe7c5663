//! Selector tokenizer.
//!
//! Splits a selector string into identifiers and single-byte punctuation.
//! Every byte is either part of an identifier or one of
//! `* . : [ ] # ( ) > + ~ |`, with a plain space standing for the descendant
//! combinator. Raw `\n`, `\r` and `\t` are rejected outright.

use std::fmt;

use super::SelectorError;

/// Classification of one selector token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Run of non-punctuation bytes: a tag, id, class or pseudo-class name.
    Identifier,
    /// `*`
    Global,
    /// `#`
    IdStart,
    /// `.`
    ClassStart,
    /// `[`
    AttributeStart,
    /// `]`
    AttributeStop,
    /// `:`
    PseudoClassStart,
    /// `(`
    SubSelectorStart,
    /// `)`
    SubSelectorStop,
    /// A single space.
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
    /// `|`
    Namespace,
}

impl TokenKind {
    /// Punctuation kind of `byte`, or `None` when it belongs to an identifier.
    const fn from_punctuation(byte: u8) -> Option<Self> {
        Some(match byte {
            b'*' => Self::Global,
            b'#' => Self::IdStart,
            b'.' => Self::ClassStart,
            b'[' => Self::AttributeStart,
            b']' => Self::AttributeStop,
            b':' => Self::PseudoClassStart,
            b'(' => Self::SubSelectorStart,
            b')' => Self::SubSelectorStop,
            b' ' => Self::Descendant,
            b'>' => Self::Child,
            b'+' => Self::NextSibling,
            b'~' => Self::SubsequentSibling,
            b'|' => Self::Namespace,
            _ => return None,
        })
    }

    /// Whether this token combines two compound selectors.
    #[must_use]
    pub const fn is_combinator(self) -> bool {
        matches!(
            self,
            Self::Descendant | Self::Child | Self::NextSibling | Self::SubsequentSibling
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "identifier",
            Self::Global => "'*'",
            Self::IdStart => "'#'",
            Self::ClassStart => "'.'",
            Self::AttributeStart => "'['",
            Self::AttributeStop => "']'",
            Self::PseudoClassStart => "':'",
            Self::SubSelectorStart => "'('",
            Self::SubSelectorStop => "')'",
            Self::Descendant => "descendant combinator",
            Self::Child => "'>'",
            Self::NextSibling => "'+'",
            Self::SubsequentSibling => "'~'",
            Self::Namespace => "'|'",
        };
        f.write_str(name)
    }
}

/// A token borrowing its raw text from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token classification.
    pub kind: TokenKind,
    /// Exact source text of the token.
    pub raw: &'a str,
}

/// Byte-oriented tokenizer over one selector string.
#[derive(Debug, Clone)]
pub struct SelectorTokenizer<'a> {
    input: &'a str,
    pos: usize,
    last: Option<Token<'a>>,
}

impl<'a> SelectorTokenizer<'a> {
    /// Start tokenizing `input` from its first byte.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            last: None,
        }
    }

    /// Read the next token. `Ok(None)` means end of input.
    ///
    /// # Errors
    ///
    /// [`SelectorError::InvalidToken`] for a raw control whitespace byte or an
    /// identifier starting with a digit.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, SelectorError> {
        let bytes = self.input.as_bytes();
        let Some(&first) = bytes.get(self.pos) else {
            return Ok(None);
        };
        let start = self.pos;

        if matches!(first, b'\n' | b'\r' | b'\t') {
            return Err(SelectorError::InvalidToken {
                position: start,
                found: char::from(first),
            });
        }

        let token = if let Some(kind) = TokenKind::from_punctuation(first) {
            self.pos += 1;
            Token {
                kind,
                raw: &self.input[start..self.pos],
            }
        } else {
            if first.is_ascii_digit() {
                return Err(SelectorError::InvalidToken {
                    position: start,
                    found: char::from(first),
                });
            }
            while let Some(&b) = bytes.get(self.pos) {
                if TokenKind::from_punctuation(b).is_some() || matches!(b, b'\n' | b'\r' | b'\t') {
                    break;
                }
                self.pos += 1;
            }
            // Punctuation is ASCII, so both ends fall on char boundaries.
            Token {
                kind: TokenKind::Identifier,
                raw: &self.input[start..self.pos],
            }
        };

        self.last = Some(token);
        Ok(Some(token))
    }

    /// Read one token and require it to be of `kind`.
    ///
    /// # Errors
    ///
    /// [`SelectorError::UnexpectedEnd`] when the input is exhausted,
    /// [`SelectorError::UnexpectedToken`] when a token of another kind is found,
    /// and any tokenizer error.
    pub fn expect_next(&mut self, kind: TokenKind) -> Result<Token<'a>, SelectorError> {
        let after = self.last.map_or_else(String::new, |t| t.raw.to_string());
        match self.next_token()? {
            None => Err(SelectorError::UnexpectedEnd {
                expected: kind,
                after,
            }),
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(SelectorError::UnexpectedToken {
                expected: kind,
                found: token.kind,
                after,
            }),
        }
    }

    /// Consume raw bytes up to and including `stop`, returning the text before it.
    ///
    /// Used for attribute fragments and pseudo-class arguments, whose content
    /// is not selector syntax. `Ok(None)` means the input ended before `stop`.
    ///
    /// # Errors
    ///
    /// [`SelectorError::InvalidToken`] for a raw control whitespace byte.
    pub fn read_raw_until(&mut self, stop: u8) -> Result<Option<&'a str>, SelectorError> {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        while let Some(&b) = bytes.get(self.pos) {
            if matches!(b, b'\n' | b'\r' | b'\t') {
                return Err(SelectorError::InvalidToken {
                    position: self.pos,
                    found: char::from(b),
                });
            }
            if b == stop {
                let raw = &self.input[start..self.pos];
                self.pos += 1;
                self.last = Some(Token {
                    kind: TokenKind::from_punctuation(stop).unwrap_or(TokenKind::Identifier),
                    raw: &self.input[self.pos - 1..self.pos],
                });
                return Ok(Some(raw));
            }
            self.pos += 1;
        }
        Ok(None)
    }

    /// Byte offset of the next unread byte.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }
}
