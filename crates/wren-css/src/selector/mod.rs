//! Simple selector parsing.
//!
//! [Selectors Level 4 § 3.1](https://www.w3.org/TR/selectors-4/#structure)
//!
//! Only compound selectors are supported: an optional tag or `*`, any number
//! of `#id` and `.class` parts, at most one `[attribute]` fragment and any
//! number of `:pseudo-class` requirements. Combinators and pseudo-elements
//! are rejected with an error rather than half-parsed.

pub mod attribute;
pub mod tokenizer;

use std::fmt;

use thiserror::Error;

pub use attribute::{AttributeMatcher, AttributeOperator};
pub use tokenizer::{SelectorTokenizer, Token, TokenKind};

/// Why a selector (or attribute fragment) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A byte that can never appear in a selector.
    #[error("invalid character {found:?} at byte {position}")]
    InvalidToken {
        /// Byte offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },
    /// The input ended where a token was required.
    #[error("unexpected end of selector: expected {expected} after '{after}'")]
    UnexpectedEnd {
        /// What the parser was waiting for.
        expected: TokenKind,
        /// Raw text of the last token read.
        after: String,
    },
    /// A token of the wrong kind was found where another was required.
    #[error("expected {expected} after '{after}', found {found}")]
    UnexpectedToken {
        /// What the parser was waiting for.
        expected: TokenKind,
        /// What it got instead.
        found: TokenKind,
        /// Raw text of the token before it.
        after: String,
    },
    /// A token that is legal syntax elsewhere but not at this position.
    #[error("unexpected {kind} '{raw}'")]
    StrayToken {
        /// Kind of the stray token.
        kind: TokenKind,
        /// Its source text.
        raw: String,
    },
    /// `*` anywhere but the first position.
    #[error("'*' is only allowed at the start of a selector")]
    MisplacedGlobal,
    /// A combinator between compound selectors.
    #[error("{0} selectors are unimplemented")]
    Unimplemented(TokenKind),
    /// `::name`
    #[error("pseudo elements are unimplemented")]
    PseudoElementUnsupported,
    /// A pseudo-class name outside the supported table.
    #[error("unknown pseudo-class ':{0}'")]
    UnknownPseudoClass(String),
    /// A second `[...]` in the same selector.
    #[error("only one attribute selector is supported")]
    DuplicateAttribute,
    /// `[` without a closing `]`.
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    /// `(` without a closing `)`.
    #[error("unterminated argument to ':{0}'")]
    UnterminatedSubSelector(PseudoClassKind),
    /// A pseudo-class argument that itself contains a parenthesized argument.
    #[error("nested sub-selectors are unimplemented")]
    NestedSubSelector,
    /// A pseudo-class argument that is not a valid selector.
    #[error("invalid argument to ':{kind}': {source}")]
    InvalidSubSelector {
        /// Pseudo-class owning the argument.
        kind: PseudoClassKind,
        /// Why the argument failed.
        source: Box<SelectorError>,
    },
    /// A malformed attribute fragment.
    #[error("invalid attribute selector '[{0}]'")]
    InvalidAttribute(String),
    /// Nothing to parse.
    #[error("empty selector")]
    Empty,
}

/// Pseudo-classes recognised by the parser.
///
/// Each name is matched exactly (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoClassKind {
    /// `:active`
    Active,
    /// `:checked`
    Checked,
    /// `:disabled`
    Disabled,
    /// `:empty`
    Empty,
    /// `:enabled`
    Enabled,
    /// `:first-child`
    FirstChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:focus`
    Focus,
    /// `:hover`
    Hover,
    /// `:in-range`
    InRange,
    /// `:invalid`
    Invalid,
    /// `:lang(x)`
    Lang,
    /// `:last-child`
    LastChild,
    /// `:last-of-type`
    LastOfType,
    /// `:link`
    Link,
    /// `:not(x)`
    Not,
    /// `:nth-child(x)`
    NthChild,
    /// `:nth-last-child(x)`
    NthLastChild,
    /// `:nth-last-of-type(x)`
    NthLastOfType,
    /// `:nth-of-type(x)`
    NthOfType,
    /// `:only-of-type`
    OnlyOfType,
    /// `:only-child`
    OnlyChild,
    /// `:optional`
    Optional,
    /// `:out-of-range`
    OutOfRange,
    /// `:read-only`
    ReadOnly,
    /// `:read-write`
    ReadWrite,
    /// `:required`
    Required,
    /// `:root`
    Root,
    /// `:target`
    Target,
    /// `:valid`
    Valid,
    /// `:visited`
    Visited,
}

const PSEUDO_CLASS_NAMES: &[(&str, PseudoClassKind)] = &[
    ("active", PseudoClassKind::Active),
    ("checked", PseudoClassKind::Checked),
    ("disabled", PseudoClassKind::Disabled),
    ("empty", PseudoClassKind::Empty),
    ("enabled", PseudoClassKind::Enabled),
    ("first-child", PseudoClassKind::FirstChild),
    ("first-of-type", PseudoClassKind::FirstOfType),
    ("focus", PseudoClassKind::Focus),
    ("hover", PseudoClassKind::Hover),
    ("in-range", PseudoClassKind::InRange),
    ("invalid", PseudoClassKind::Invalid),
    ("lang", PseudoClassKind::Lang),
    ("last-child", PseudoClassKind::LastChild),
    ("last-of-type", PseudoClassKind::LastOfType),
    ("link", PseudoClassKind::Link),
    ("not", PseudoClassKind::Not),
    ("nth-child", PseudoClassKind::NthChild),
    ("nth-last-child", PseudoClassKind::NthLastChild),
    ("nth-last-of-type", PseudoClassKind::NthLastOfType),
    ("nth-of-type", PseudoClassKind::NthOfType),
    ("only-of-type", PseudoClassKind::OnlyOfType),
    ("only-child", PseudoClassKind::OnlyChild),
    ("optional", PseudoClassKind::Optional),
    ("out-of-range", PseudoClassKind::OutOfRange),
    ("read-only", PseudoClassKind::ReadOnly),
    ("read-write", PseudoClassKind::ReadWrite),
    ("required", PseudoClassKind::Required),
    ("root", PseudoClassKind::Root),
    ("target", PseudoClassKind::Target),
    ("valid", PseudoClassKind::Valid),
    ("visited", PseudoClassKind::Visited),
];

impl PseudoClassKind {
    /// Resolve a pseudo-class name (without the colon).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        PSEUDO_CLASS_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
    }

    /// The name as written in a selector.
    #[must_use]
    pub fn name(self) -> &'static str {
        PSEUDO_CLASS_NAMES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("", |(name, _)| name)
    }

    /// Whether the pseudo-class requires a parenthesized argument.
    #[must_use]
    pub const fn takes_argument(self) -> bool {
        matches!(
            self,
            Self::Lang
                | Self::Not
                | Self::NthChild
                | Self::NthLastChild
                | Self::NthOfType
                | Self::NthLastOfType
        )
    }
}

impl fmt::Display for PseudoClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `:pseudo-class` requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoClass {
    /// Which pseudo-class.
    pub kind: PseudoClassKind,
    /// The parsed argument, present exactly when [`PseudoClassKind::takes_argument`].
    pub argument: Option<Box<Selector>>,
}

/// A parsed compound selector.
///
/// `*` and a tag are mutually exclusive. `*` may still be followed by ids,
/// classes, an attribute or pseudo-classes (`*.note`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Required tag name, empty for any.
    pub tag: String,
    /// Required ids in source order.
    pub ids: Vec<String>,
    /// Required classes in source order.
    pub classes: Vec<String>,
    /// Raw text between `[` and `]`, compiled at match time.
    pub attribute: Option<String>,
    /// Whether the selector started with `*`.
    pub global: bool,
    /// Pseudo-class requirements in source order.
    pub pseudo_classes: Vec<PseudoClass>,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            f.write_str("*")?;
        }
        f.write_str(&self.tag)?;
        for id in &self.ids {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, "[{attribute}]")?;
        }
        for pseudo in &self.pseudo_classes {
            write!(f, ":{}", pseudo.kind)?;
            if let Some(argument) = &pseudo.argument {
                write!(f, "({argument})")?;
            }
        }
        Ok(())
    }
}

/// Parse a compound selector.
///
/// # Errors
///
/// Any [`SelectorError`]; the caller discards the rule that owns the selector.
///
/// # Example
/// ```
/// use wren_css::selector::parse_selector;
///
/// let selector = parse_selector("div.card#main").unwrap();
/// assert_eq!(selector.tag, "div");
/// assert_eq!(selector.classes, ["card"]);
/// assert_eq!(selector.ids, ["main"]);
/// ```
pub fn parse_selector(text: &str) -> Result<Selector, SelectorError> {
    if text.is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut tokens = SelectorTokenizer::new(text);
    let mut selector = Selector::default();
    let mut first = true;

    while let Some(token) = tokens.next_token()? {
        match token.kind {
            TokenKind::Identifier if first => selector.tag = token.raw.to_string(),
            TokenKind::Global if first => selector.global = true,
            TokenKind::Global => return Err(SelectorError::MisplacedGlobal),
            TokenKind::IdStart => {
                let name = tokens.expect_next(TokenKind::Identifier)?;
                selector.ids.push(name.raw.to_string());
            }
            TokenKind::ClassStart => {
                let name = tokens.expect_next(TokenKind::Identifier)?;
                selector.classes.push(name.raw.to_string());
            }
            TokenKind::AttributeStart => {
                if selector.attribute.is_some() {
                    return Err(SelectorError::DuplicateAttribute);
                }
                let raw = tokens
                    .read_raw_until(b']')?
                    .ok_or(SelectorError::UnterminatedAttribute)?;
                if raw.trim().is_empty() {
                    return Err(SelectorError::InvalidAttribute(raw.to_string()));
                }
                selector.attribute = Some(raw.to_string());
            }
            TokenKind::PseudoClassStart => {
                selector.pseudo_classes.push(parse_pseudo_class(&mut tokens)?);
            }
            kind if kind.is_combinator() => return Err(SelectorError::Unimplemented(kind)),
            kind => {
                return Err(SelectorError::StrayToken {
                    kind,
                    raw: token.raw.to_string(),
                });
            }
        }
        first = false;
    }

    Ok(selector)
}

/// Parse what follows a `:`.
fn parse_pseudo_class(tokens: &mut SelectorTokenizer<'_>) -> Result<PseudoClass, SelectorError> {
    let name = match tokens.expect_next(TokenKind::Identifier) {
        Ok(name) => name,
        Err(SelectorError::UnexpectedToken {
            found: TokenKind::PseudoClassStart,
            ..
        }) => return Err(SelectorError::PseudoElementUnsupported),
        Err(e) => return Err(e),
    };

    let kind = PseudoClassKind::from_name(name.raw)
        .ok_or_else(|| SelectorError::UnknownPseudoClass(name.raw.to_string()))?;

    if !kind.takes_argument() {
        return Ok(PseudoClass {
            kind,
            argument: None,
        });
    }

    let _ = tokens.expect_next(TokenKind::SubSelectorStart)?;
    let raw = tokens
        .read_raw_until(b')')?
        .ok_or(SelectorError::UnterminatedSubSelector(kind))?;
    if raw.contains('(') {
        return Err(SelectorError::NestedSubSelector);
    }

    let argument = parse_selector(raw).map_err(|e| SelectorError::InvalidSubSelector {
        kind,
        source: Box::new(e),
    })?;

    Ok(PseudoClass {
        kind,
        argument: Some(Box::new(argument)),
    })
}
