//! Attribute selector fragments.
//!
//! [Selectors Level 4 § 6](https://www.w3.org/TR/selectors-4/#attribute-selectors)
//!
//! The parser keeps the text between `[` and `]` verbatim; it is compiled
//! into an [`AttributeMatcher`] when a rule is matched against an element.

use wren_dom::ElementData;

use super::SelectorError;

/// How an attribute value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[name]`: the attribute exists and is non-empty.
    Exists,
    /// `[name=value]`
    Equals,
    /// `[name*=value]`: substring.
    Contains,
    /// `[name^=value]`
    Prefix,
    /// `[name$=value]`
    Suffix,
    /// `[name|=value]`: exactly `value` or starting with `value-`.
    DashMatch,
    /// `[name~=value]`: one of the space-separated tokens.
    Includes,
}

impl AttributeOperator {
    const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'*' => Some(Self::Contains),
            b'^' => Some(Self::Prefix),
            b'$' => Some(Self::Suffix),
            b'|' => Some(Self::DashMatch),
            b'~' => Some(Self::Includes),
            _ => None,
        }
    }
}

/// A compiled attribute fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatcher {
    /// Attribute name.
    pub name: String,
    /// Comparison to apply.
    pub operator: AttributeOperator,
    /// Expected value with surrounding quotes removed. Empty for [`AttributeOperator::Exists`].
    pub value: String,
}

impl AttributeMatcher {
    /// Compile the text between `[` and `]`.
    ///
    /// # Errors
    ///
    /// [`SelectorError::InvalidAttribute`] when the name is missing or `=` is
    /// not followed by a value.
    pub fn compile(fragment: &str) -> Result<Self, SelectorError> {
        let invalid = || SelectorError::InvalidAttribute(fragment.to_string());

        let Some((lhs, rhs)) = fragment.split_once('=') else {
            let name = fragment.trim();
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok(Self {
                name: name.to_string(),
                operator: AttributeOperator::Exists,
                value: String::new(),
            });
        };

        let lhs = lhs.trim_end();
        let (name, operator) = match lhs.as_bytes().last().copied().and_then(AttributeOperator::from_byte) {
            Some(op) => (&lhs[..lhs.len() - 1], op),
            None => (lhs, AttributeOperator::Equals),
        };
        let name = name.trim();
        let raw_value = rhs.trim();
        if name.is_empty() || raw_value.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            name: name.to_string(),
            operator,
            value: unquote(raw_value).to_string(),
        })
    }

    /// Whether `element` satisfies this fragment.
    ///
    /// A missing or empty attribute never matches.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        let actual = element.get_attribute(&self.name).unwrap_or("");
        if actual.is_empty() {
            return false;
        }
        let expected = self.value.as_str();
        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals => actual == expected,
            AttributeOperator::Contains => actual.contains(expected),
            AttributeOperator::Prefix => actual.starts_with(expected),
            AttributeOperator::Suffix => actual.ends_with(expected),
            AttributeOperator::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeOperator::Includes => actual.split(' ').any(|token| token == expected),
        }
    }
}

/// Strip one pair of matching `"` or `'` quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str) -> ElementData {
        ElementData::new("a").with_attr("href", href)
    }

    fn matches(fragment: &str, element: &ElementData) -> bool {
        AttributeMatcher::compile(fragment).unwrap().matches(element)
    }

    #[test]
    fn test_presence() {
        assert!(matches("href", &link("/x")));
        assert!(!matches("href", &link("")));
        assert!(!matches("title", &link("/x")));
    }

    #[test]
    fn test_value_operators() {
        let el = link("https://example.com/docs/index.html");
        assert!(matches("href=\"https://example.com/docs/index.html\"", &el));
        assert!(matches("href*=example", &el));
        assert!(matches("href^='https://'", &el));
        assert!(matches("href$=.html", &el));
        assert!(!matches("href$=.htm", &el));
        assert!(!matches("href=example", &el));
    }

    #[test]
    fn test_dash_match() {
        let el = ElementData::new("p").with_attr("lang", "en-US");
        assert!(matches("lang|=en", &el));
        assert!(matches("lang|=en-US", &el));
        assert!(!matches("lang|=e", &el));
    }

    #[test]
    fn test_includes_matches_whole_tokens() {
        let el = ElementData::new("p").with_attr("rel", "noopener external");
        assert!(matches("rel~=external", &el));
        assert!(!matches("rel~=extern", &el));
    }

    #[test]
    fn test_empty_attribute_never_matches_value_operators() {
        let el = ElementData::new("p").with_attr("title", "");
        assert!(!matches("title=\"\"", &el));
        assert!(!matches("title*=x", &el));
    }

    #[test]
    fn test_malformed_fragments() {
        for fragment in ["", "=x", "*=x", "name=", "name~=  "] {
            assert!(
                matches!(
                    AttributeMatcher::compile(fragment),
                    Err(SelectorError::InvalidAttribute(_))
                ),
                "{fragment:?} should not compile"
            );
        }
    }

    #[test]
    fn test_operator_parsed() {
        let matcher = AttributeMatcher::compile("data-x ^= 'a'").unwrap();
        assert_eq!(matcher.name, "data-x");
        assert_eq!(matcher.operator, AttributeOperator::Prefix);
        assert_eq!(matcher.value, "a");
    }
}
