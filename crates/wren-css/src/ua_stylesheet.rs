//! Default stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! The default rules are merged *under* the page's stylesheet with
//! [`Stylesheet::merge`]: for a selector both sheets declare, the page's value
//! wins property by property. Otherwise both compete on specificity.

use std::sync::OnceLock;

use crate::parser::{Stylesheet, parse_stylesheet};

/// CSS2-era defaults for the elements this engine lays out.
const DEFAULT_CSS: &str = r"
/* [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements) */
area, base, basefont, datalist, head, link, meta, noembed,
noframes, param, rp, script, style, template, title {
    display: none;
}

/* [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3) */
article, aside, body, center, details, dialog, dir, div, dl, dt,
fieldset, figcaption, footer, form, header, hgroup, html, legend,
main, nav, search, section, summary {
    display: block;
}

address {
    display: block;
    font-style: italic;
}

blockquote, figure {
    display: block;
    margin: 1em 40px;
}

dd {
    display: block;
    margin-left: 40px;
}

hr {
    display: block;
    margin: 0.5em auto;
    border-style: inset;
    border-width: 1px;
}

/* [§ 15.3.4 The page](https://html.spec.whatwg.org/multipage/rendering.html#the-page) */
body {
    margin: 8px;
}

/* [§ 15.3.5 Grouping content](https://html.spec.whatwg.org/multipage/rendering.html#grouping-content) */
p {
    display: block;
    margin: 1em 0;
}

pre {
    display: block;
    font-family: monospace;
    white-space: pre;
    margin: 1em 0;
}

/* [§ 15.3.6 Sections and headings](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings) */
h1 {
    display: block;
    font-size: 2em;
    font-weight: bold;
    margin: 0.67em 0;
}

h2 {
    display: block;
    font-size: 1.5em;
    font-weight: bold;
    margin: 0.83em 0;
}

h3 {
    display: block;
    font-size: 1.17em;
    font-weight: bold;
    margin: 1em 0;
}

h4 {
    display: block;
    font-weight: bold;
    margin: 1.33em 0;
}

h5 {
    display: block;
    font-size: 0.83em;
    font-weight: bold;
    margin: 1.67em 0;
}

h6 {
    display: block;
    font-size: 0.67em;
    font-weight: bold;
    margin: 2.33em 0;
}

/* [§ 15.3.7 Lists](https://html.spec.whatwg.org/multipage/rendering.html#lists) */
ul, menu {
    display: block;
    list-style-type: disc;
    margin: 1em 0;
    padding-left: 40px;
}

ol {
    display: block;
    list-style-type: decimal;
    margin: 1em 0;
    padding-left: 40px;
}

li {
    display: list-item;
}

/* [§ 15.3.8 Text-level semantics](https://html.spec.whatwg.org/multipage/rendering.html#text-level-semantics) */
a, abbr, b, cite, code, dfn, em, i, kbd, label, mark, q, s,
samp, small, span, strong, sub, sup, u, var {
    display: inline;
}

a:link {
    color: blue;
    text-decoration: underline;
}

a:visited {
    color: darkblue;
    text-decoration: underline;
}

b, strong {
    font-weight: bold;
}

i, cite, em, var, dfn {
    font-style: italic;
}

mark {
    background-color: yellow;
    color: black;
}

code, kbd, samp {
    font-family: monospace;
}

s, strike, del {
    text-decoration: line-through;
}

u, ins {
    text-decoration: underline;
}

img {
    display: inline-block;
}

/* [§ 15.3.10 Tables](https://html.spec.whatwg.org/multipage/rendering.html#tables-2) */
table {
    display: table;
    border-color: gray;
}

tbody {
    display: table-row-group;
}

tr {
    display: table-row;
}

td {
    display: table-cell;
}

th {
    display: table-cell;
    font-weight: bold;
}
";

/// The parsed default stylesheet, parsed on first use.
///
/// [CSS Cascading § 6.1](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
#[must_use]
pub fn default_stylesheet() -> &'static Stylesheet {
    static STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();
    STYLESHEET.get_or_init(|| parse_stylesheet(DEFAULT_CSS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_parses() {
        let sheet = default_stylesheet();
        assert!(sheet.get("head").is_some());
        assert!(sheet.get("th").is_some());
        assert!(sheet.get("a:visited").is_some());
    }

    #[test]
    fn test_shorthands_are_expanded() {
        let sheet = default_stylesheet();
        let body = sheet.get("body").unwrap();
        assert_eq!(body.get("margin-left"), Some("8px"));
        let p = sheet.get("p").unwrap();
        assert_eq!(p.get("margin-top"), Some("1em"));
        assert_eq!(p.get("margin-left"), Some("0"));
    }

    #[test]
    fn test_text_level_tags_are_inline() {
        let sheet = default_stylesheet();
        for tag in ["a", "span", "b", "strong", "i", "em"] {
            assert_eq!(sheet.get(tag).unwrap().get("display"), Some("inline"), "{tag}");
        }
        // Grouped twice: display and weight both survive.
        assert_eq!(sheet.get("b").unwrap().get("font-weight"), Some("bold"));
    }

    #[test]
    fn test_colors_survive_validation() {
        let sheet = default_stylesheet();
        assert_eq!(sheet.get("a:visited").unwrap().get("color"), Some("darkblue"));
        assert_eq!(sheet.get("mark").unwrap().get("background-color"), Some("yellow"));
    }
}
