//! Tag name classification tables.
//!
//! These tables decide void-ness, lexing modes and implicit closing. Their
//! membership is part of the parser's observable behavior: changing an entry
//! changes the shape of the trees produced for existing templates.

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// `param` is kept from older revisions of the list.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is lexed in the RCDATA state.
const RCDATA_ELEMENTS: &[&str] = &["title", "textarea"];

/// Elements whose content is lexed in the RAWTEXT state.
const RAWTEXT_ELEMENTS: &[&str] = &[
    "style", "xmp", "iframe", "noembed", "noframes", "noscript", "script",
];

/// Elements that a start tag of the same name implicitly closes.
///
/// `options` (not `option`) is intentional; the table predates the
/// template dialects that rely on it and is kept as is for compatibility.
const CAN_BE_LEFT_OPEN_ELEMENTS: &[&str] = &[
    "colgroup", "li", "options", "p", "td", "tfoot", "th", "thead", "tr", "source",
];

/// Elements whose start tag implicitly closes an open `p`.
const NON_PHRASING_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "base",
    "blockquote",
    "body",
    "caption",
    "col",
    "colgroup",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hgroup",
    "hr",
    "html",
    "legend",
    "li",
    "menuitem",
    "meta",
    "optgroup",
    "option",
    "param",
    "rp",
    "rt",
    "source",
    "style",
    "summary",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "track",
];

/// Whether `name` is a void element (never has content or an end tag).
#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Whether `name`'s content is RCDATA.
#[must_use]
pub fn is_rcdata_element(name: &str) -> bool {
    RCDATA_ELEMENTS.contains(&name)
}

/// Whether `name`'s content is raw text.
#[must_use]
pub fn is_rawtext_element(name: &str) -> bool {
    RAWTEXT_ELEMENTS.contains(&name)
}

/// Whether an open `name` element is closed by another `name` start tag.
#[must_use]
pub fn can_be_left_open(name: &str) -> bool {
    CAN_BE_LEFT_OPEN_ELEMENTS.contains(&name)
}

/// Whether a `name` start tag closes an open `p`.
#[must_use]
pub fn is_non_phrasing_element(name: &str) -> bool {
    NON_PHRASING_ELEMENTS.contains(&name)
}

/// Whether `name` is `dt` or `dd`; either one closes an open sibling of the
/// other kind.
#[must_use]
pub fn is_description_list_item(name: &str) -> bool {
    matches!(name, "dt" | "dd")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        for name in ["img", "br", "input", "param", "wbr"] {
            assert!(is_void_element(name), "{name} should be void");
        }
        assert!(!is_void_element("div"));
        assert!(!is_void_element("template"));
    }

    #[test]
    fn test_lexing_mode_tables_are_disjoint() {
        for name in RCDATA_ELEMENTS {
            assert!(!is_rawtext_element(name));
        }
        assert!(is_rawtext_element("script"));
        assert!(is_rcdata_element("textarea"));
    }

    #[test]
    fn test_paragraph_is_not_non_phrasing() {
        assert!(!is_non_phrasing_element("p"));
        assert!(is_non_phrasing_element("div"));
        assert!(can_be_left_open("p"));
        assert!(!can_be_left_open("option"));
    }
}
