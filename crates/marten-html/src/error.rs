//! Parse errors.
//!
//! Every problem found in the input is recorded as a [`ParseError`] and
//! parsing carries on; nothing here ever aborts a parse.

use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;

use marten_dom::Span;

/// The error codes the tokenizer and the tree builder can report.
///
/// Codes without the `x-` prefix are named after their counterparts in
/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// An end tag with no open element of the same name.
    #[strum(serialize = "x-invalid-end-tag")]
    XInvalidEndTag,
    /// An `xmlns` or `xmlns:xlink` attribute whose value is not the
    /// namespace the element actually lives in.
    #[strum(serialize = "x-invalid-namespace")]
    XInvalidNamespace,
    /// "This error occurs if the parser encounters a start tag for an element
    /// that is not in the list of void elements or is not a part of foreign
    /// content (i.e., not an SVG or MathML element) that has a U+002F (/) code
    /// point right before the closing U+003E (>) code point."
    #[strum(serialize = "non-void-html-element-start-tag-with-trailing-solidus")]
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// "This error occurs if the parser encounters the end of the input
    /// stream in a start tag or an end tag."
    #[strum(serialize = "eof-in-tag")]
    EofInTag,
    /// "This error occurs if the parser encounters the end of the input
    /// stream in a comment."
    #[strum(serialize = "eof-in-comment")]
    EofInComment,
    /// "This error occurs if the parser encounters a U+003E (>) code point
    /// where an end tag name is expected, i.e., `</>`."
    #[strum(serialize = "missing-end-tag-name")]
    MissingEndTagName,
    /// "This error occurs if the parser encounters an attribute in a tag
    /// that already has an attribute with the same name."
    #[strum(serialize = "duplicate-attribute")]
    DuplicateAttribute,
    /// "This error occurs if the parser encounters a CDATA section outside
    /// of foreign content (SVG or MathML)."
    #[strum(serialize = "cdata-in-html-content")]
    CdataInHtmlContent,
    /// "This error occurs if the parser encounters a U+003F (?) code point
    /// where first code point of a start tag name is expected."
    #[strum(serialize = "unexpected-question-mark-instead-of-tag-name")]
    UnexpectedQuestionMarkInsteadOfTagName,
}

/// A recorded parse error: what went wrong and where the offending token
/// starts.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code} ({line}:{column})")]
pub struct ParseError {
    /// The kind of error.
    pub code: ErrorCode,
    /// Byte offset of the offending token.
    pub index: usize,
    /// 1-based line of the offending token.
    pub line: usize,
    /// 0-based column of the offending token.
    pub column: usize,
}

impl ParseError {
    /// An error of kind `code` located at the start of `span`.
    #[must_use]
    pub const fn at(code: ErrorCode, span: &Span) -> Self {
        Self {
            code,
            index: span.start,
            line: span.start_pos.line,
            column: span.start_pos.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marten_dom::Position;

    #[test]
    fn test_error_codes_display_as_kebab_case() {
        assert_eq!(ErrorCode::XInvalidEndTag.to_string(), "x-invalid-end-tag");
        assert_eq!(
            ErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus.to_string(),
            "non-void-html-element-start-tag-with-trailing-solidus"
        );
    }

    #[test]
    fn test_error_located_at_span_start() {
        let span = Span::new(10, 16, Position::new(2, 3), Position::new(2, 9));
        let error = ParseError::at(ErrorCode::XInvalidEndTag, &span);
        assert_eq!(error.index, 10);
        assert_eq!((error.line, error.column), (2, 3));
        assert_eq!(error.to_string(), "x-invalid-end-tag (2:3)");
    }
}
