//! Lexical records surfaced unchanged from the tokenizer.
//!
//! The tree builder never looks inside these; they are collected on the
//! document fragment so that tooling (linters, formatters) can walk the raw
//! token stream and the comments next to the tree.

use serde::Serialize;
use strum_macros::Display;

use crate::span::Span;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum LexicalTokenKind {
    /// `<name` of a start tag.
    #[strum(serialize = "HTMLTagOpen")]
    TagOpen,
    /// `</name` of an end tag.
    #[strum(serialize = "HTMLEndTagOpen")]
    EndTagOpen,
    /// An attribute name.
    #[strum(serialize = "HTMLIdentifier")]
    Identifier,
    /// The `=` between an attribute name and its value.
    #[strum(serialize = "HTMLAssociation")]
    Association,
    /// An attribute value, quoted or not.
    #[strum(serialize = "HTMLLiteral")]
    Literal,
    /// `>` closing a tag.
    #[strum(serialize = "HTMLTagClose")]
    TagClose,
    /// `/>` closing a tag.
    #[strum(serialize = "HTMLSelfClosingTagClose")]
    SelfClosingTagClose,
    /// Character data in the data state.
    #[strum(serialize = "HTMLText")]
    Text,
    /// Character data inside an RCDATA element.
    #[strum(serialize = "HTMLRCDataText")]
    RcdataText,
    /// Character data inside a RAWTEXT element.
    #[strum(serialize = "HTMLRawText")]
    RawText,
}

/// A lexical token: one piece of the source, as the tokenizer saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalToken {
    /// What kind of piece this is.
    pub kind: LexicalTokenKind,
    /// Where it is.
    pub span: Span,
    /// The (decoded, for text and literals) value.
    pub value: String,
}

/// The kind of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum CommentKind {
    /// `<!-- ... -->`
    #[strum(serialize = "HTMLComment")]
    Comment,
    /// `<! ... >` or `<? ... >`
    #[strum(serialize = "HTMLBogusComment")]
    BogusComment,
}

/// A comment found in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Regular or bogus.
    pub kind: CommentKind,
    /// Where it is, delimiters included.
    pub span: Span,
    /// The text between the delimiters.
    pub value: String,
}
