//! Template parser for the marten toolchain.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tree construction** for HTML-like component templates
//!   - Namespace resolution for SVG and MathML islands, including HTML and
//!     MathML text integration points
//!   - Implied end tags for paragraphs, list items, table parts and
//!     description list items
//!   - Void and self-closing elements, with the template dialect's
//!     permissive self-closing
//!   - `xmlns` / `xmlns:xlink` validation
//!   - Lexer feedback: RCDATA/RAWTEXT content, template binding recognition
//!     and `v-pre` regions
//!
//! - **A template tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   feeding the tree builder through the pull-based [`TokenSource`] protocol
//!
//! # Not Implemented
//!
//! - Insertion modes, foster parenting and the adoption agency algorithm
//! - Quirks mode
//! - Parsing of binding expressions

/// Parse errors and their codes.
pub mod error;
/// SVG and MathML name adjustment.
pub mod foreign_content;
/// Tree construction.
pub mod parser;
/// Tag name classification tables.
pub mod tag_names;
/// The template tokenizer and the token protocol.
pub mod tokenizer;

pub use error::{ErrorCode, ParseError};
pub use parser::{DocumentFragment, ParserOptions, TemplateParser, TraceHook, dump_tree};
pub use tokenizer::{
    LexMode, LexerState, TemplateTokenizer, Token, TokenAttribute, TokenList, TokenSource,
};

/// Tokenize and parse a template with the default options.
#[must_use]
pub fn parse_template(source: &str) -> DocumentFragment {
    parse_template_with_options(source, ParserOptions::default())
}

/// Tokenize and parse a template.
#[must_use]
pub fn parse_template_with_options(source: &str, options: ParserOptions) -> DocumentFragment {
    TemplateParser::with_options(TemplateTokenizer::new(source.to_string()), options).parse()
}
