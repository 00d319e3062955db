//! The token protocol between a lexer and the tree builder.
//!
//! The tree builder pulls tokens one at a time and, between pulls, may
//! change the [`LexerState`] it hands back to the lexer. That feedback is
//! what lets a `<script>` start tag make the following content raw text, or
//! an `<svg>` start tag make a CDATA section legal.

use core::fmt;

use serde::Serialize;
use strum_macros::Display;

use marten_dom::{AttributeKey, AttributeValue, Comment, LexicalToken, Namespace, Span};

use crate::error::ParseError;

/// An attribute as the lexer produced it, before it belongs to an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAttribute {
    /// The lowercased name, with the raw spelling kept alongside.
    pub key: AttributeKey,
    /// The decoded value, absent for bare attributes.
    pub value: Option<AttributeValue>,
    /// Template binding syntax (`v-if`, `:prop`, `@click`, ...).
    pub directive: bool,
    /// From the first character of the name to the end of the value.
    pub span: Span,
}

impl TokenAttribute {
    /// A plain attribute with a value. Key and value share the given span.
    #[must_use]
    pub fn new(name: &str, value: Option<&str>, span: Span) -> Self {
        Self {
            key: AttributeKey {
                name: name.to_ascii_lowercase(),
                raw_name: name.to_string(),
                span,
            },
            value: value.map(|value| AttributeValue {
                value: value.to_string(),
                span,
            }),
            directive: false,
            span,
        }
    }
}

/// The three token shapes the tree builder understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Token {
    /// `<name attr...>` or `<name attr... />`.
    StartTag {
        /// The lowercase tag name.
        name: String,
        /// From `<` to `>`.
        span: Span,
        /// Whether the tag ended with `/>`.
        self_closing: bool,
        /// Attributes in source order.
        attributes: Vec<TokenAttribute>,
    },
    /// `</name>`.
    EndTag {
        /// The lowercase tag name.
        name: String,
        /// From `</` to `>`.
        span: Span,
    },
    /// A run of character data.
    Text {
        /// The decoded text.
        value: String,
        /// Where the text is.
        span: Span,
    },
}

impl Token {
    /// The source range of the token.
    #[must_use]
    pub const fn span(&self) -> &Span {
        match self {
            Self::StartTag { span, .. } | Self::EndTag { span, .. } | Self::Text { span, .. } => {
                span
            }
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag {
                name,
                self_closing,
                attributes,
                ..
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}", attr.key.raw_name)?;
                    if let Some(value) = &attr.value {
                        write!(f, "=\"{}\"", value.value)?;
                    }
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name, .. } => write!(f, "</{name}>"),
            Self::Text { value, .. } => write!(f, "Text({value:?})"),
        }
    }
}

/// How the lexer should read character data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize)]
pub enum LexMode {
    /// Markup is recognized.
    #[default]
    Data,
    /// Only the matching end tag is recognized; character references decode.
    #[strum(serialize = "RCDATA")]
    Rcdata,
    /// Only the matching end tag is recognized; content is verbatim.
    #[strum(serialize = "RAWTEXT")]
    Rawtext,
}

/// Lexer settings the tree builder owns and updates between tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LexerState {
    /// The content model for the next token.
    pub mode: LexMode,
    /// The namespace of the current insertion point.
    pub namespace: Namespace,
    /// Whether template bindings (directives, interpolations) are recognized.
    pub expression_enabled: bool,
}

/// Everything a lexer collected besides the tokens it handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalOutput {
    /// Fine-grained lexical records, in source order.
    pub tokens: Vec<LexicalToken>,
    /// Comments, in source order.
    pub comments: Vec<Comment>,
    /// Errors found while lexing, in detection order.
    pub errors: Vec<ParseError>,
}

/// A pull-based supplier of tokens.
pub trait TokenSource {
    /// The next token, or `None` at the end of input.
    ///
    /// `lexer` reflects every change the tree builder made after the
    /// previous token. A source may also write to it, e.g. to return to
    /// [`LexMode::Data`] after a raw text run ends.
    fn next_token(&mut self, lexer: &mut LexerState) -> Option<Token>;

    /// Hand over the lexical records collected so far.
    fn finish(self) -> LexicalOutput;
}

/// A scripted token source that replays a fixed list and ignores the lexer
/// state.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: std::vec::IntoIter<Token>,
    output: LexicalOutput,
}

impl TokenList {
    /// Replay `tokens` in order.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            output: LexicalOutput::default(),
        }
    }

    /// Replay `tokens`, and report `output` as the lexical records.
    #[must_use]
    pub fn with_output(tokens: Vec<Token>, output: LexicalOutput) -> Self {
        Self {
            tokens: tokens.into_iter(),
            output,
        }
    }
}

impl TokenSource for TokenList {
    fn next_token(&mut self, _lexer: &mut LexerState) -> Option<Token> {
        self.tokens.next()
    }

    fn finish(self) -> LexicalOutput {
        self.output
    }
}
