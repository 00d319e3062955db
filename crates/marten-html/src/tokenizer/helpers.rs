//! Helper functions for the template tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - Input/character handling ("Consume the next input character")
//! - Source position tracking for spans
//! - Recording lexical tokens and errors
//! - Directive name recognition

use marten_dom::{LexicalToken, LexicalTokenKind, Position, Span};

use super::core::TemplateTokenizer;
use crate::error::{ErrorCode, ParseError};

/// A saved input position, used as the start of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Mark {
    pub(super) offset: usize,
    pub(super) position: Position,
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl TemplateTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Consume the next input character"
    ///
    /// Returns the character at the current position and advances past it,
    /// keeping the line and column in step.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    /// The character at the current position, without consuming it.
    pub(super) fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Peek at a codepoint at the given offset from the current position
    /// without consuming it.
    pub(super) fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    /// "If the next few characters are..."
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.pos..].starts_with(target)
    }

    /// Consume `target`, which the caller has already matched with
    /// [`Self::next_few_characters_are`].
    pub(super) fn consume_string(&mut self, target: &str) {
        self.advance_to(self.pos + target.len());
    }

    /// Consume characters up to (not including) byte offset `offset`.
    pub(super) fn advance_to(&mut self, offset: usize) {
        while self.pos < offset && self.consume().is_some() {}
    }

    /// Consume characters for as long as `predicate` holds and return them.
    pub(super) fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if !predicate(c) {
                break;
            }
            let _ = self.consume();
        }
        self.input[start..self.pos].to_string()
    }

    /// Whether the whole input has been consumed.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
    /// or U+0020 SPACE."
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C' | '\r')
    }
}

// =============================================================================
// Position and Record Helpers
// =============================================================================

impl TemplateTokenizer {
    /// The current position, to be turned into a span later.
    pub(super) const fn mark(&self) -> Mark {
        Mark {
            offset: self.pos,
            position: self.position,
        }
    }

    /// The span from `mark` to the current position.
    pub(super) const fn span_from(&self, mark: Mark) -> Span {
        Span::new(mark.offset, self.pos, mark.position, self.position)
    }

    /// Append a fine-grained lexical record.
    pub(super) fn record(&mut self, kind: LexicalTokenKind, span: Span, value: impl Into<String>) {
        self.tokens.push(LexicalToken {
            kind,
            span,
            value: value.into(),
        });
    }

    /// Record a lexing error located at the start of `span`.
    pub(super) fn report(&mut self, code: ErrorCode, span: &Span) {
        self.errors.push(ParseError::at(code, span));
    }
}

/// Whether an attribute called `name` on a `tag_name` start tag is template
/// binding syntax.
///
/// Directives start with `v-`, `:`, `@`, `#` or `.`, have at least one more
/// character, and do not end with one of `.:@#` (so `@` or `v-on:` alone are
/// plain attributes). `slot-scope` is always a directive and `scope` is one
/// on `template` elements.
#[must_use]
pub fn is_directive_name(name: &str, tag_name: &str) -> bool {
    let prefix = if name.starts_with("v-") {
        2
    } else if name.starts_with(['.', ':', '@', '#']) {
        1
    } else {
        0
    };
    let binding = prefix > 0 && name.len() > prefix && !name.ends_with(['.', ':', '@', '#']);
    binding || name == "slot-scope" || (tag_name == "template" && name == "scope")
}
