use marten_dom::{
    AttributeKey, AttributeValue, Comment, CommentKind, LexicalToken, LexicalTokenKind, Position,
};
use strum_macros::Display;

use super::character_reference::decode_character_references;
use super::helpers::{Mark, is_directive_name};
use super::token::{LexMode, LexerState, LexicalOutput, Token, TokenAttribute, TokenSource};
use crate::error::{ErrorCode, ParseError};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The states of the start tag machine. Text, comments and end tags are
/// scanned in one go and need no states of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(super) enum TokenizerState {
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
}

/// A pull tokenizer for component templates.
///
/// Produces start tags, end tags and text on demand and reads the
/// [`LexerState`] the tree builder hands it before every token, so the
/// content model always reflects the element that was just opened.
pub struct TemplateTokenizer {
    pub(super) input: String,
    pub(super) pos: usize,
    pub(super) position: Position,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag_name: Option<String>,

    pub(super) tokens: Vec<LexicalToken>,
    pub(super) comments: Vec<Comment>,
    pub(super) errors: Vec<ParseError>,
}

impl TemplateTokenizer {
    /// Create a new tokenizer for the given input.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            input,
            pos: 0,
            position: Position::START,
            last_start_tag_name: None,
            tokens: Vec::new(),
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self, lexer: &LexerState) -> Option<Token> {
        if self.current_char() == Some('<') {
            match self.peek_codepoint(1) {
                // "ASCII alpha - Create a new start tag token."
                Some(c) if c.is_ascii_alphabetic() => return self.handle_start_tag(lexer),
                // "U+002F SOLIDUS (/) - Switch to the end tag open state."
                Some('/') => return self.handle_end_tag_open_state(),
                // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
                Some('!') => return self.handle_markup_declaration_open_state(lexer),
                // "U+003F QUESTION MARK (?) - This is an
                // unexpected-question-mark-instead-of-tag-name parse error.
                // Create a comment token whose data is the empty string.
                // Reconsume in the bogus comment state."
                Some('?') => {
                    let start = self.mark();
                    let _ = self.consume();
                    self.report(
                        ErrorCode::UnexpectedQuestionMarkInsteadOfTagName,
                        &self.span_from(start),
                    );
                    return self.handle_bogus_comment_state(start);
                }
                // "Anything else - Emit a U+003C LESS-THAN SIGN character
                // token. Reconsume in the data state."
                _ => {}
            }
        }

        let start = self.mark();
        let _ = self.consume();
        while self.current_char().is_some() && !self.markup_follows() {
            let _ = self.consume();
        }
        self.emit_text(start, LexicalTokenKind::Text)
    }

    /// Whether the input continues with something the data state treats as
    /// markup rather than as a literal `<`.
    fn markup_follows(&self) -> bool {
        self.current_char() == Some('<')
            && self
                .peek_codepoint(1)
                .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Everything up to the appropriate end tag is one text token. The mode
    /// returns to data afterwards so that the end tag itself is tokenized
    /// normally.
    fn handle_raw_content_state(&mut self, lexer: &mut LexerState) -> Option<Token> {
        let kind = match lexer.mode {
            LexMode::Rcdata => LexicalTokenKind::RcdataText,
            LexMode::Rawtext | LexMode::Data => LexicalTokenKind::RawText,
        };
        let start = self.mark();
        let end = self
            .find_appropriate_end_tag()
            .unwrap_or(self.input.len());
        self.advance_to(end);
        lexer.mode = LexMode::Data;

        if self.pos == start.offset {
            return None;
        }
        self.emit_text(start, kind)
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-end-tag-token)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted from
    /// this tokenizer, if any."
    ///
    /// Returns the byte offset of the `</` that starts it.
    fn find_appropriate_end_tag(&self) -> Option<usize> {
        let name = self.last_start_tag_name.as_deref()?;
        let rest = &self.input[self.pos..];
        let mut from = 0;
        while let Some(found) = rest[from..].find("</") {
            let at = from + found;
            let candidate = &rest[at + 2..];
            let name_matches = candidate
                .get(..name.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name));
            // "If the current end tag token is an appropriate end tag token"
            // only counts when followed by whitespace, a solidus or `>`.
            let terminated = candidate
                .get(name.len()..)
                .and_then(|after| after.chars().next())
                .is_some_and(|c| Self::is_whitespace_char(c) || matches!(c, '/' | '>'));
            if name_matches && terminated {
                return Some(self.pos + at);
            }
            from = at + 2;
        }
        None
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_start_tag(&mut self, lexer: &LexerState) -> Option<Token> {
        let start = self.mark();
        let _ = self.consume();
        // "ASCII upper alpha - Append the lowercase version of the current
        // input character to the current tag token's tag name."
        let name = self
            .consume_while(|c| !Self::is_whitespace_char(c) && !matches!(c, '/' | '>'))
            .to_ascii_lowercase();
        self.record(LexicalTokenKind::TagOpen, self.span_from(start), name.as_str());

        let mut attributes: Vec<TokenAttribute> = Vec::new();
        let mut self_closing = false;
        let mut state = TokenizerState::BeforeAttributeName;
        loop {
            match state {
                TokenizerState::BeforeAttributeName => {
                    // "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
                    // U+000C FORM FEED (FF), U+0020 SPACE - Ignore the character."
                    let _ = self.consume_while(Self::is_whitespace_char);
                    match self.current_char() {
                        // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
                        None => return self.eof_in_tag(start),
                        // "U+003E GREATER-THAN SIGN (>) - Switch to the data state.
                        // Emit the current tag token."
                        Some('>') => {
                            let close = self.mark();
                            let _ = self.consume();
                            self.record(LexicalTokenKind::TagClose, self.span_from(close), "");
                            break;
                        }
                        Some('/') => state = TokenizerState::SelfClosingStartTag,
                        Some(_) => state = TokenizerState::AttributeName,
                    }
                }
                TokenizerState::SelfClosingStartTag => {
                    let close = self.mark();
                    let _ = self.consume();
                    if self.current_char() == Some('>') {
                        // "U+003E GREATER-THAN SIGN (>) - Set the self-closing flag
                        // of the current tag token."
                        let _ = self.consume();
                        self.record(
                            LexicalTokenKind::SelfClosingTagClose,
                            self.span_from(close),
                            "",
                        );
                        self_closing = true;
                        break;
                    }
                    // "Anything else - This is an unexpected-solidus-in-tag parse
                    // error. Reconsume in the before attribute name state."
                    state = TokenizerState::BeforeAttributeName;
                }
                TokenizerState::AttributeName => {
                    let Some(attr) = self.handle_attribute(&name, lexer) else {
                        return self.eof_in_tag(start);
                    };
                    // "When the user agent leaves the attribute name state ... if
                    // there is already an attribute on the token with the exact
                    // same name, then this is a duplicate-attribute parse error
                    // and the new attribute must be removed from the token."
                    if attributes.iter().any(|a| a.key.name == attr.key.name) {
                        self.report(ErrorCode::DuplicateAttribute, &attr.span);
                    } else {
                        attributes.push(attr);
                    }
                    state = TokenizerState::BeforeAttributeName;
                }
            }
        }

        self.last_start_tag_name = Some(name.clone());
        Some(Token::StartTag {
            name,
            span: self.span_from(start),
            self_closing,
            attributes,
        })
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    /// through
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-quoted-state)
    ///
    /// Returns `None` if the input ends inside the attribute.
    fn handle_attribute(&mut self, tag_name: &str, lexer: &LexerState) -> Option<TokenAttribute> {
        let start = self.mark();
        // "U+003D EQUALS SIGN (=) - This is an
        // unexpected-equals-sign-before-attribute-name parse error. Start a
        // new attribute ... Set that attribute's name to the current input
        // character."
        let first = self.consume()?;
        let mut raw_name = String::from(first);
        raw_name.push_str(
            &self.consume_while(|c| !Self::is_whitespace_char(c) && !matches!(c, '/' | '>' | '=')),
        );
        let name_span = self.span_from(start);
        let name = raw_name.to_ascii_lowercase();
        self.record(LexicalTokenKind::Identifier, name_span, name.as_str());

        let key = AttributeKey {
            name,
            raw_name,
            span: name_span,
        };
        let directive = lexer.expression_enabled && is_directive_name(&key.name, tag_name);

        // [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
        let _ = self.consume_while(Self::is_whitespace_char);
        if self.current_char() != Some('=') {
            return Some(TokenAttribute {
                key,
                value: None,
                directive,
                span: name_span,
            });
        }
        let association = self.mark();
        let _ = self.consume();
        self.record(LexicalTokenKind::Association, self.span_from(association), "=");

        // [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
        let _ = self.consume_while(Self::is_whitespace_char);
        let value_start = self.mark();
        let raw_value = match self.current_char()? {
            quote @ ('"' | '\'') => {
                let _ = self.consume();
                let raw = self.consume_while(|c| c != quote);
                // "EOF - This is an eof-in-tag parse error."
                let _ = self.consume()?;
                raw
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-attribute-value
            // parse error."
            '>' => String::new(),
            _ => self.consume_while(|c| !Self::is_whitespace_char(c) && c != '>'),
        };
        let value_span = self.span_from(value_start);
        let value = decode_character_references(&raw_value, true).into_owned();
        self.record(LexicalTokenKind::Literal, value_span, value.as_str());

        Some(TokenAttribute {
            key,
            value: Some(AttributeValue {
                value,
                span: value_span,
            }),
            directive,
            span: self.span_from(start),
        })
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) -> Option<Token> {
        let start = self.mark();
        match self.peek_codepoint(2) {
            // "ASCII alpha - Create a new end tag token."
            Some(c) if c.is_ascii_alphabetic() => {}
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name
            // parse error. Switch to the data state."
            Some('>') => {
                self.consume_string("</>");
                self.report(ErrorCode::MissingEndTagName, &self.span_from(start));
                return None;
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C
            // LESS-THAN SIGN character token, a U+002F SOLIDUS character token
            // and an end-of-file token."
            None => {
                self.consume_string("</");
                return self.emit_text(start, LexicalTokenKind::Text);
            }
            // "Anything else - This is an invalid-first-character-of-tag-name
            // parse error. Create a comment token whose data is the empty
            // string. Reconsume in the bogus comment state."
            Some(_) => {
                self.consume_string("</");
                return self.handle_bogus_comment_state(start);
            }
        }

        self.consume_string("</");
        let name = self
            .consume_while(|c| !Self::is_whitespace_char(c) && !matches!(c, '/' | '>'))
            .to_ascii_lowercase();
        self.record(LexicalTokenKind::EndTagOpen, self.span_from(start), name.as_str());

        // Attributes and a trailing solidus on end tags carry no meaning.
        let _ = self.consume_while(|c| c != '>');
        let close = self.mark();
        if self.consume().is_none() {
            return self.eof_in_tag(start);
        }
        self.record(LexicalTokenKind::TagClose, self.span_from(close), "");

        Some(Token::EndTag {
            name,
            span: self.span_from(start),
        })
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open_state(&mut self, lexer: &LexerState) -> Option<Token> {
        let start = self.mark();

        // "Two U+002D HYPHEN-MINUS characters (-) - Consume those two
        // characters, create a comment token whose data is the empty string,
        // and switch to the comment start state."
        if self.next_few_characters_are("<!--") {
            self.consume_string("<!--");
            self.handle_comment_state(start);
            return None;
        }

        // "The string "[CDATA[" (the five uppercase letters "CDATA" with a
        // U+005B LEFT SQUARE BRACKET character before and after) - Consume
        // those characters. If there is an adjusted current node and it is
        // not an element in the HTML namespace, then switch to the CDATA
        // section state. Otherwise, this is a cdata-in-html-content parse
        // error."
        if self.next_few_characters_are("<![CDATA[") {
            if lexer.namespace.is_foreign() {
                return self.handle_cdata_section_state(start);
            }
            self.report(ErrorCode::CdataInHtmlContent, &self.span_from(start));
        }

        // "Anything else - This is an incorrectly-opened-comment parse error.
        // Create a comment token whose data is the empty string. Switch to
        // the bogus comment state (don't consume anything in the current
        // state)."
        self.consume_string("<!");
        self.handle_bogus_comment_state(start)
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    /// through
    /// [§ 13.2.5.52 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_state(&mut self, start: Mark) {
        // "This is an abrupt-closing-of-empty-comment parse error. Switch to
        // the data state. Emit the current comment token."
        for abrupt in [">", "->"] {
            if self.next_few_characters_are(abrupt) {
                self.consume_string(abrupt);
                self.push_comment(CommentKind::Comment, start, String::new());
                return;
            }
        }

        let data_start = self.pos;
        if let Some(found) = self.input[self.pos..].find("-->") {
            let value = self.input[data_start..data_start + found].to_string();
            self.advance_to(data_start + found + 3);
            self.push_comment(CommentKind::Comment, start, value);
        } else {
            // "EOF - This is an eof-in-comment parse error. Emit the current
            // comment token."
            let value = self.input[data_start..].to_string();
            self.advance_to(self.input.len());
            self.report(ErrorCode::EofInComment, &self.span_from(start));
            self.push_comment(CommentKind::Comment, start, value);
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    ///
    /// "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit the
    /// current comment token." At EOF the comment is emitted as well.
    fn handle_bogus_comment_state(&mut self, start: Mark) -> Option<Token> {
        let value = self.consume_while(|c| c != '>');
        let _ = self.consume();
        self.push_comment(CommentKind::BogusComment, start, value);
        None
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// The content becomes a text token, verbatim.
    fn handle_cdata_section_state(&mut self, start: Mark) -> Option<Token> {
        self.consume_string("<![CDATA[");
        let data_start = self.pos;
        let (data_end, resume) = self.input[data_start..]
            .find("]]>")
            .map_or((self.input.len(), self.input.len()), |found| {
                (data_start + found, data_start + found + 3)
            });
        let value = self.input[data_start..data_end].to_string();
        self.advance_to(resume);
        let span = self.span_from(start);
        self.record(LexicalTokenKind::Text, span, value.as_str());
        Some(Token::Text { value, span })
    }

    /// "This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    fn eof_in_tag(&mut self, start: Mark) -> Option<Token> {
        self.advance_to(self.input.len());
        self.report(ErrorCode::EofInTag, &self.span_from(start));
        None
    }

    /// Emit the input from `start` to the current position as text.
    /// Raw text is kept verbatim; everything else has its character
    /// references decoded.
    fn emit_text(&mut self, start: Mark, kind: LexicalTokenKind) -> Option<Token> {
        let span = self.span_from(start);
        let raw = &self.input[start.offset..self.pos];
        let value = if kind == LexicalTokenKind::RawText {
            raw.to_string()
        } else {
            decode_character_references(raw, false).into_owned()
        };
        self.record(kind, span, value.as_str());
        Some(Token::Text { value, span })
    }

    fn push_comment(&mut self, kind: CommentKind, start: Mark, value: String) {
        let span = self.span_from(start);
        self.comments.push(Comment { kind, span, value });
    }
}

impl TokenSource for TemplateTokenizer {
    fn next_token(&mut self, lexer: &mut LexerState) -> Option<Token> {
        // Every pass consumes input or leaves a raw text mode, so this
        // terminates.
        while !self.is_eof() {
            let token = match lexer.mode {
                LexMode::Data => self.handle_data_state(lexer),
                LexMode::Rcdata | LexMode::Rawtext => self.handle_raw_content_state(lexer),
            };
            if token.is_some() {
                return token;
            }
        }
        None
    }

    fn finish(self) -> LexicalOutput {
        LexicalOutput {
            tokens: self.tokens,
            comments: self.comments,
            errors: self.errors,
        }
    }
}
