//! Template tokenizer.
//!
//! Implements the subset of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! that component templates need, behind the pull-based [`TokenSource`]
//! protocol the tree builder consumes.

/// Character reference decoding for text and attribute values.
pub mod character_reference;
/// The template tokenizer state machine.
pub mod core;
/// Helper methods for input handling and position tracking.
pub mod helpers;
/// The token protocol shared with the tree builder.
pub mod token;

pub use self::core::TemplateTokenizer;
pub use character_reference::decode_character_references;
pub use helpers::is_directive_name;
pub use token::{LexMode, LexerState, LexicalOutput, Token, TokenAttribute, TokenList, TokenSource};
