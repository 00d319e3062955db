//! Tree construction for component templates.

/// Namespace declaration checks.
pub mod attributes;
/// The tree builder driver.
pub mod core;
/// Namespace resolution and integration points.
pub mod namespace;
/// Parser configuration.
pub mod options;
/// The stack of open elements and implied end tags.
pub mod stack;

pub use self::core::{DocumentFragment, TemplateParser, TraceHook, dump_tree};
pub use namespace::{is_html_integration_point, is_mathml_text_integration_point, resolve_namespace};
pub use options::ParserOptions;
pub use stack::ElementStack;
