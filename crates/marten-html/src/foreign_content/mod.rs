//! Name adjustment for SVG and MathML islands.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attribute_name;
pub use svg::{adjust_svg_attribute_name, adjust_svg_tag_name};

use marten_dom::Namespace;

/// The element name to store for a lowercase tag name in `namespace`.
///
/// Only SVG element names are adjusted; HTML and MathML names are kept as
/// the tokenizer produced them.
#[must_use]
pub fn adjust_element_name(name: &str, namespace: Namespace) -> String {
    match namespace {
        Namespace::Svg => adjust_svg_tag_name(name).unwrap_or(name).to_string(),
        _ => name.to_string(),
    }
}

/// The attribute name to store for a lowercase attribute name on an element
/// in `namespace`.
#[must_use]
pub fn adjust_attribute_name(name: &str, namespace: Namespace) -> String {
    let adjusted = match namespace {
        Namespace::Svg => adjust_svg_attribute_name(name),
        Namespace::MathMl => adjust_mathml_attribute_name(name),
        Namespace::Html | Namespace::XLink => None,
    };
    adjusted.unwrap_or(name).to_string()
}
