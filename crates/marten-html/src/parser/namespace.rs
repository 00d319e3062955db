//! Namespace resolution for new elements.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! Templates are HTML by default. `<svg>` and `<math>` open foreign islands,
//! and a handful of elements inside those islands open HTML islands again.

use marten_dom::{ElementData, Namespace};

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A node is an HTML integration point if it is one of the following
/// elements:
/// - A MathML annotation-xml element whose start tag token had an attribute
///   with the name "encoding" whose value was an ASCII case-insensitive match
///   for the string "text/html"
/// - A MathML annotation-xml element whose start tag token had an attribute
///   with the name "encoding" whose value was an ASCII case-insensitive match
///   for the string "application/xhtml+xml"
/// - An SVG foreignObject element
/// - An SVG desc element
/// - An SVG title element"
///
/// The `encoding` value is compared exactly, not case-insensitively.
#[must_use]
pub fn is_html_integration_point(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::MathMl => {
            element.name == "annotation-xml"
                && matches!(
                    element.attribute_value("encoding"),
                    Some("text/html" | "application/xhtml+xml")
                )
        }
        Namespace::Svg => matches!(element.name.as_str(), "foreignObject" | "desc" | "title"),
        Namespace::Html | Namespace::XLink => false,
    }
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: A MathML mi element, A MathML mo element, A MathML mn element,
/// A MathML ms element, A MathML mtext element"
#[must_use]
pub fn is_mathml_text_integration_point(element: &ElementData) -> bool {
    element.namespace == Namespace::MathMl
        && matches!(element.name.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// The namespace for a new `tag_name` element.
///
/// `parent` is the insertion point (`None` at the top level) and `current`
/// is the namespace the lexer is in.
///
/// STEP 1: Inside a foreign island, decide whether the parent lets HTML back in.
/// STEP 2: In HTML, `svg` and `math` open foreign islands.
/// STEP 3: Otherwise keep the effective namespace.
#[must_use]
pub fn resolve_namespace(parent: Option<&ElementData>, current: Namespace, tag_name: &str) -> Namespace {
    let mut namespace = current;

    // STEP 1
    if matches!(namespace, Namespace::Svg | Namespace::MathMl)
        && let Some(parent) = parent
    {
        // "A start tag whose tag name is "svg"" inside a MathML annotation-xml
        // element stays in foreign content.
        if parent.namespace == Namespace::MathMl
            && parent.name == "annotation-xml"
            && tag_name == "svg"
        {
            return Namespace::Svg;
        }
        // "If the adjusted current node is a MathML text integration point and
        // the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark"" or "If the adjusted current node is an HTML
        // integration point and the token is a start tag", the token is
        // processed as HTML content.
        if is_html_integration_point(parent)
            || (is_mathml_text_integration_point(parent)
                && tag_name != "mglyph"
                && tag_name != "malignmark")
        {
            namespace = Namespace::Html;
        }
    }

    // STEP 2
    if namespace == Namespace::Html {
        return match tag_name {
            "svg" => Namespace::Svg,
            "math" => Namespace::MathMl,
            _ => Namespace::Html,
        };
    }

    // STEP 3
    namespace
}
