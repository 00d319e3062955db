//! MathML name adjustments.

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "When the steps below require the user agent to adjust MathML attributes for
/// a token, then, if the token has an attribute named definitionurl, change its
/// name to definitionURL (note the case difference)."
#[must_use]
pub fn adjust_mathml_attribute_name(name: &str) -> Option<&'static str> {
    (name == "definitionurl").then_some("definitionURL")
}
