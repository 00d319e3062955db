//! Namespace declaration checks for start tag attributes.

use marten_dom::{Attribute, Namespace};

use crate::error::ErrorCode;

/// Check a start tag attribute against the namespace its element ends up in.
///
/// A plain `xmlns` attribute must name the element's namespace and a plain
/// `xmlns:xlink` attribute must name the XLink namespace. A declaration
/// without a value never matches. Directives (`:xmlns`) are bindings, not
/// declarations, and are not checked.
#[must_use]
pub fn check_namespace_declaration(attribute: &Attribute, namespace: Namespace) -> Option<ErrorCode> {
    if attribute.directive {
        return None;
    }
    let expected = match attribute.key.name.as_str() {
        "xmlns" => namespace.uri(),
        "xmlns:xlink" => Namespace::XLink.uri(),
        _ => return None,
    };
    let value = attribute.value.as_ref().map(|value| value.value.as_str());
    (value != Some(expected)).then_some(ErrorCode::XInvalidNamespace)
}
