//! [§ 2.1.8 Namespaces](https://infra.spec.whatwg.org/#namespaces)

use serde::Serialize;
use strum_macros::Display;

/// "The HTML namespace is `http://www.w3.org/1999/xhtml`."
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
/// "The MathML namespace is `http://www.w3.org/1998/Math/MathML`."
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";
/// "The SVG namespace is `http://www.w3.org/2000/svg`."
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
/// "The XLink namespace is `http://www.w3.org/1999/xlink`."
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// The namespaces an element or attribute can live in.
///
/// `XLink` only ever applies to attributes; elements are always HTML, SVG or
/// MathML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// The HTML namespace.
    #[default]
    #[strum(serialize = "html")]
    Html,
    /// The SVG namespace.
    #[strum(serialize = "svg")]
    Svg,
    /// The MathML namespace.
    #[strum(serialize = "mathml")]
    MathMl,
    /// The XLink namespace (attributes only).
    #[strum(serialize = "xlink")]
    XLink,
}

impl Namespace {
    /// The namespace URI, as written in an `xmlns` attribute.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Html => HTML_NAMESPACE,
            Self::Svg => SVG_NAMESPACE,
            Self::MathMl => MATHML_NAMESPACE,
            Self::XLink => XLINK_NAMESPACE,
        }
    }

    /// Whether this is SVG or MathML.
    #[must_use]
    pub const fn is_foreign(self) -> bool {
        matches!(self, Self::Svg | Self::MathMl)
    }
}
