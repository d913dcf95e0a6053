use thiserror::Error;

/// Failures surfaced while reading an SVG document or its path data.
///
/// Rewrites inside the optimizer never fail; a rewrite that cannot be
/// applied is simply declined and the path kept as-is. What can fail is the
/// plumbing around it: decoding the document and parsing a `d` attribute's
/// grammar. Callers that hit [`PathminError::PathData`] for one element can
/// keep that element untouched and continue with the rest of the document.
#[derive(Debug, Error)]
pub enum PathminError {
    /// The XML reader gave up on the input.
    #[error("unreadable XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An element's attribute list could not be decoded.
    #[error("bad attribute on <{element}>: {source}")]
    Attribute {
        element: String,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    /// A closing tag appeared with no element open.
    #[error("unbalanced markup near byte {0}")]
    Unbalanced(u64),

    /// The input ended while an element was still open.
    #[error("document ended inside <{0}>")]
    Truncated(String),

    /// Nothing in the input was an element.
    #[error("no root element in document")]
    EmptyDocument,

    /// A `d` attribute did not follow the path data grammar.
    #[error("unusable path data: {0}")]
    PathData(String),

    /// An element or attribute name was not UTF-8.
    #[error("non-UTF-8 content: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
