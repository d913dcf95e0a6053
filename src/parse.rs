//! Reading an SVG document into the tree the optimizer visits.
//!
//! The reader is deliberately lossless: comments, whitespace and unknown
//! elements all survive untouched, so the only difference between input and
//! output is what the path optimizer itself rewrote. Elements are built by
//! a single event loop over a stack of open elements rather than by
//! recursing into the reader, which also gives errors a byte position to
//! point at.

use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesStart, Event};

use crate::ast::{Attribute, Document, Element, Node, QName, XmlDeclaration};
use crate::error::PathminError;

/// Parse an SVG string into a [`Document`].
pub fn parse_svg(svg: &str) -> Result<Document, PathminError> {
    let mut reader = Reader::from_str(svg);
    let mut xml_declaration = None;
    let mut doctype = None;
    // elements whose end tag has not been seen yet, outermost first
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Decl(decl) if open.is_empty() && root.is_none() => {
                xml_declaration = Some(read_declaration(&decl));
            }
            Event::DocType(text) if open.is_empty() && root.is_none() => {
                doctype = Some(String::from_utf8_lossy(&text).into_owned());
            }
            Event::Start(tag) => {
                open.push(element_from_tag(&tag)?);
            }
            Event::Empty(tag) => {
                let element = element_from_tag(&tag)?;
                match open.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => {
                        root = Some(element);
                        break;
                    }
                }
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| PathminError::Unbalanced(reader.buffer_position()))?;
                match open.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => {
                        root = Some(element);
                        break;
                    }
                }
            }
            Event::Text(text) => {
                if let Some(parent) = open.last_mut() {
                    parent.children.push(Node::Text(text.unescape()?.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = open.last_mut() {
                    parent
                        .children
                        .push(Node::CData(String::from_utf8_lossy(&data).into_owned()));
                }
            }
            Event::Comment(text) => {
                if let Some(parent) = open.last_mut() {
                    parent
                        .children
                        .push(Node::Comment(String::from_utf8_lossy(&text).into_owned()));
                }
            }
            Event::PI(pi) => {
                if let Some(parent) = open.last_mut() {
                    let body = String::from_utf8_lossy(&pi).into_owned();
                    let node = match body.split_once(char::is_whitespace) {
                        Some((target, rest)) => Node::ProcessingInstruction {
                            target: target.to_string(),
                            content: Some(rest.to_string()),
                        },
                        None => Node::ProcessingInstruction {
                            target: body,
                            content: None,
                        },
                    };
                    parent.children.push(node);
                }
            }
            Event::Eof => {
                if let Some(unclosed) = open.last() {
                    return Err(PathminError::Truncated(unclosed.name.full_name()));
                }
                break;
            }
            _ => {}
        }
    }

    let root = root.ok_or(PathminError::EmptyDocument)?;

    Ok(Document {
        xml_declaration,
        doctype,
        root,
    })
}

/// Build an element shell (name and attributes) from a start or empty tag.
fn element_from_tag(tag: &BytesStart) -> Result<Element, PathminError> {
    let name = QName::parse(std::str::from_utf8(tag.name().as_ref())?);
    let mut attributes = Vec::new();
    for entry in tag.attributes() {
        let entry = entry.map_err(|source| PathminError::Attribute {
            element: name.full_name(),
            source,
        })?;
        attributes.push(Attribute {
            name: QName::parse(std::str::from_utf8(entry.key.as_ref())?),
            value: entry.unescape_value()?.into_owned(),
        });
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Decode the `<?xml ...?>` prolog, falling back to version 1.0 when the
/// declaration is mangled.
fn read_declaration(decl: &BytesDecl) -> XmlDeclaration {
    let text = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();
    XmlDeclaration {
        version: decl
            .version()
            .map(|v| text(&v))
            .unwrap_or_else(|_| "1.0".to_string()),
        encoding: decl.encoding().and_then(|e| e.ok()).map(|e| text(&e)),
        standalone: decl
            .standalone()
            .and_then(|s| s.ok())
            .map(|s| s.as_ref() == b"yes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_svg() {
        let svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
    <path d="M10 10 L20 20"/>
</svg>"#;

        let doc = parse_svg(svg).unwrap();
        assert!(doc.xml_declaration.is_some());
        assert!(doc.root.is("svg"));
        assert_eq!(doc.root.get_attr("width"), Some("100"));
        let path = doc.root.child_elements().next().unwrap();
        assert_eq!(path.get_attr("d"), Some("M10 10 L20 20"));
    }

    #[test]
    fn test_parse_nested_groups() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
    <g stroke="red"><path d="M0 0h10"/></g>
</svg>"#;

        let doc = parse_svg(svg).unwrap();
        let g = doc.root.child_elements().next().unwrap();
        assert!(g.is("g"));
        assert!(g.child_elements().next().unwrap().is("path"));
    }

    #[test]
    fn test_parse_style_element() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><style>.a { fill: red }</style></svg>"#;
        let doc = parse_svg(svg).unwrap();
        let style = doc.root.child_elements().next().unwrap();
        assert!(style.is("style"));
        assert!(matches!(&style.children[0], Node::Text(t) if t.contains("fill")));
    }

    #[test]
    fn test_whitespace_and_comments_survive() {
        let svg = "<svg xmlns=\"http://www.w3.org/2000/svg\">\n  <!-- keep -->\n</svg>";
        let doc = parse_svg(svg).unwrap();
        assert!(doc
            .root
            .children
            .iter()
            .any(|n| matches!(n, Node::Comment(c) if c.contains("keep"))));
        assert!(doc
            .root
            .children
            .iter()
            .any(|n| matches!(n, Node::Text(t) if t.trim().is_empty())));
    }

    #[test]
    fn test_truncated_document() {
        // depending on how much the reader itself validates, this surfaces
        // as Truncated or as an Xml error; it must never parse
        assert!(parse_svg("<svg xmlns=\"x\"><g>").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            parse_svg("<!-- nothing here -->"),
            Err(PathminError::EmptyDocument)
        ));
    }
}
