use std::fmt::Display;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::XMLNS_NAMESPACE;
use crate::document::Document;
use crate::entities::resolve_entity;
use crate::error::{ParseErrKind, ParseError};
use crate::node::{Attribute, ElementData, NodeId, NodeKind, QualName, XmlDecl};

type Reader<'source> = NsReader<&'source [u8]>;

impl Document {
    /// Parse an XML (or XHTML) document.
    ///
    /// Whitespace-only text is kept, so that serializing an unchanged document reproduces the
    /// input up to attribute quoting and entity references.
    pub fn parse(input: &str) -> Result<Document, ParseError> {
        let mut reader = NsReader::from_str(input);
        let mut doc = Document::new();
        // Open elements, each with the byte range of its start tag.
        let mut open: Vec<(NodeId, usize, usize)> = Vec::new();

        loop {
            let start = reader.buffer_position() as usize;
            let read = reader
                .read_resolved_event()
                .map(|(resolved, event)| (owned_namespace(&resolved), event));
            let (namespace, event) = match read {
                Ok(pair) => pair,
                Err(err) => {
                    let position = reader.error_position() as usize;
                    return Err(ParseError(position..position, syntax(err)));
                }
            };
            let end = reader.buffer_position() as usize;
            let at = |kind: ParseErrKind| ParseError(start..end, kind);
            let parent = open.last().map_or(doc.root(), |&(id, ..)| id);

            match event {
                Event::Start(e) => {
                    let element =
                        element_data(&reader, namespace.map_err(at)?, &e).map_err(at)?;
                    let id = doc.push_child(parent, NodeKind::Element(element));
                    open.push((id, start, end));
                }
                Event::Empty(e) => {
                    let element =
                        element_data(&reader, namespace.map_err(at)?, &e).map_err(at)?;
                    doc.push_child(parent, NodeKind::Element(element));
                }
                Event::End(_) => {
                    // The tokenizer already checks that end tags match their start tags.
                    open.pop();
                }
                Event::Text(e) => {
                    let text = e.unescape_with(resolve_entity).map_err(|err| at(syntax(err)))?;
                    doc.push_child(parent, NodeKind::Text(text.as_ref().into()));
                }
                Event::CData(e) => {
                    let text = utf8(&e).map_err(at)?;
                    doc.push_child(parent, NodeKind::Text(text.into()));
                }
                Event::Comment(e) => {
                    let text = utf8(&e).map_err(at)?;
                    doc.push_child(parent, NodeKind::Comment(text.into()));
                }
                Event::PI(e) => {
                    let text = utf8(&e).map_err(at)?;
                    doc.push_child(parent, NodeKind::ProcessingInstruction(text.into()));
                }
                Event::DocType(e) => {
                    let text = utf8(&e).map_err(at)?;
                    doc.push_child(parent, NodeKind::Doctype(text.into()));
                }
                Event::Decl(e) => {
                    let version = e.version().map_err(|err| at(syntax(err)))?;
                    let encoding = e.encoding().transpose().map_err(|err| at(syntax(err)))?;
                    let standalone = e.standalone().transpose().map_err(|err| at(syntax(err)))?;
                    let decl = XmlDecl {
                        version: utf8(&version).map_err(at)?.into(),
                        encoding: encoding
                            .as_deref()
                            .map(utf8)
                            .transpose()
                            .map_err(at)?
                            .map(Into::into),
                        standalone: standalone
                            .as_deref()
                            .map(utf8)
                            .transpose()
                            .map_err(at)?
                            .map(Into::into),
                    };
                    doc.push_child(parent, NodeKind::Declaration(decl));
                }
                Event::Eof => {
                    if let Some(&(id, start, end)) = open.last() {
                        let name = doc.name(id).map_or("", |name| &name.local);
                        return Err(ParseError(
                            start..end,
                            ParseErrKind::UnclosedElement(name.into()),
                        ));
                    }
                    break;
                }
            }
        }
        Ok(doc)
    }
}

fn element_data(
    reader: &Reader<'_>,
    ns: Box<str>,
    e: &BytesStart<'_>,
) -> Result<ElementData, ParseErrKind> {
    let prefix = e.name().prefix().map(|p| utf8(p.into_inner())).transpose()?;
    let local = utf8(e.local_name().into_inner())?;
    let name = QualName::with_prefix(&ns, prefix, local);

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(syntax)?;
        let key = attr.key.into_inner();
        let name = if key == b"xmlns" {
            QualName::with_prefix(XMLNS_NAMESPACE, None, "xmlns")
        } else if let Some(declared) = key.strip_prefix(b"xmlns:") {
            QualName::with_prefix(XMLNS_NAMESPACE, Some("xmlns"), utf8(declared)?)
        } else {
            let (resolved, local) = reader.resolve_attribute(attr.key);
            let ns = owned_namespace(&resolved)?;
            let prefix = attr
                .key
                .prefix()
                .map(|p| utf8(p.into_inner()))
                .transpose()?;
            QualName::with_prefix(&ns, prefix, utf8(local.into_inner())?)
        };
        let value = attr.unescape_value_with(resolve_entity).map_err(syntax)?;
        attributes.push(Attribute {
            name,
            value: value.into_owned(),
        });
    }
    Ok(ElementData { name, attributes })
}

fn owned_namespace(resolved: &ResolveResult<'_>) -> Result<Box<str>, ParseErrKind> {
    match resolved {
        ResolveResult::Bound(ns) => utf8(ns.as_ref()).map(Into::into),
        ResolveResult::Unbound => Ok("".into()),
        ResolveResult::Unknown(prefix) => Err(ParseErrKind::UnknownPrefix(
            String::from_utf8_lossy(prefix).into(),
        )),
    }
}

#[inline]
fn utf8(bytes: &[u8]) -> Result<&str, ParseErrKind> {
    std::str::from_utf8(bytes).map_err(|_| ParseErrKind::InvalidUtf8)
}

fn syntax(err: impl Display) -> ParseErrKind {
    ParseErrKind::Syntax(err.to_string().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MATHML_NAMESPACE;

    #[test]
    fn parse_namespaces() {
        let doc = Document::parse(
            r#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:m="http://www.w3.org/1998/Math/MathML"><m:math><m:mi m:x="1">x</m:mi></m:math></html>"#,
        )
        .unwrap();
        let html = doc.document_element().unwrap();
        assert!(doc.is_element(html, "http://www.w3.org/1999/xhtml", "html"));
        assert_eq!(doc.attributes(html).len(), 2);
        assert_eq!(
            doc.get_attribute(html, XMLNS_NAMESPACE, "m"),
            Some(MATHML_NAMESPACE)
        );

        let mi = doc
            .first_element_by_tag_name_ns(doc.root(), MATHML_NAMESPACE, "mi")
            .unwrap();
        assert_eq!(doc.name(mi).unwrap().prefix.as_deref(), Some("m"));
        assert_eq!(doc.get_attribute(mi, MATHML_NAMESPACE, "x"), Some("1"));
        assert_eq!(doc.text_content(mi), "x");
    }

    #[test]
    fn parse_entities() {
        let doc = Document::parse(
            r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mo title="a&amp;b">&lt;&nbsp;&#x2062;&InvisibleTimes;</mo></math>"#,
        )
        .unwrap();
        let mo = doc
            .first_element_by_tag_name_ns(doc.root(), MATHML_NAMESPACE, "mo")
            .unwrap();
        assert_eq!(doc.get_attribute(mo, "", "title"), Some("a&b"));
        assert_eq!(doc.text_content(mo), "<\u{00A0}\u{2062}\u{2062}");
    }

    #[test]
    fn parse_keeps_whitespace_and_misc() {
        let doc = Document::parse(
            "<?xml version=\"1.0\"?>\n<!-- note -->\n<math> <mi>x</mi> </math>",
        )
        .unwrap();
        let root = doc.root();
        assert!(matches!(doc.kind(doc.children(root)[0]), NodeKind::Declaration(_)));
        assert!(matches!(doc.kind(doc.children(root)[2]), NodeKind::Comment(_)));
        let math = doc.document_element().unwrap();
        assert_eq!(doc.children(math).len(), 3);
        assert_eq!(doc.text(doc.children(math)[0]), Some(" "));
    }

    #[test]
    fn unclosed_element() {
        let err = Document::parse("<math><mrow><mi>x</mi></mrow>").unwrap_err();
        assert!(matches!(&err.1, ParseErrKind::UnclosedElement(name) if &**name == "math"));
        assert_eq!(err.0, 0..6);
    }

    #[test]
    fn mismatched_end_tag() {
        let err = Document::parse("<math><mrow></mi></math>").unwrap_err();
        assert!(matches!(err.1, ParseErrKind::Syntax(_)));
    }

    #[test]
    fn undeclared_prefix() {
        let err = Document::parse("<m:math/>").unwrap_err();
        assert!(matches!(&err.1, ParseErrKind::UnknownPrefix(prefix) if &**prefix == "m"));
    }

    #[test]
    fn unknown_entity() {
        let err = Document::parse("<math>&bogus;</math>").unwrap_err();
        assert!(matches!(err.1, ParseErrKind::Syntax(_)));
    }
}
