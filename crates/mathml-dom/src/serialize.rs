use crate::document::Document;
use crate::escape::{escape_double_quoted_attribute, escape_text};
use crate::node::{ElementData, NodeId, NodeKind, QualName, XmlDecl};

/// Pending serialization work, popped from a stack so that nesting depth does not grow the
/// call stack.
enum Step<'doc> {
    /// A node to write, with the default namespace in scope at its position.
    Node(NodeId, &'doc str),
    /// The end tag of an element whose children have been written.
    EndTag(&'doc QualName),
}

impl Document {
    /// Serialize the whole document.
    pub fn to_xml_string(&self) -> String {
        let mut output = String::new();
        self.emit(&mut output, self.root());
        output
    }

    /// Serialize the subtree rooted at `id` into `output`.
    ///
    /// An unprefixed element whose namespace differs from the default namespace in scope is
    /// written with its own `xmlns` declaration, so elements created in the MathML namespace
    /// under a prefixed `<m:math>` still serialize into the right namespace.
    pub fn emit(&self, output: &mut String, id: NodeId) {
        let default_ns = self
            .parent(id)
            .map_or("", |parent| self.default_namespace_in_scope(parent));
        let mut stack = vec![Step::Node(id, default_ns)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Node(node, default_ns) => {
                    self.emit_node(output, &mut stack, node, default_ns);
                }
                Step::EndTag(name) => {
                    output.push_str("</");
                    name.write_qualified(output);
                    output.push('>');
                }
            }
        }
    }

    fn default_namespace_in_scope(&self, id: NodeId) -> &str {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(decl) = self
                .attributes(node)
                .iter()
                .find(|attr| attr.is_default_namespace_declaration())
            {
                return &decl.value;
            }
            current = self.parent(node);
        }
        ""
    }

    fn push_children<'doc>(
        &'doc self,
        stack: &mut Vec<Step<'doc>>,
        id: NodeId,
        default_ns: &'doc str,
    ) {
        stack.extend(
            self.children(id)
                .iter()
                .rev()
                .map(|&child| Step::Node(child, default_ns)),
        );
    }

    fn emit_node<'doc>(
        &'doc self,
        output: &mut String,
        stack: &mut Vec<Step<'doc>>,
        id: NodeId,
        default_ns: &'doc str,
    ) {
        match self.kind(id) {
            NodeKind::Document => self.push_children(stack, id, default_ns),
            NodeKind::Element(element) => {
                let scope_default = emit_start_tag(output, element, default_ns);
                if self.children(id).is_empty() {
                    output.push_str("/>");
                } else {
                    output.push('>');
                    stack.push(Step::EndTag(&element.name));
                    self.push_children(stack, id, scope_default);
                }
            }
            NodeKind::Text(text) => escape_text(output, text),
            NodeKind::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeKind::ProcessingInstruction(text) => {
                output.push_str("<?");
                output.push_str(text);
                output.push_str("?>");
            }
            NodeKind::Doctype(text) => {
                output.push_str("<!DOCTYPE ");
                output.push_str(text);
                output.push('>');
            }
            NodeKind::Declaration(decl) => emit_declaration(output, decl),
        }
    }
}

/// Write `<name attr="...">` without the closing `>` or `/>`. Returns the default namespace
/// in scope for the children.
fn emit_start_tag<'doc>(
    output: &mut String,
    element: &'doc ElementData,
    default_ns: &'doc str,
) -> &'doc str {
    let declared = element
        .attributes
        .iter()
        .find(|attr| attr.is_default_namespace_declaration())
        .map(|attr| attr.value.as_str());
    let mut scope_default = declared.unwrap_or(default_ns);
    let mut fixup = None;
    if element.name.prefix.is_none() && *element.name.ns != *scope_default {
        fixup = Some(&*element.name.ns);
        scope_default = &*element.name.ns;
    }

    output.push('<');
    element.name.write_qualified(output);
    for attr in &element.attributes {
        if fixup.is_some() && attr.is_default_namespace_declaration() {
            continue;
        }
        output.push(' ');
        attr.name.write_qualified(output);
        output.push_str("=\"");
        escape_double_quoted_attribute(output, &attr.value);
        output.push('"');
    }
    if let Some(ns) = fixup {
        output.push_str(" xmlns=\"");
        escape_double_quoted_attribute(output, ns);
        output.push('"');
    }
    scope_default
}

fn emit_declaration(output: &mut String, decl: &XmlDecl) {
    output.push_str("<?xml version=\"");
    output.push_str(&decl.version);
    output.push('"');
    if let Some(encoding) = &decl.encoding {
        output.push_str(" encoding=\"");
        output.push_str(encoding);
        output.push('"');
    }
    if let Some(standalone) = &decl.standalone {
        output.push_str(" standalone=\"");
        output.push_str(standalone);
        output.push('"');
    }
    output.push_str("?>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MATHML_NAMESPACE;

    #[test]
    fn round_trip() {
        let input = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n<!-- c -->\n<math xmlns=\"http://www.w3.org/1998/Math/MathML\" display=\"block\">\n  <mi>x</mi><mo>&lt;</mo><mspace/>\n</math>";
        let doc = Document::parse(input).unwrap();
        assert_eq!(doc.to_xml_string(), input);
    }

    #[test]
    fn escapes_attributes_and_text() {
        let mut doc = Document::new();
        let mtext = doc.create_mathml_element("mtext");
        doc.append_child(doc.root(), mtext).unwrap();
        doc.set_attribute(mtext, QualName::local("alt"), "\"a\" & <b>")
            .unwrap();
        let text = doc.create_text("1 < 2 & 3 > 2");
        doc.append_child(mtext, text).unwrap();
        assert_eq!(
            doc.to_xml_string(),
            "<mtext alt=\"&quot;a&quot; &amp; &lt;b>\" xmlns=\"http://www.w3.org/1998/Math/MathML\">1 &lt; 2 &amp; 3 &gt; 2</mtext>"
        );
    }

    #[test]
    fn created_element_under_prefixed_math() {
        let mut doc = Document::parse(
            r#"<m:math xmlns:m="http://www.w3.org/1998/Math/MathML"><m:mi>x</m:mi></m:math>"#,
        )
        .unwrap();
        let math = doc.document_element().unwrap();
        let mrow = doc.create_mathml_element("mrow");
        let mi = doc.first_element_child(math).unwrap();
        doc.replace_child(math, mrow, mi).unwrap();
        doc.append_child(mrow, mi).unwrap();
        let mo = doc.create_element(QualName::mathml("mo"));
        doc.append_child(mrow, mo).unwrap();
        assert_eq!(
            doc.to_xml_string(),
            r#"<m:math xmlns:m="http://www.w3.org/1998/Math/MathML"><mrow xmlns="http://www.w3.org/1998/Math/MathML"><m:mi>x</m:mi><mo/></mrow></m:math>"#
        );
    }

    #[test]
    fn emit_subtree_inherits_default_namespace() {
        let doc = Document::parse(
            r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mrow><mi>x</mi></mrow></math>"#,
        )
        .unwrap();
        let mrow = doc
            .first_element_by_tag_name_ns(doc.root(), MATHML_NAMESPACE, "mrow")
            .unwrap();
        let mut output = String::new();
        doc.emit(&mut output, mrow);
        assert_eq!(output, "<mrow><mi>x</mi></mrow>");
    }

    #[test]
    fn deeply_nested_document() {
        let depth = 100_000;
        let input = format!(
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\">{}<mi>x</mi>{}</math>",
            "<mrow>".repeat(depth),
            "</mrow>".repeat(depth)
        );
        let doc = Document::parse(&input).unwrap();
        assert_eq!(doc.to_xml_string(), input);
    }
}
