use mathml_dom::{Document, DomError, NodeId, QualName};

use crate::tag::MathTag;

/// Style that hides one of the two label cells while keeping it in the layout.
pub const HIDDEN_LABEL_STYLE: &str = "visibility: hidden";

/// Which side of the row the label of an `<mlabeledtr>` is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelSide {
    Left,
    #[default]
    Right,
}

impl LabelSide {
    /// Interpret a `side` attribute. Only the exact value `left` selects the left side.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("left") => LabelSide::Left,
            _ => LabelSide::Right,
        }
    }
}

/// Turn `mlabeledtr` into a detached `<mtr>`.
///
/// The children of `mlabeledtr` are moved, not copied, so the source row is left empty. The
/// label (first element child) is duplicated at the end of the row and one of the two copies
/// is hidden, depending on the `side` attribute.
pub fn transform_labeled_row(doc: &mut Document, mlabeledtr: NodeId) -> Result<NodeId, DomError> {
    let mtr = doc.create_mathml_element(MathTag::Mtr.as_str());

    let mut side = LabelSide::default();
    for attr in doc.attributes(mlabeledtr).to_vec() {
        if !attr.name.has_namespace() && &*attr.name.local == "side" {
            side = LabelSide::from_attribute(Some(attr.value.as_str()));
        } else {
            doc.set_attribute(mtr, attr.name, &attr.value)?;
        }
    }

    while let Some(&child) = doc.children(mlabeledtr).first() {
        doc.append_child(mtr, child)?;
    }

    let Some(label) = doc.first_element_child(mtr) else {
        // Neither label nor cells.
        return Ok(mtr);
    };
    let duplicate = doc.deep_clone(label);
    doc.append_child(mtr, duplicate)?;

    let hidden = match side {
        LabelSide::Left => duplicate,
        LabelSide::Right => label,
    };
    doc.set_attribute(hidden, QualName::local("style"), HIDDEN_LABEL_STYLE)?;

    Ok(mtr)
}

/// Replace every `<mlabeledtr>` child of `table` and pad every other element child with an
/// empty `<mtd>` at both ends. Returns the number of rows replaced.
pub fn transform_table(doc: &mut Document, table: NodeId) -> Result<usize, DomError> {
    let mut replaced = 0;
    let mut next = doc.first_element_child(table);
    while let Some(child) = next {
        let current = if doc.is_mathml(child, MathTag::Mlabeledtr.as_str()) {
            let mtr = transform_labeled_row(doc, child)?;
            doc.replace_child(table, mtr, child)?;
            replaced += 1;
            mtr
        } else {
            let leading = doc.create_mathml_element(MathTag::Mtd.as_str());
            doc.prepend_child(child, leading)?;
            let trailing = doc.create_mathml_element(MathTag::Mtd.as_str());
            doc.append_child(child, trailing)?;
            child
        };
        next = doc.next_element_sibling(current);
    }
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use mathml_dom::MATHML_NAMESPACE;

    use super::*;

    const NS: &str = r#"xmlns="http://www.w3.org/1998/Math/MathML""#;

    fn transform_first_row(input: &str) -> (Document, NodeId) {
        let mut doc = Document::parse(input).unwrap();
        let row = doc
            .first_element_by_tag_name_ns(doc.root(), MATHML_NAMESPACE, "mlabeledtr")
            .unwrap();
        let mtr = transform_labeled_row(&mut doc, row).unwrap();
        assert!(doc.children(row).is_empty());
        (doc, mtr)
    }

    fn render(doc: &Document, id: NodeId) -> String {
        let mut output = String::new();
        doc.emit(&mut output, id);
        output
    }

    #[test]
    fn side_attribute() {
        assert_eq!(LabelSide::from_attribute(Some("left")), LabelSide::Left);
        assert_eq!(LabelSide::from_attribute(Some("right")), LabelSide::Right);
        assert_eq!(LabelSide::from_attribute(Some("Left")), LabelSide::Right);
        assert_eq!(LabelSide::from_attribute(None), LabelSide::Right);
    }

    #[test]
    fn label_on_right_by_default() {
        let (doc, mtr) = transform_first_row(&format!(
            "<mlabeledtr {NS} id=\"r\"><mtd><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd></mlabeledtr>"
        ));
        assert_eq!(
            render(&doc, mtr),
            format!(
                r#"<mtr {NS} id="r"><mtd style="visibility: hidden"><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd><mtd><mtext>(1)</mtext></mtd></mtr>"#
            )
        );
    }

    #[test]
    fn label_on_left() {
        let (doc, mtr) = transform_first_row(&format!(
            r#"<mlabeledtr {NS} side="left"><mtd><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd></mlabeledtr>"#
        ));
        assert_eq!(
            render(&doc, mtr),
            format!(
                r#"<mtr {NS}><mtd><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd><mtd style="visibility: hidden"><mtext>(1)</mtext></mtd></mtr>"#
            )
        );
    }

    #[test]
    fn exactly_one_label_hidden() {
        for side in ["left", "right", "top"] {
            let (doc, mtr) = transform_first_row(&format!(
                r#"<mlabeledtr {NS} side="{side}"><mtd/><mtd/></mlabeledtr>"#
            ));
            let first = doc.first_element_child(mtr).unwrap();
            let last = doc.last_element_child(mtr).unwrap();
            let hidden = [first, last]
                .into_iter()
                .filter(|&cell| doc.get_attribute(cell, "", "style") == Some(HIDDEN_LABEL_STYLE))
                .count();
            assert_eq!(hidden, 1, "side={side}");
            assert_eq!(doc.child_element_count(mtr), 3);
        }
    }

    #[test]
    fn namespaced_side_is_copied() {
        let (doc, mtr) = transform_first_row(&format!(
            r#"<mlabeledtr {NS} xmlns:x="urn:x" x:side="left"><mtd/><mtd/></mlabeledtr>"#
        ));
        assert_eq!(doc.get_attribute(mtr, "urn:x", "side"), Some("left"));
        let first = doc.first_element_child(mtr).unwrap();
        assert_eq!(doc.get_attribute(first, "", "style"), Some(HIDDEN_LABEL_STYLE));
    }

    #[test]
    fn empty_row() {
        let (doc, mtr) = transform_first_row(&format!("<mlabeledtr {NS} side=\"left\"/>"));
        assert_eq!(render(&doc, mtr), format!("<mtr {NS}/>"));
    }

    #[test]
    fn text_only_row() {
        let (doc, mtr) = transform_first_row(&format!("<mlabeledtr {NS}> </mlabeledtr>"));
        assert_eq!(render(&doc, mtr), format!("<mtr {NS}> </mtr>"));
    }

    #[test]
    fn table_padding() {
        let mut doc = Document::parse(&format!(
            "<mtable {NS}><mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr><mlabeledtr><mtd><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd></mlabeledtr><mtr/></mtable>"
        ))
        .unwrap();
        let table = doc.document_element().unwrap();
        assert_eq!(transform_table(&mut doc, table).unwrap(), 1);
        assert_eq!(
            doc.to_xml_string(),
            format!(
                r#"<mtable {NS}><mtr><mtd/><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd><mtd/></mtr><mtr><mtd style="visibility: hidden"><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd><mtd><mtext>(1)</mtext></mtd></mtr><mtr><mtd/><mtd/></mtr></mtable>"#
            )
        );
    }
}
