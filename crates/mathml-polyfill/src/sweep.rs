//! Drivers that apply the rewriters to a whole document.
//!
//! Each driver looks up the next match from scratch after every replacement instead of
//! iterating over a list collected up front: replacing one node can remove or move others.

use log::trace;
use mathml_dom::{Document, DomError, MATHML_NAMESPACE};

use crate::fenced::expand_fenced;
use crate::labeled_row::transform_table;
use crate::tag::MathTag;

/// Replace every `<mfenced>` in the document by its expansion. Returns how many were replaced.
///
/// Nested `<mfenced>` elements are handled too: their copies inside an expansion are found by
/// a later lookup.
pub fn expand_fenced_elements(doc: &mut Document) -> Result<usize, DomError> {
    let root = doc.root();
    let mut count = 0;
    while let Some(mfenced) =
        doc.first_element_by_tag_name_ns(root, MATHML_NAMESPACE, MathTag::Mfenced.as_str())
    {
        let Some(parent) = doc.parent(mfenced) else {
            break;
        };
        let mrow = expand_fenced(doc, mfenced)?;
        doc.replace_child(parent, mrow, mfenced)?;
        trace!("expanded mfenced {mfenced:?} into {mrow:?}");
        count += 1;
    }
    Ok(count)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LabeledRowStats {
    /// Number of `<mlabeledtr>` elements replaced.
    pub rows: usize,
    /// Number of tables whose rows were normalized.
    pub tables: usize,
}

/// Replace every `<mlabeledtr>` in the document, one table at a time.
///
/// Each table is handled in a single pass that also pads its other rows, so a table is never
/// visited twice.
pub fn transform_labeled_rows(doc: &mut Document) -> Result<LabeledRowStats, DomError> {
    let root = doc.root();
    let mut stats = LabeledRowStats::default();
    while let Some(row) =
        doc.first_element_by_tag_name_ns(root, MATHML_NAMESPACE, MathTag::Mlabeledtr.as_str())
    {
        let Some(table) = doc.parent(row) else {
            break;
        };
        let rows = transform_table(doc, table)?;
        trace!("normalized {rows} labeled row(s) in table {table:?}");
        stats.rows += rows;
        stats.tables += 1;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns="http://www.w3.org/1998/Math/MathML""#;

    #[test]
    fn nested_fenced() {
        let mut doc = Document::parse(&format!(
            "<math {NS}><mfenced><mfenced open=\"[\" close=\"]\"><mi>x</mi></mfenced></mfenced></math>"
        ))
        .unwrap();
        assert_eq!(expand_fenced_elements(&mut doc).unwrap(), 2);
        assert_eq!(
            doc.to_xml_string(),
            format!(
                r#"<math {NS}><mrow><mo fence="true">(</mo><mrow><mo fence="true">[</mo><mi>x</mi><mo fence="true">]</mo></mrow><mo fence="true">)</mo></mrow></math>"#
            )
        );
    }

    #[test]
    fn fenced_keeps_position() {
        let mut doc = Document::parse(&format!(
            "<math {NS}><mi>f</mi><mfenced><mi>x</mi></mfenced><mo>=</mo></math>"
        ))
        .unwrap();
        expand_fenced_elements(&mut doc).unwrap();
        let math = doc.document_element().unwrap();
        let names: Vec<&str> = doc
            .element_children(math)
            .map(|child| &*doc.name(child).unwrap().local)
            .collect();
        assert_eq!(names, ["mi", "mrow", "mo"]);
    }

    #[test]
    fn one_pass_per_table() {
        let mut doc = Document::parse(&format!(
            "<math {NS}><mtable><mlabeledtr><mtd/><mtd/></mlabeledtr><mtr><mtd/></mtr><mlabeledtr><mtd/><mtd/></mlabeledtr></mtable><mtable><mtr/><mlabeledtr><mtd/></mlabeledtr></mtable></math>"
        ))
        .unwrap();
        let stats = transform_labeled_rows(&mut doc).unwrap();
        assert_eq!(stats, LabeledRowStats { rows: 3, tables: 2 });
        // The plain rows were padded exactly once.
        let plain_cells: Vec<usize> = doc
            .elements_by_tag_name_ns(doc.root(), MATHML_NAMESPACE, "mtr")
            .into_iter()
            .map(|row| doc.child_element_count(row))
            .collect();
        assert_eq!(plain_cells, [3, 3, 3, 2, 2]);
    }

    #[test]
    fn nothing_to_do() {
        let input = format!("<math {NS}><mtable><mtr><mtd/></mtr></mtable></math>");
        let mut doc = Document::parse(&input).unwrap();
        assert_eq!(expand_fenced_elements(&mut doc).unwrap(), 0);
        assert_eq!(
            transform_labeled_rows(&mut doc).unwrap(),
            LabeledRowStats::default()
        );
        assert_eq!(doc.to_xml_string(), input);
    }

    #[test]
    fn deeply_nested_content() {
        let depth = 100_000;
        let chain = format!(
            "{}<mi>x</mi>{}",
            "<mrow>".repeat(depth),
            "</mrow>".repeat(depth)
        );
        let mut doc =
            Document::parse(&format!("<math {NS}><mfenced>{chain}</mfenced></math>")).unwrap();
        assert_eq!(expand_fenced_elements(&mut doc).unwrap(), 1);
        assert_eq!(
            doc.to_xml_string(),
            format!(
                r#"<math {NS}><mrow><mo fence="true">(</mo>{chain}<mo fence="true">)</mo></mrow></math>"#
            )
        );
    }
}
