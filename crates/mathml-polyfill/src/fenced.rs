//! Expansion of `<mfenced>` into `<mrow>` with explicit fence and separator operators.
//!
//! ```text
//! <mfenced open="[" separators=";"><mi>a</mi><mi>b</mi></mfenced>
//! ```
//! becomes
//! ```text
//! <mrow><mo fence="true">[</mo><mrow><mi>a</mi><mo separator="true">;</mo><mi>b</mi></mrow><mo fence="true">)</mo></mrow>
//! ```

use mathml_dom::{Attribute, Document, DomError, NodeId, QualName};

use crate::tag::{MathTag, OperatorRole};
use crate::text::{collapse_whitespace, parse_separator_list, separator_for_gap};

/// Attributes without a namespace that are not carried over to the `<mrow>`.
///
/// `dir` is accepted on `<mfenced>` but not on `<mrow>`; the others only control the
/// expansion itself.
static RESERVED_ATTRIBUTES: phf::Set<&'static str> = phf::phf_set! {
    "dir",
    "open",
    "close",
    "separators",
};

const DEFAULT_OPEN: &str = "(";
const DEFAULT_CLOSE: &str = ")";

fn new_operator(doc: &mut Document, text: &str, role: OperatorRole) -> Result<NodeId, DomError> {
    let mo = doc.create_mathml_element(MathTag::Mo.as_str());
    let text = doc.create_text(text);
    doc.append_child(mo, text)?;
    doc.set_attribute(mo, QualName::local(role.into()), "true")?;
    Ok(mo)
}

fn should_copy_attribute(attr: &Attribute) -> bool {
    attr.name.has_namespace() || !RESERVED_ATTRIBUTES.contains(&*attr.name.local)
}

/// Build the detached `<mrow>` equivalent of `mfenced`.
///
/// The element children of `mfenced` are deep-copied; `mfenced` itself is left untouched.
pub fn expand_fenced(doc: &mut Document, mfenced: NodeId) -> Result<NodeId, DomError> {
    let outer = doc.create_mathml_element(MathTag::Mrow.as_str());

    let open = collapse_whitespace(doc.get_attribute(mfenced, "", "open").unwrap_or(DEFAULT_OPEN));
    let open = new_operator(doc, &open, OperatorRole::Fence)?;
    doc.append_child(outer, open)?;

    let children: Vec<NodeId> = doc.element_children(mfenced).collect();
    match children.as_slice() {
        [] => {}
        &[only] => {
            // Nothing to separate, so no inner row.
            let copy = doc.deep_clone(only);
            doc.append_child(outer, copy)?;
        }
        &[first, ref rest @ ..] => {
            let separators = parse_separator_list(doc.get_attribute(mfenced, "", "separators"));
            let inner = doc.create_mathml_element(MathTag::Mrow.as_str());
            let copy = doc.deep_clone(first);
            doc.append_child(inner, copy)?;
            for (gap, &child) in rest.iter().enumerate() {
                if let Some(separator) = separator_for_gap(&separators, gap) {
                    let mut buf = [0; 4];
                    let mo = new_operator(
                        doc,
                        separator.encode_utf8(&mut buf),
                        OperatorRole::Separator,
                    )?;
                    doc.append_child(inner, mo)?;
                }
                let copy = doc.deep_clone(child);
                doc.append_child(inner, copy)?;
            }
            doc.append_child(outer, inner)?;
        }
    }

    let close =
        collapse_whitespace(doc.get_attribute(mfenced, "", "close").unwrap_or(DEFAULT_CLOSE));
    let close = new_operator(doc, &close, OperatorRole::Fence)?;
    doc.append_child(outer, close)?;

    let attributes: Vec<Attribute> = doc
        .attributes(mfenced)
        .iter()
        .filter(|attr| should_copy_attribute(attr))
        .cloned()
        .collect();
    for attr in attributes {
        doc.set_attribute(outer, attr.name, &attr.value)?;
    }

    Ok(outer)
}
