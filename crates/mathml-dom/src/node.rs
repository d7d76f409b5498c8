use static_assertions::assert_eq_size;
use strum_macros::IntoStaticStr;

use crate::{MATHML_NAMESPACE, XMLNS_NAMESPACE};

/// Handle to a node owned by a [`Document`](crate::Document).
///
/// Handles are only meaningful for the document that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

assert_eq_size!(NodeId, u32);

impl NodeId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        // A document with more than `u32::MAX` nodes is not something we can represent.
        NodeId(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A namespace-qualified name of an element or attribute.
///
/// An empty `ns` means "no namespace". The prefix is only kept for serialization; two names
/// are the same if namespace and local name agree.
#[derive(Debug, Clone, Eq)]
pub struct QualName {
    pub ns: Box<str>,
    pub prefix: Option<Box<str>>,
    pub local: Box<str>,
}

impl QualName {
    pub fn new(ns: &str, local: &str) -> Self {
        QualName {
            ns: ns.into(),
            prefix: None,
            local: local.into(),
        }
    }

    pub fn with_prefix(ns: &str, prefix: Option<&str>, local: &str) -> Self {
        QualName {
            ns: ns.into(),
            prefix: prefix.map(Into::into),
            local: local.into(),
        }
    }

    /// A name in the MathML namespace without a prefix.
    #[inline]
    pub fn mathml(local: &str) -> Self {
        QualName::new(MATHML_NAMESPACE, local)
    }

    /// A name without a namespace, as used by ordinary attributes.
    #[inline]
    pub fn local(local: &str) -> Self {
        QualName::new("", local)
    }

    #[inline]
    pub fn matches(&self, ns: &str, local: &str) -> bool {
        &*self.ns == ns && &*self.local == local
    }

    #[inline]
    pub fn has_namespace(&self) -> bool {
        !self.ns.is_empty()
    }

    pub(crate) fn write_qualified(&self, output: &mut String) {
        if let Some(prefix) = &self.prefix {
            output.push_str(prefix);
            output.push(':');
        }
        output.push_str(&self.local);
    }
}

impl PartialEq for QualName {
    fn eq(&self, other: &Self) -> bool {
        self.ns == other.ns && self.local == other.local
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Whether this is an `xmlns="..."` declaration.
    pub(crate) fn is_default_namespace_declaration(&self) -> bool {
        self.name.prefix.is_none() && self.name.matches(XMLNS_NAMESPACE, "xmlns")
    }
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: QualName,
    pub attributes: Vec<Attribute>,
}

/// The `<?xml ...?>` declaration at the start of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDecl {
    pub version: Box<str>,
    pub encoding: Option<Box<str>>,
    pub standalone: Option<Box<str>>,
}

#[derive(Debug, Clone, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum NodeKind {
    Document,
    Element(ElementData),
    /// Unescaped character data.
    Text(Box<str>),
    /// Raw comment content between `<!--` and `-->`.
    Comment(Box<str>),
    /// Raw content between `<?` and `?>`.
    ProcessingInstruction(Box<str>),
    /// Raw content between `<!DOCTYPE` and `>`.
    Doctype(Box<str>),
    Declaration(XmlDecl),
}

impl NodeKind {
    #[inline]
    pub(crate) fn can_have_children(&self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element(_))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        NodeData {
            parent: None,
            children: Vec::new(),
            kind,
        }
    }
}
