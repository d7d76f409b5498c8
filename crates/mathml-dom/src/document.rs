use crate::error::DomError;
use crate::node::{Attribute, ElementData, NodeData, NodeId, NodeKind, QualName};
use crate::MATHML_NAMESPACE;

/// An XML document tree.
///
/// All nodes live in a single arena and are addressed by [`NodeId`]. Nodes that are removed
/// from the tree stay allocated until the document is dropped, so a `NodeId` never dangles.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            nodes: vec![NodeData::new(NodeKind::Document)],
        }
    }

    /// The document node. It has no parent and holds the top-level nodes.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::from_index(0)
    }

    /// The first element child of the document node.
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(self.root())
    }

    #[inline]
    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Link a freshly pushed node as the last child of `parent`, skipping all checks.
    pub(crate) fn push_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.push(kind);
        self.data_mut(id).parent = Some(parent);
        self.data_mut(parent).children.push(id);
        id
    }

    //
    // Construction
    //

    /// Create a detached element with no attributes and no children.
    pub fn create_element(&mut self, name: QualName) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            name,
            attributes: Vec::new(),
        }))
    }

    #[inline]
    pub fn create_mathml_element(&mut self, local: &str) -> NodeId {
        self.create_element(QualName::mathml(local))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    /// Copy the subtree rooted at `id`. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.push(self.data(id).kind.clone());
        // (source node, parent of its copy), popped in document order.
        let mut pending: Vec<(NodeId, NodeId)> = self
            .children(id)
            .iter()
            .rev()
            .map(|&child| (child, copy))
            .collect();
        while let Some((source, parent)) = pending.pop() {
            let node = self.push(self.data(source).kind.clone());
            self.data_mut(node).parent = Some(parent);
            self.data_mut(parent).children.push(node);
            pending.extend(self.children(source).iter().rev().map(|&child| (child, node)));
        }
        copy
    }

    //
    // Inspection
    //

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    #[inline]
    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.data(id).kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    #[inline]
    pub fn is_element_node(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// The qualified name, if `id` is an element.
    pub fn name(&self, id: NodeId) -> Option<&QualName> {
        self.element(id).map(|element| &element.name)
    }

    pub fn is_element(&self, id: NodeId, ns: &str, local: &str) -> bool {
        self.name(id).is_some_and(|name| name.matches(ns, local))
    }

    #[inline]
    pub fn is_mathml(&self, id: NodeId, local: &str) -> bool {
        self.is_element(id, MATHML_NAMESPACE, local)
    }

    /// The text of a text node, or `None` for any other kind of node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut output = String::new();
        if let Some(text) = self.text(id) {
            output.push_str(text);
        }
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                output.push_str(text);
            }
        }
        output
    }

    //
    // Attributes
    //

    /// All attributes in insertion order. Empty for non-elements.
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.element(id) {
            Some(element) => &element.attributes,
            None => &[],
        }
    }

    pub fn get_attribute(&self, id: NodeId, ns: &str, local: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|attr| attr.name.matches(ns, local))
            .map(|attr| attr.value.as_str())
    }

    #[inline]
    pub fn has_attribute(&self, id: NodeId, ns: &str, local: &str) -> bool {
        self.get_attribute(id, ns, local).is_some()
    }

    /// Set an attribute. An existing attribute with the same namespace and local name is
    /// overwritten in place; its prefix is replaced by the one in `name`.
    pub fn set_attribute(&mut self, id: NodeId, name: QualName, value: &str) -> Result<(), DomError> {
        let NodeKind::Element(element) = &mut self.data_mut(id).kind else {
            return Err(DomError::NotAnElement(id));
        };
        match element.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => {
                existing.name = name;
                existing.value.clear();
                existing.value.push_str(value);
            }
            None => element.attributes.push(Attribute {
                name,
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    /// Remove an attribute and return its value, if it was present.
    pub fn remove_attribute(&mut self, id: NodeId, ns: &str, local: &str) -> Option<String> {
        let NodeKind::Element(element) = &mut self.data_mut(id).kind else {
            return None;
        };
        let index = element
            .attributes
            .iter()
            .position(|attr| attr.name.matches(ns, local))?;
        Some(element.attributes.remove(index).value)
    }

    //
    // Navigation
    //

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn element_children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_element_node(child))
    }

    #[inline]
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    #[inline]
    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next_back()
    }

    #[inline]
    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.element_children(id).count()
    }

    /// The next sibling of `id` that is an element.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&sibling| sibling == id)?;
        siblings[index + 1..]
            .iter()
            .copied()
            .find(|&sibling| self.is_element_node(sibling))
    }

    /// Whether `ancestor` is `node` itself or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        if self.children(ancestor).is_empty() {
            return ancestor == node;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether `id` is connected to the document node.
    #[inline]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root(), id)
    }

    //
    // Mutation
    //

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.data(parent).kind.can_have_children()
            || matches!(self.data(child).kind, NodeKind::Document)
            || self.is_inclusive_ancestor(child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn check_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.parent(child) == Some(parent) {
            Ok(())
        } else {
            Err(DomError::NotAChild { parent, child })
        }
    }

    /// Unlink `id` from its parent, if any.
    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.data_mut(id).parent.take() {
            self.data_mut(parent).children.retain(|&child| child != id);
        }
    }

    fn position_in_parent(&self, parent: NodeId, child: NodeId) -> Result<usize, DomError> {
        self.children(parent)
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild { parent, child })
    }

    /// Append `child` as the last child of `parent`, moving it out of its current parent.
    #[inline]
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` as the first child of `parent`, moving it out of its current parent.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let first = self.children(parent).first().copied();
        self.insert_before(parent, child, first)
    }

    /// Insert `child` into `parent` right before `reference`, or at the end if `reference`
    /// is `None`. The child is first removed from wherever it currently is.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insertable(parent, child)?;
        if let Some(reference) = reference {
            self.check_child(parent, reference)?;
            if reference == child {
                return Ok(());
            }
        }
        self.detach(child);
        let index = match reference {
            Some(reference) => self.position_in_parent(parent, reference)?,
            None => self.children(parent).len(),
        };
        self.data_mut(parent).children.insert(index, child);
        self.data_mut(child).parent = Some(parent);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_child(parent, child)?;
        self.detach(child);
        Ok(())
    }

    /// Put `new` at the exact position `old` occupies under `parent`. `old` is detached.
    pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> Result<(), DomError> {
        self.check_child(parent, old)?;
        if new == old {
            return Ok(());
        }
        self.check_insertable(parent, new)?;
        self.detach(new);
        let index = self.position_in_parent(parent, old)?;
        self.data_mut(parent).children[index] = new;
        self.data_mut(new).parent = Some(parent);
        self.data_mut(old).parent = None;
        Ok(())
    }

    /// Like [`replace_child`](Self::replace_child), but `old` is replaced by a sequence of
    /// nodes. An empty sequence simply removes `old`.
    pub fn replace_child_with_fragment(
        &mut self,
        parent: NodeId,
        new: &[NodeId],
        old: NodeId,
    ) -> Result<(), DomError> {
        self.check_child(parent, old)?;
        for (i, &node) in new.iter().enumerate() {
            if new[..i].contains(&node) {
                return Err(DomError::HierarchyRequest { parent, child: node });
            }
            if node != old {
                self.check_insertable(parent, node)?;
            }
        }
        for &node in new {
            if node != old {
                self.detach(node);
            }
        }
        let index = self.position_in_parent(parent, old)?;
        self.data_mut(old).parent = None;
        self.data_mut(parent)
            .children
            .splice(index..=index, new.iter().copied());
        for &node in new {
            self.data_mut(node).parent = Some(parent);
        }
        Ok(())
    }

    //
    // Queries
    //

    /// All descendants of `scope` (excluding `scope` itself) in document order.
    ///
    /// The iterator borrows the document, so it cannot outlive a mutation.
    pub fn descendants(&self, scope: NodeId) -> Descendants<'_> {
        let mut stack = self.children(scope).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    pub fn first_element_by_tag_name_ns(
        &self,
        scope: NodeId,
        ns: &str,
        local: &str,
    ) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&node| self.is_element(node, ns, local))
    }

    /// A snapshot of all matching descendant elements in document order.
    ///
    /// The result does not follow later mutations; query again after changing the tree.
    pub fn elements_by_tag_name_ns(&self, scope: NodeId, ns: &str, local: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&node| self.is_element(node, ns, local))
            .collect()
    }

    #[inline]
    pub fn contains_element_ns(&self, scope: NodeId, ns: &str, local: &str) -> bool {
        self.first_element_by_tag_name_ns(scope, ns, local).is_some()
    }
}

/// Pre-order traversal, see [`Document::descendants`].
pub struct Descendants<'doc> {
    doc: &'doc Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(node).iter().rev().copied());
        Some(node)
    }
}
