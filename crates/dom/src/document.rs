use crate::node::{NodeId, NodeKind};
use crate::text::{byte_for_char, char_len};

/// Errors for structural or text mutations that would corrupt the tree.
///
/// Every constructor site also fires a `debug_assert!` so misuse is loud in
/// debug builds while release builds degrade to the error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    NotAContainer(NodeId),
    NotAText(NodeId),
    NotAnElement(NodeId),
    /// The node is a document or shadow root and can never become a child.
    Unattachable(NodeId),
    /// The node already has a parent; detach it first.
    AlreadyAttached(NodeId),
    /// The node has no parent, so there is nothing to remove it from.
    Detached(NodeId),
    /// The host already carries a shadow root.
    ShadowAlreadyAttached(NodeId),
    NotAChild { parent: NodeId, child: NodeId },
    CycleDetected { parent: NodeId, child: NodeId },
    InvalidOffset { node: NodeId, offset: usize, len: usize },
    EmptyText(NodeId),
}

pub(crate) struct NodeRecord {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) shadow: Option<NodeId>,
}

impl NodeRecord {
    fn new(kind: NodeKind) -> Self {
        NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
            shadow: None,
        }
    }
}

/// Arena-backed document tree with shadow root support.
///
/// Nodes are created detached and wired up with [`append_child`] /
/// [`insert_before`]. Removal detaches a whole subtree but keeps its records
/// alive, so a removed node can be re-inserted later. The `mutations` counter
/// ticks on every tree or text change and lets callers detect whether an
/// operation touched the document at all.
///
/// [`append_child`]: Document::append_child
/// [`insert_before`]: Document::insert_before
pub struct Document {
    pub(crate) nodes: Vec<NodeRecord>,
    mutations: u64,
}

impl Document {
    pub fn new() -> Self {
        Document {
            nodes: vec![NodeRecord::new(NodeKind::Document)],
            mutations: 0,
        }
    }

    /// Total number of tree and text mutations applied so far.
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    // --- Node creation ---

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord::new(kind));
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.to_string(),
        })
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Text {
            data: data.to_string(),
        })
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Comment {
            data: data.to_string(),
        })
    }

    // --- Accessors ---

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.index()].kind
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    /// Light-tree children, in order. For composed-order traversal use
    /// [`composed_children`](Document::composed_children).
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.nodes[host.index()].shadow
    }

    /// The host element, if `node` is a shadow root.
    pub fn host(&self, node: NodeId) -> Option<NodeId> {
        match self.nodes[node.index()].kind {
            NodeKind::ShadowRoot { host } => Some(host),
            _ => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.index()].kind {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.index()].kind {
            NodeKind::Text { data } => Some(data),
            _ => None,
        }
    }

    /// Character count of a text node's data, 0 for any other kind.
    pub fn text_len(&self, node: NodeId) -> usize {
        self.text(node).map(char_len).unwrap_or(0)
    }

    // --- Structural mutation ---

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_insertable(parent, child)?;
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        self.mutations += 1;
        Ok(())
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: NodeId,
    ) -> Result<(), DomError> {
        self.ensure_insertable(parent, child)?;
        let Some(pos) = self.nodes[parent.index()]
            .children
            .iter()
            .position(|c| *c == before)
        else {
            debug_assert!(false, "insert_before reference is not a child of parent");
            return Err(DomError::NotAChild {
                parent,
                child: before,
            });
        };
        self.nodes[parent.index()].children.insert(pos, child);
        self.nodes[child.index()].parent = Some(parent);
        self.mutations += 1;
        Ok(())
    }

    /// Detaches `node` (with its whole subtree) from its parent. The records
    /// stay allocated; re-inserting the node later is allowed.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.nodes[node.index()].parent else {
            debug_assert!(false, "remove_node on a detached node");
            return Err(DomError::Detached(node));
        };
        let children = &mut self.nodes[parent.index()].children;
        if let Some(pos) = children.iter().position(|c| *c == node) {
            children.remove(pos);
        } else {
            debug_assert!(false, "parent/child link out of sync");
            return Err(DomError::NotAChild {
                parent,
                child: node,
            });
        }
        self.nodes[node.index()].parent = None;
        self.mutations += 1;
        Ok(())
    }

    /// Creates a shadow root on `host` and returns it. At most one per host.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        if !self.nodes[host.index()].kind.is_element() {
            debug_assert!(false, "attach_shadow on a non-element");
            return Err(DomError::NotAnElement(host));
        }
        if self.nodes[host.index()].shadow.is_some() {
            debug_assert!(false, "attach_shadow on a host that already has one");
            return Err(DomError::ShadowAlreadyAttached(host));
        }
        let root = self.alloc(NodeKind::ShadowRoot { host });
        self.nodes[host.index()].shadow = Some(root);
        self.mutations += 1;
        Ok(root)
    }

    fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.nodes[parent.index()].kind.is_container() {
            debug_assert!(false, "insertion into a non-container node");
            return Err(DomError::NotAContainer(parent));
        }
        match self.nodes[child.index()].kind {
            NodeKind::Document | NodeKind::ShadowRoot { .. } => {
                debug_assert!(false, "documents and shadow roots cannot be children");
                return Err(DomError::Unattachable(child));
            }
            _ => {}
        }
        if self.nodes[child.index()].parent.is_some() {
            debug_assert!(false, "child is already attached elsewhere");
            return Err(DomError::AlreadyAttached(child));
        }
        if self.contains(child, parent) {
            debug_assert!(false, "insertion would create a cycle");
            return Err(DomError::CycleDetected { parent, child });
        }
        Ok(())
    }

    // --- Text mutation ---

    pub fn set_text(&mut self, node: NodeId, new_data: &str) -> Result<(), DomError> {
        match &mut self.nodes[node.index()].kind {
            NodeKind::Text { data } => {
                data.clear();
                data.push_str(new_data);
                self.mutations += 1;
                Ok(())
            }
            _ => {
                debug_assert!(false, "set_text on a non-text node");
                Err(DomError::NotAText(node))
            }
        }
    }

    /// Splits a text node at a character offset. The original keeps the
    /// prefix; a new sibling holding the suffix is inserted directly after
    /// it and returned. Splitting at `len` yields an empty sibling.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let (parent, suffix) = match &self.nodes[node.index()].kind {
            NodeKind::Text { data } => {
                let len = char_len(data);
                if offset > len {
                    debug_assert!(false, "split_text offset past end of data");
                    return Err(DomError::InvalidOffset { node, offset, len });
                }
                let at = byte_for_char(data, offset);
                (self.nodes[node.index()].parent, data[at..].to_string())
            }
            _ => {
                debug_assert!(false, "split_text on a non-text node");
                return Err(DomError::NotAText(node));
            }
        };
        if let NodeKind::Text { data } = &mut self.nodes[node.index()].kind {
            let at = byte_for_char(data, offset);
            data.truncate(at);
        }
        let tail = self.create_text(&suffix);
        if let Some(parent) = parent {
            let children = &mut self.nodes[parent.index()].children;
            if let Some(pos) = children.iter().position(|c| *c == node) {
                children.insert(pos + 1, tail);
            } else {
                debug_assert!(false, "parent/child link out of sync");
                children.push(tail);
            }
            self.nodes[tail.index()].parent = Some(parent);
        }
        self.mutations += 1;
        Ok(tail)
    }

    pub fn push_char(&mut self, node: NodeId, ch: char) -> Result<(), DomError> {
        match &mut self.nodes[node.index()].kind {
            NodeKind::Text { data } => {
                data.push(ch);
                self.mutations += 1;
                Ok(())
            }
            _ => {
                debug_assert!(false, "push_char on a non-text node");
                Err(DomError::NotAText(node))
            }
        }
    }

    pub fn pop_char(&mut self, node: NodeId) -> Result<char, DomError> {
        match &mut self.nodes[node.index()].kind {
            NodeKind::Text { data } => match data.pop() {
                Some(ch) => {
                    self.mutations += 1;
                    Ok(ch)
                }
                None => {
                    debug_assert!(false, "pop_char on an empty text node");
                    Err(DomError::EmptyText(node))
                }
            },
            _ => {
                debug_assert!(false, "pop_char on a non-text node");
                Err(DomError::NotAText(node))
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}
