/// Handle to a node inside a [`Document`](crate::Document) arena.
///
/// Ids are minted by the document that owns the node and are never reused.
/// Passing a handle to a different document is a logic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node itself. Every [`Document`](crate::Document) has it
    /// at the same handle.
    pub const DOCUMENT: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node is. The payload carries the per-kind data the resolver
/// actually reads: tag names for element filtering, text data for offsets,
/// the host back-link for climbing out of a shadow tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    ShadowRoot { host: NodeId },
    Element { tag: String },
    Text { data: String },
    Comment { data: String },
}

impl NodeKind {
    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text { .. })
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, NodeKind::Comment { .. })
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }

    /// True for document, shadow root and element nodes, which can hold
    /// children. Text and comment nodes are always leaves.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Document | NodeKind::ShadowRoot { .. } | NodeKind::Element { .. }
        )
    }
}

/// Elements that never have meaningful content and must not be descended
/// into when searching for range endpoints.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "script", "source", "style", "template", "track", "wbr",
];

/// Whether `tag` names a void element (`<br>`, `<img>`, `<input>`, ...).
///
/// Tag names are matched as stored; callers are expected to create elements
/// with lowercase tags.
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// A boundary point: a position inside `node`.
///
/// For text nodes `offset` counts characters; for containers it counts
/// composed child slots. `offset == 0` is before the first character or
/// child, `offset == length` is after the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub node: NodeId,
    pub offset: usize,
}

impl Caret {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Caret { node, offset }
    }
}

/// A pair of boundary points with `start <= end` in composed document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomRange {
    pub start: Caret,
    pub end: Caret,
}

impl DomRange {
    pub fn new(start: Caret, end: Caret) -> Self {
        DomRange { start, end }
    }

    /// A range whose two boundary points coincide.
    pub fn collapsed(at: Caret) -> Self {
        DomRange { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}
