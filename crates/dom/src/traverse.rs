//! Composed-order traversal.
//!
//! The light tree stores what scripts built; the composed tree is what gets
//! rendered: a host element with a shadow root contributes the shadow root's
//! subtree instead of its own children. Selection geometry ignores node
//! ownership boundaries, so every ordering and position computation in this
//! module runs over the composed tree.
//!
//! Slot projection is not modeled. Light children of a host that carries a
//! shadow root keep their structural parent but are unreachable from the
//! composed root; callers are expected to pass composed-reachable nodes.

use std::cmp::Ordering;

use crate::document::Document;
use crate::node::{Caret, NodeId, NodeKind};
use crate::text::char_len;

impl Document {
    /// Children in composed order: a host with a shadow root yields exactly
    /// the shadow root, anything else yields its light children.
    pub fn composed_children(&self, node: NodeId) -> &[NodeId] {
        let rec = &self.nodes[node.index()];
        match &rec.shadow {
            Some(root) => std::slice::from_ref(root),
            None => &rec.children,
        }
    }

    /// Parent in composed order: shadow roots climb to their host.
    pub fn composed_parent(&self, node: NodeId) -> Option<NodeId> {
        match self.nodes[node.index()].kind {
            NodeKind::ShadowRoot { host } => Some(host),
            _ => self.nodes[node.index()].parent,
        }
    }

    pub fn composed_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.composed_parent(node)?;
        self.composed_children(parent).iter().position(|c| *c == node)
    }

    pub fn composed_next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.composed_parent(node)?;
        let siblings = self.composed_children(parent);
        let idx = siblings.iter().position(|c| *c == node)?;
        siblings.get(idx + 1).copied()
    }

    pub fn composed_prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.composed_parent(node)?;
        let siblings = self.composed_children(parent);
        let idx = siblings.iter().position(|c| *c == node)?;
        idx.checked_sub(1).map(|i| siblings[i])
    }

    /// Whether `node` is `ancestor` or sits anywhere below it in the
    /// composed tree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = node;
        loop {
            if cur == ancestor {
                return true;
            }
            match self.composed_parent(cur) {
                Some(parent) => cur = parent,
                None => return false,
            }
        }
    }

    /// Boundary-point length: characters for text and comment nodes,
    /// composed child count for containers.
    pub fn node_length(&self, node: NodeId) -> usize {
        match self.kind(node) {
            NodeKind::Text { data } | NodeKind::Comment { data } => char_len(data),
            _ => self.composed_children(node).len(),
        }
    }

    // --- Boundary-point ordering ---

    /// Path of a boundary point from the composed root: the child index at
    /// every level, with the caret offset as the final component. Paths
    /// compare lexicographically, and a strict prefix sorts first, which is
    /// exactly "before the subtree" in document order.
    pub fn caret_path(&self, caret: Caret) -> Vec<usize> {
        let mut path = Vec::new();
        let mut node = caret.node;
        while let Some(parent) = self.composed_parent(node) {
            match self.composed_index(node) {
                Some(idx) => path.push(idx),
                None => {
                    debug_assert!(false, "caret node is not composed-reachable");
                    path.push(0);
                }
            }
            node = parent;
        }
        path.reverse();
        path.push(caret.offset);
        path
    }

    pub fn cmp_boundary(&self, a: Caret, b: Caret) -> Ordering {
        self.caret_path(a).cmp(&self.caret_path(b))
    }

    // --- Text geometry ---

    /// Characters rendered by `node`'s composed subtree.
    pub fn subtree_text_len(&self, node: NodeId) -> usize {
        match self.kind(node) {
            NodeKind::Text { data } => char_len(data),
            NodeKind::Comment { .. } => 0,
            _ => self
                .composed_children(node)
                .iter()
                .map(|&child| self.subtree_text_len(child))
                .sum(),
        }
    }

    /// Absolute character position of a boundary point within the composed
    /// text of the whole document. Two carets compare equal here whenever no
    /// rendered character separates them, even if their paths differ.
    pub fn text_position(&self, caret: Caret) -> usize {
        let mut pos = 0;
        match self.kind(caret.node) {
            NodeKind::Text { data } => pos += caret.offset.min(char_len(data)),
            NodeKind::Comment { .. } => {}
            _ => {
                for &child in self.composed_children(caret.node).iter().take(caret.offset) {
                    pos += self.subtree_text_len(child);
                }
            }
        }
        let mut node = caret.node;
        while let Some(parent) = self.composed_parent(node) {
            for &sibling in self.composed_children(parent) {
                if sibling == node {
                    break;
                }
                pos += self.subtree_text_len(sibling);
            }
            node = parent;
        }
        pos
    }

    /// Concatenated text of the composed subtree, comments excluded.
    pub fn composed_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            NodeKind::Text { data } => out.push_str(data),
            NodeKind::Comment { .. } => {}
            _ => {
                for &child in self.composed_children(node) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Text nodes under `node` in composed document order, `node` included
    /// when it is one itself.
    pub fn text_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_text_nodes(node, &mut out);
        out
    }

    fn collect_text_nodes(&self, node: NodeId, out: &mut Vec<NodeId>) {
        match self.kind(node) {
            NodeKind::Text { .. } => out.push(node),
            NodeKind::Comment { .. } => {}
            _ => {
                for &child in self.composed_children(node) {
                    self.collect_text_nodes(child, out);
                }
            }
        }
    }

    // --- Caret stepping ---

    /// The next caret position one text stop forward: one character within
    /// the current text node, or the start of the following text node in
    /// composed order. `None` at the end of the document's text.
    pub fn next_text_stop(&self, caret: Caret) -> Option<Caret> {
        if self.kind(caret.node).is_text() && caret.offset < self.text_len(caret.node) {
            return Some(Caret::new(caret.node, caret.offset + 1));
        }
        self.text_nodes(NodeId::DOCUMENT)
            .into_iter()
            .map(|n| Caret::new(n, 0))
            .find(|&c| self.cmp_boundary(c, caret) == Ordering::Greater)
    }

    /// Mirror of [`next_text_stop`](Document::next_text_stop): one character
    /// back, or the end of the preceding text node.
    pub fn prev_text_stop(&self, caret: Caret) -> Option<Caret> {
        if self.kind(caret.node).is_text() && caret.offset > 0 {
            return Some(Caret::new(caret.node, caret.offset - 1));
        }
        self.text_nodes(NodeId::DOCUMENT)
            .into_iter()
            .rev()
            .map(|n| Caret::new(n, self.text_len(n)))
            .find(|&c| self.cmp_boundary(c, caret) == Ordering::Less)
    }

    // --- Debug output ---

    /// Indented dump of the composed subtree, for tests and logs.
    pub fn tree_to_string(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.format_node(node, 0, &mut out);
        out
    }

    fn format_node(&self, node: NodeId, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        match self.kind(node) {
            NodeKind::Document => out.push_str("#document"),
            NodeKind::ShadowRoot { .. } => out.push_str("#shadow-root"),
            NodeKind::Element { tag } => out.push_str(tag),
            NodeKind::Text { data } => out.push_str(&format!("{data:?}")),
            NodeKind::Comment { data } => out.push_str(&format!("<!--{data}-->")),
        }
        out.push('\n');
        for &child in self.composed_children(node) {
            self.format_node(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // <div> <span>"ab"</span> #shadow("cd" <br>) </div> "ef"
    // composed text: "abcdef" with the span's light sibling order intact
    fn fixture() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        let ab = doc.create_text("ab");
        doc.append_child(NodeId::DOCUMENT, div).unwrap();
        doc.append_child(div, span).unwrap();
        doc.append_child(span, ab).unwrap();

        let host = doc.create_element("x-host");
        doc.append_child(div, host).unwrap();
        let root = doc.attach_shadow(host).unwrap();
        let cd = doc.create_text("cd");
        doc.append_child(root, cd).unwrap();
        let br = doc.create_element("br");
        doc.append_child(root, br).unwrap();

        let ef = doc.create_text("ef");
        doc.append_child(NodeId::DOCUMENT, ef).unwrap();
        (doc, host, ab, cd, ef)
    }

    #[test]
    fn composed_children_pierce_the_host() {
        let (doc, host, ..) = fixture();
        let root = doc.shadow_root(host).unwrap();
        assert_eq!(doc.composed_children(host), &[root]);
        assert_eq!(doc.node_length(host), 1);
        assert_eq!(doc.composed_parent(root), Some(host));
    }

    #[test]
    fn contains_crosses_the_shadow_boundary() {
        let (doc, host, ab, cd, _) = fixture();
        assert!(doc.contains(NodeId::DOCUMENT, cd));
        assert!(doc.contains(host, cd));
        assert!(!doc.contains(host, ab));
    }

    #[test]
    fn composed_text_pierces_shadows_and_skips_comments() {
        let (mut doc, host, ..) = fixture();
        let root = doc.shadow_root(host).unwrap();
        let note = doc.create_comment("note");
        doc.append_child(root, note).unwrap();
        assert_eq!(doc.composed_text(NodeId::DOCUMENT), "abcdef");
    }

    #[test]
    fn boundaries_order_lexicographically() {
        let (doc, host, ab, cd, ef) = fixture();
        let before_host = Caret::new(doc.parent(host).unwrap(), 1);
        let inside_cd = Caret::new(cd, 1);
        let after_host = Caret::new(doc.parent(host).unwrap(), 2);

        assert_eq!(doc.cmp_boundary(before_host, inside_cd), Ordering::Less);
        assert_eq!(doc.cmp_boundary(inside_cd, after_host), Ordering::Less);
        assert_eq!(doc.cmp_boundary(Caret::new(ab, 2), inside_cd), Ordering::Less);
        assert_eq!(doc.cmp_boundary(inside_cd, Caret::new(ef, 0)), Ordering::Less);
        assert_eq!(doc.cmp_boundary(inside_cd, inside_cd), Ordering::Equal);
    }

    #[test]
    fn text_positions_accumulate_across_roots() {
        let (doc, _, ab, cd, ef) = fixture();
        assert_eq!(doc.text_position(Caret::new(ab, 0)), 0);
        assert_eq!(doc.text_position(Caret::new(ab, 2)), 2);
        assert_eq!(doc.text_position(Caret::new(cd, 0)), 2);
        assert_eq!(doc.text_position(Caret::new(cd, 2)), 4);
        assert_eq!(doc.text_position(Caret::new(ef, 2)), 6);
        assert_eq!(doc.text_position(Caret::new(NodeId::DOCUMENT, 2)), 6);
    }

    #[test]
    fn text_stops_walk_through_every_character() {
        let (doc, _, ab, ..) = fixture();
        let mut caret = Caret::new(ab, 0);
        let mut seen = vec![doc.text_position(caret)];
        while let Some(next) = doc.next_text_stop(caret) {
            caret = next;
            seen.push(doc.text_position(caret));
        }
        assert_eq!(seen, vec![0, 1, 2, 2, 3, 4, 4, 5, 6]);

        let mut back = Vec::new();
        back.push(doc.text_position(caret));
        while let Some(prev) = doc.prev_text_stop(caret) {
            caret = prev;
            back.push(doc.text_position(caret));
        }
        back.reverse();
        assert_eq!(back, vec![0, 1, 2, 2, 3, 4, 4, 5, 6]);
    }

    #[test]
    fn tree_dump_reflects_composed_structure() {
        let (doc, host, ..) = fixture();
        let dump = doc.tree_to_string(host);
        assert_eq!(dump, "x-host\n  #shadow-root\n    \"cd\"\n    br\n");
    }
}
