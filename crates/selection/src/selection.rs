use std::cmp::Ordering;

use dom::{Caret, Document, DomRange, NodeId};

use crate::profile::EngineProfile;

/// What the selection currently is, mirroring the native tri-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    None,
    Caret,
    Range,
}

/// Direction argument for [`Page::modify_extend`](crate::Page::modify_extend).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendDirection {
    Forward,
    Backward,
}

/// The engine's live selection: an anchor/focus pair over a [`Document`].
///
/// The struct stores what the engine knows; what a script can OBSERVE of it
/// goes through the reporting views ([`document_range`], [`scoped_range`],
/// [`reported_anchor_node`]), which apply the profile's shadow-boundary
/// clamping. Mutation happens through [`Page`](crate::Page) so that every
/// observable change also queues a `selectionchange` event.
///
/// `directionless` models the select-all state some engines produce: a
/// selection that exists but cannot be grown or shrunk with `modify`.
///
/// [`document_range`]: Selection::document_range
/// [`scoped_range`]: Selection::scoped_range
/// [`reported_anchor_node`]: Selection::reported_anchor_node
pub struct Selection {
    profile: EngineProfile,
    anchor: Option<Caret>,
    focus: Option<Caret>,
    directionless: bool,
}

impl Selection {
    pub fn new(profile: EngineProfile) -> Self {
        Selection {
            profile,
            anchor: None,
            focus: None,
            directionless: false,
        }
    }

    // --- State queries ---

    pub fn kind(&self) -> SelectionKind {
        match (self.anchor, self.focus) {
            (Some(a), Some(f)) if a == f => SelectionKind::Caret,
            (Some(_), Some(_)) => SelectionKind::Range,
            _ => SelectionKind::None,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.kind() == SelectionKind::Caret
    }

    pub fn anchor(&self) -> Option<Caret> {
        self.anchor
    }

    pub fn focus(&self) -> Option<Caret> {
        self.focus
    }

    pub fn is_directionless(&self) -> bool {
        self.directionless
    }

    /// True anchor-to-focus extent, ordered start-first. Engine-internal:
    /// scripts only get the clamped views below.
    pub fn range(&self, doc: &Document) -> Option<DomRange> {
        let (a, f) = (self.anchor?, self.focus?);
        Some(match doc.cmp_boundary(a, f) {
            Ordering::Greater => DomRange::new(f, a),
            _ => DomRange::new(a, f),
        })
    }

    /// Rendered characters covered by the selection.
    pub fn selected_len(&self, doc: &Document) -> usize {
        match self.range(doc) {
            Some(r) => doc.text_position(r.end) - doc.text_position(r.start),
            None => 0,
        }
    }

    /// The `toString()` view: composed text between the two endpoints.
    pub fn selected_text(&self, doc: &Document) -> String {
        match self.range(doc) {
            Some(r) => {
                let start = doc.text_position(r.start);
                let end = doc.text_position(r.end);
                let all = doc.composed_text(NodeId::DOCUMENT);
                dom::text::substring(&all, start, end).to_string()
            }
            None => String::new(),
        }
    }

    /// `containsNode`: whether the selection covers `node`, fully or (with
    /// `allow_partial`) at least intersecting its contents. Works on the
    /// true extent regardless of reporting clamps.
    pub fn contains_node(&self, doc: &Document, node: NodeId, allow_partial: bool) -> bool {
        let r = match self.range(doc) {
            Some(r) => r,
            None => return false,
        };
        let (before, after) = node_span(doc, node);
        if allow_partial {
            doc.cmp_boundary(before, r.end) == Ordering::Less
                && doc.cmp_boundary(r.start, after) == Ordering::Less
        } else {
            doc.cmp_boundary(r.start, before) != Ordering::Greater
                && doc.cmp_boundary(after, r.end) != Ordering::Greater
        }
    }

    // --- Reporting views ---

    /// The range a script reads off the document-level selection. Profiles
    /// that clamp at shadow boundaries report endpoints inside a shadow tree
    /// as positions around the outermost host instead.
    pub fn document_range(&self, doc: &Document) -> Option<DomRange> {
        let r = self.range(doc)?;
        if !self.profile.clamps_reported_range {
            return Some(r);
        }
        Some(DomRange::new(
            clamp_to_light(doc, r.start, false),
            clamp_to_light(doc, r.end, true),
        ))
    }

    /// The anchor node a script sees, with the same clamping as
    /// [`document_range`](Selection::document_range).
    pub fn reported_anchor_node(&self, doc: &Document) -> Option<NodeId> {
        let anchor = self.anchor?;
        if !self.profile.clamps_reported_range {
            return Some(anchor.node);
        }
        Some(clamp_to_light(doc, anchor, false).node)
    }

    /// The range a shadow root's own scoped selection reports: the true
    /// extent intersected with `root`'s contents, `None` when the selection
    /// does not reach into `root` at all.
    pub fn scoped_range(&self, doc: &Document, root: NodeId) -> Option<DomRange> {
        let r = self.range(doc)?;
        let first = Caret::new(root, 0);
        let last = Caret::new(root, doc.node_length(root));
        if r.is_collapsed() {
            let at = r.start;
            if doc.cmp_boundary(first, at) != Ordering::Greater
                && doc.cmp_boundary(at, last) != Ordering::Greater
            {
                return Some(r);
            }
            return None;
        }
        if doc.cmp_boundary(r.end, first) != Ordering::Greater
            || doc.cmp_boundary(last, r.start) != Ordering::Greater
        {
            return None;
        }
        let start = if doc.cmp_boundary(r.start, first) == Ordering::Less {
            first
        } else {
            r.start
        };
        let end = if doc.cmp_boundary(r.end, last) == Ordering::Greater {
            last
        } else {
            r.end
        };
        Some(DomRange::new(start, end))
    }

    // --- Mutation (Page-only surface) ---

    pub(crate) fn clear(&mut self) -> bool {
        let changed = self.anchor.is_some() || self.focus.is_some();
        self.anchor = None;
        self.focus = None;
        self.directionless = false;
        changed
    }

    pub(crate) fn collapse(&mut self, at: Caret) -> bool {
        let changed = self.anchor != Some(at) || self.focus != Some(at) || self.directionless;
        self.anchor = Some(at);
        self.focus = Some(at);
        self.directionless = false;
        changed
    }

    pub(crate) fn collapse_to_start(&mut self, doc: &Document) -> bool {
        match self.range(doc) {
            Some(r) => self.collapse(r.start),
            None => {
                debug_assert!(false, "collapse_to_start with no selection");
                false
            }
        }
    }

    pub(crate) fn extend(&mut self, doc: &Document, to: Caret) -> bool {
        if self.anchor.is_none() {
            debug_assert!(false, "extend with no selection");
            return self.collapse(to);
        }
        let changed = self.focus != Some(to) || self.directionless;
        self.focus = Some(to);
        self.directionless = false;
        self.normalize_single_char(doc);
        changed
    }

    pub(crate) fn set_base_and_extent(
        &mut self,
        doc: &Document,
        anchor: Caret,
        focus: Caret,
    ) -> bool {
        let changed =
            self.anchor != Some(anchor) || self.focus != Some(focus) || self.directionless;
        self.anchor = Some(anchor);
        self.focus = Some(focus);
        self.directionless = false;
        self.normalize_single_char(doc);
        changed
    }

    pub(crate) fn select_all(&mut self, doc: &Document) -> bool {
        self.anchor = Some(Caret::new(NodeId::DOCUMENT, 0));
        self.focus = Some(Caret::new(
            NodeId::DOCUMENT,
            doc.node_length(NodeId::DOCUMENT),
        ));
        self.directionless = true;
        log::trace!(target: "selection.engine", "select all, selection is directionless");
        true
    }

    /// `Selection.modify('extend', dir, 'character')`: move the focus one
    /// text stop. A stop is one character inside the current text node or
    /// the zero-width hop to the adjacent one. A focus sitting on a
    /// container snaps to the nearest text stop first, at the same rendered
    /// position, before the real move. Returns whether the focus moved;
    /// directionless selections never move.
    pub(crate) fn modify_extend(&mut self, doc: &Document, dir: ExtendDirection) -> bool {
        if self.directionless {
            log::trace!(target: "selection.engine", "modify ignored on directionless selection");
            return false;
        }
        let mut focus = match self.focus {
            Some(f) => f,
            None => return false,
        };
        if !doc.kind(focus.node).is_text() {
            let snapped = match dir {
                ExtendDirection::Forward => doc.next_text_stop(focus),
                ExtendDirection::Backward => doc.prev_text_stop(focus),
            };
            focus = match snapped {
                Some(stop) => stop,
                None => return false,
            };
        }
        let next = match dir {
            ExtendDirection::Forward => doc.next_text_stop(focus),
            ExtendDirection::Backward => doc.prev_text_stop(focus),
        };
        match next {
            Some(stop) => {
                self.focus = Some(stop);
                true
            }
            None => false,
        }
    }

    /// Engines that erase one-character direction store the pair
    /// smallest-first, losing how the user dragged.
    fn normalize_single_char(&mut self, doc: &Document) {
        if !self.profile.erases_single_char_direction {
            return;
        }
        if let (Some(a), Some(f)) = (self.anchor, self.focus) {
            if doc.cmp_boundary(f, a) == Ordering::Less
                && doc.text_position(a) - doc.text_position(f) == 1
            {
                self.anchor = Some(f);
                self.focus = Some(a);
            }
        }
    }

    // --- Mutation reactions (driven by Page) ---

    pub(crate) fn adjust_for_split(
        &mut self,
        node: NodeId,
        offset: usize,
        tail: NodeId,
        parent_slot: Option<(NodeId, usize)>,
    ) -> bool {
        let clamp = self.profile.clamps_split_endpoints;
        let mut changed = false;
        for endpoint in [&mut self.anchor, &mut self.focus] {
            if let Some(caret) = endpoint {
                if caret.node == node && caret.offset > offset {
                    *caret = if clamp {
                        Caret::new(node, offset)
                    } else {
                        Caret::new(tail, caret.offset - offset)
                    };
                    changed = true;
                } else if let Some((parent, pos)) = parent_slot {
                    if caret.node == parent && caret.offset > pos {
                        caret.offset += 1;
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    pub(crate) fn adjust_for_insert(&mut self, parent: NodeId, pos: usize) -> bool {
        let mut changed = false;
        for endpoint in [&mut self.anchor, &mut self.focus] {
            if let Some(caret) = endpoint {
                if caret.node == parent && caret.offset > pos {
                    caret.offset += 1;
                    changed = true;
                }
            }
        }
        changed
    }

    pub(crate) fn adjust_for_remove(
        &mut self,
        doc: &Document,
        removed: NodeId,
        parent: NodeId,
        pos: usize,
    ) -> bool {
        let mut changed = false;
        for endpoint in [&mut self.anchor, &mut self.focus] {
            if let Some(caret) = endpoint {
                if doc.contains(removed, caret.node) {
                    *caret = Caret::new(parent, pos);
                    changed = true;
                } else if caret.node == parent && caret.offset > pos {
                    caret.offset -= 1;
                    changed = true;
                }
            }
        }
        changed
    }

    pub(crate) fn adjust_for_text_len(&mut self, node: NodeId, new_len: usize) -> bool {
        let mut changed = false;
        for endpoint in [&mut self.anchor, &mut self.focus] {
            if let Some(caret) = endpoint {
                if caret.node == node && caret.offset > new_len {
                    caret.offset = new_len;
                    changed = true;
                }
            }
        }
        changed
    }
}

/// Boundary-point interval a node occupies in its composed parent, falling
/// back to the node's own content span for parentless containers.
fn node_span(doc: &Document, node: NodeId) -> (Caret, Caret) {
    match (doc.composed_parent(node), doc.composed_index(node)) {
        (Some(parent), Some(idx)) => (Caret::new(parent, idx), Caret::new(parent, idx + 1)),
        _ => (Caret::new(node, 0), Caret::new(node, doc.node_length(node))),
    }
}

/// Re-expresses a boundary point that sits inside a shadow tree as the slot
/// around the outermost crossed host. Points already in the light tree pass
/// through unchanged.
fn clamp_to_light(doc: &Document, caret: Caret, is_end: bool) -> Caret {
    let mut outermost_host = None;
    let mut cur = caret.node;
    while let Some(parent) = doc.composed_parent(cur) {
        if doc.host(cur).is_some() {
            outermost_host = Some(parent);
        }
        cur = parent;
    }
    let host = match outermost_host {
        Some(h) => h,
        None => return caret,
    };
    match (doc.composed_parent(host), doc.composed_index(host)) {
        (Some(parent), Some(idx)) => {
            let offset = if is_end { idx + 1 } else { idx };
            Caret::new(parent, offset)
        }
        _ => caret,
    }
}
