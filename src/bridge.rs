use std::collections::VecDeque;

use dom::{Caret, DomError, NodeId};
use selection::{Page, SelectionKind};

use crate::bisect::{ResolvedSelection, resolve_range};
use crate::detect::Strategy;

/// Name of the normalized event re-dispatched after every accepted native
/// `selectionchange`. Consumers listen for this one; the raw native event
/// fires for the resolver's own probing too and cannot be trusted.
pub const SHADOW_SELECTION_CHANGE: &str = "-shadow-selectionchange";

/// Normalizes the native `selectionchange` stream.
///
/// Two jobs: suppress the synthetic storm of events the offset bisection
/// produces while it mutates the live selection, and remember where the
/// caret sat just before a drag started. The guard is a frame stamp rather
/// than a flag: it blocks every further event in the frame that armed it
/// and expires by itself on the next one.
pub struct Bridge {
    guard_frame: Option<u64>,
    recent_caret: Option<Caret>,
}

impl Bridge {
    pub fn new() -> Self {
        Bridge {
            guard_frame: None,
            recent_caret: None,
        }
    }

    /// The caret position captured by the last accepted caret event, if the
    /// current guard cycle has seen one.
    pub fn recent_caret(&self) -> Option<Caret> {
        self.recent_caret
    }

    /// Handles one native `selectionchange`.
    ///
    /// An accepted event starts a new guard cycle: the previous caret
    /// record is dropped, and on the probing strategy a collapsed selection
    /// is resolved against its focus root and recorded. Events arriving
    /// while the guard is armed are the resolver's own doing and are
    /// swallowed whole, record included.
    pub fn on_selection_change(
        &mut self,
        page: &mut Page,
        strategy: Strategy,
    ) -> Result<(), DomError> {
        if self.guard_frame == Some(page.frame()) {
            log::trace!(target: "shadow.bridge", "selectionchange during internals, ignored");
            return Ok(());
        }
        if strategy == Strategy::Probe {
            self.guard_frame = Some(page.frame());
        }

        self.recent_caret = None;
        if strategy == Strategy::Probe && page.selection().kind() == SelectionKind::Caret {
            if let Some(anchor) = page.selection().reported_anchor_node(page.doc()) {
                if let Some(root) = find_focus_root(page, anchor) {
                    if let ResolvedSelection::Normal { range, .. } =
                        resolve_range(page, root, None)?
                    {
                        self.recent_caret = Some(range.start);
                        log::trace!(target: "shadow.bridge", "caret recorded at {:?}", range.start);
                    }
                }
            }
        }

        page.dispatch_custom_event(SHADOW_SELECTION_CHANGE);
        Ok(())
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Bridge::new()
    }
}

/// Breadth-first search for the shadow root the selection is focused in,
/// starting from the reported anchor node. Every visited node contributes
/// its light children to the walk and offers its own shadow root as a
/// candidate; a candidate wins when the selection touches one of its
/// direct children.
fn find_focus_root(page: &Page, start: NodeId) -> Option<NodeId> {
    let doc = page.doc();
    let sel = page.selection();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        if let Some(root) = doc.shadow_root(node) {
            let touched = doc
                .children(root)
                .iter()
                .any(|&child| sel.contains_node(doc, child, true));
            if touched {
                return Some(root);
            }
            queue.push_back(root);
        }
        queue.extend(doc.children(node).iter().copied());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use selection::EngineProfile;

    // <main> <x-host>#shadow("inner")</x-host> </main>
    fn fixture() -> (Page, NodeId, NodeId, NodeId) {
        let mut page = Page::new(EngineProfile::safari());
        let main = page.create_element("main");
        page.append_child(NodeId::DOCUMENT, main).unwrap();
        let host = page.create_element("x-host");
        page.append_child(main, host).unwrap();
        let root = page.attach_shadow(host).unwrap();
        let inner = page.create_text("inner");
        page.append_child(root, inner).unwrap();
        (page, main, root, inner)
    }

    #[test]
    fn focus_root_is_found_from_the_clamped_anchor() {
        let (mut page, main, root, inner) = fixture();
        page.set_position(Caret::new(inner, 3));
        // the engine reports the anchor clamped to the light tree
        let anchor = page.selection().reported_anchor_node(page.doc()).unwrap();
        assert_eq!(anchor, main);
        assert_eq!(find_focus_root(&page, anchor), Some(root));
    }

    #[test]
    fn nested_roots_resolve_to_the_innermost_focused_one() {
        let (mut page, _, root, _) = fixture();
        let nested_host = page.create_element("x-nested");
        page.append_child(root, nested_host).unwrap();
        let nested_root = page.attach_shadow(nested_host).unwrap();
        let deep = page.create_text("deep");
        page.append_child(nested_root, deep).unwrap();

        page.set_position(Caret::new(deep, 1));
        let anchor = page.selection().reported_anchor_node(page.doc()).unwrap();
        assert_eq!(find_focus_root(&page, anchor), Some(root), "outer root wins the scan");
    }

    #[test]
    fn caret_events_record_the_resolved_position() {
        let (mut page, _, _, inner) = fixture();
        let mut bridge = Bridge::new();
        page.set_position(Caret::new(inner, 3));
        while page.poll_native_event().is_some() {}

        bridge
            .on_selection_change(&mut page, Strategy::Probe)
            .unwrap();
        assert_eq!(bridge.recent_caret(), Some(Caret::new(inner, 3)));
        assert_eq!(page.take_custom_events(), vec![SHADOW_SELECTION_CHANGE]);
    }

    #[test]
    fn guarded_events_are_swallowed_and_keep_the_record() {
        let (mut page, _, _, inner) = fixture();
        let mut bridge = Bridge::new();
        page.set_position(Caret::new(inner, 3));
        bridge
            .on_selection_change(&mut page, Strategy::Probe)
            .unwrap();
        let recorded = bridge.recent_caret();
        assert!(recorded.is_some());

        // same frame: the drag's event is ours to ignore, record kept
        page.set_base_and_extent(Caret::new(inner, 3), Caret::new(inner, 2));
        bridge
            .on_selection_change(&mut page, Strategy::Probe)
            .unwrap();
        assert_eq!(bridge.recent_caret(), recorded);
        assert_eq!(page.take_custom_events().len(), 1, "no event while guarded");

        // next frame: the guard has expired and the cycle restarts
        page.next_frame();
        bridge
            .on_selection_change(&mut page, Strategy::Probe)
            .unwrap();
        assert_eq!(bridge.recent_caret(), None, "range selection records nothing");
        assert_eq!(page.take_custom_events().len(), 1);
    }

    #[test]
    fn scoped_strategy_passes_every_event_through_unguarded() {
        let (mut page, _, _, inner) = fixture();
        let mut bridge = Bridge::new();
        page.set_position(Caret::new(inner, 3));
        bridge
            .on_selection_change(&mut page, Strategy::PerRoot)
            .unwrap();
        // same frame: scoped engines answer natively, nothing to suppress
        page.set_position(Caret::new(inner, 1));
        bridge
            .on_selection_change(&mut page, Strategy::PerRoot)
            .unwrap();
        assert_eq!(bridge.recent_caret(), None);
        assert_eq!(page.take_custom_events().len(), 2);
    }

    #[test]
    fn document_strategy_never_arms_the_guard_or_probes() {
        let mut page = Page::new(EngineProfile::firefox());
        let div = page.create_element("div");
        page.append_child(NodeId::DOCUMENT, div).unwrap();
        let text = page.create_text("plain");
        page.append_child(div, text).unwrap();
        page.set_position(Caret::new(text, 2));

        let mut bridge = Bridge::new();
        let mutations = page.doc().mutations();
        bridge
            .on_selection_change(&mut page, Strategy::Document)
            .unwrap();
        bridge
            .on_selection_change(&mut page, Strategy::Document)
            .unwrap();
        assert_eq!(page.doc().mutations(), mutations);
        assert_eq!(bridge.recent_caret(), None);
        assert_eq!(page.take_custom_events().len(), 2, "every event re-dispatches");
    }
}
