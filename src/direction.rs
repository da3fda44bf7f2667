use dom::{Document, NodeId};
use selection::{ExtendDirection, Page};

/// Which way the user dragged: anchor before focus, or the reverse.
///
/// The probe answers with `Option<Direction>`; `None` means the selection
/// could not be moved in either direction and already spans everything
/// selectable, so neither edge is distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Infers the drag direction of the current range selection by probing.
///
/// No API reports anchor/focus order reliably here, but `modify` moves the
/// focus, and the focus is the end that moves. Extend forward one character
/// and remeasure: growth, or the right boundary's following neighbour
/// turning partially selected, means the focus sits on the right. Shrinkage,
/// or the left boundary dropping out of the selection, means the focus sits
/// on the left. An inconclusive forward probe moved nothing, so the same
/// logic runs mirrored in the backward direction. Every concluding branch
/// first undoes its own probe with one opposite extend, leaving the live
/// selection exactly where it started.
pub fn resolve_direction(page: &mut Page, left: NodeId, right: NodeId) -> Option<Direction> {
    let initial = measure(page);

    page.modify_extend(ExtendDirection::Forward);
    let probed = measure(page);
    if probed > initial || contains_next_element(page, right, true) {
        page.modify_extend(ExtendDirection::Backward);
        return Some(Direction::Forward);
    }
    if probed < initial || !page.selection().contains_node(page.doc(), left, true) {
        page.modify_extend(ExtendDirection::Backward);
        return Some(Direction::Backward);
    }

    page.modify_extend(ExtendDirection::Backward);
    let probed = measure(page);
    if probed > initial || contains_next_element(page, left, false) {
        page.modify_extend(ExtendDirection::Forward);
        return Some(Direction::Backward);
    }
    if probed < initial || !page.selection().contains_node(page.doc(), right, true) {
        page.modify_extend(ExtendDirection::Forward);
        return Some(Direction::Forward);
    }

    log::trace!(target: "shadow.direction", "selection immovable in both directions");
    None
}

fn measure(page: &Page) -> usize {
    page.selection().selected_len(page.doc())
}

/// Whether the neighbour of `from` in the walk direction is at least
/// partially selected. The walk skips ancestors of `from`: extending a
/// selection never newly covers a node it was already inside of.
fn contains_next_element(page: &Page, from: NodeId, forward: bool) -> bool {
    let doc = page.doc();
    let mut next = walk_from_node(doc, from, forward);
    while let Some(node) = next {
        if !doc.contains(node, from) {
            break;
        }
        next = walk_from_node(doc, node, forward);
    }
    match next {
        Some(node) => page.selection().contains_node(doc, node, true),
        None => false,
    }
}

/// One step through the composed tree: the adjacent sibling, climbing out
/// of exhausted subtrees when walking forward, or the parent itself when
/// walking backward (the caller filters ancestors out).
fn walk_from_node(doc: &Document, node: NodeId, forward: bool) -> Option<NodeId> {
    if !forward {
        return doc
            .composed_prev_sibling(node)
            .or_else(|| doc.composed_parent(node));
    }
    let mut cur = node;
    loop {
        if let Some(sibling) = doc.composed_next_sibling(cur) {
            return Some(sibling);
        }
        cur = doc.composed_parent(cur)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{Caret, NodeId};
    use selection::EngineProfile;

    // <div>"hello"</div> <x-host>#shadow("world")</x-host>
    fn fixture() -> (Page, NodeId, NodeId) {
        let mut page = Page::new(EngineProfile::safari());
        let div = page.create_element("div");
        page.append_child(NodeId::DOCUMENT, div).unwrap();
        let hello = page.create_text("hello");
        page.append_child(div, hello).unwrap();
        let host = page.create_element("x-host");
        page.append_child(NodeId::DOCUMENT, host).unwrap();
        let root = page.attach_shadow(host).unwrap();
        let world = page.create_text("world");
        page.append_child(root, world).unwrap();
        (page, hello, world)
    }

    fn snapshot(page: &Page) -> (Option<Caret>, Option<Caret>) {
        (page.selection().anchor(), page.selection().focus())
    }

    #[test]
    fn forward_drag_probes_forward() {
        let (mut page, hello, world) = fixture();
        page.set_base_and_extent(Caret::new(hello, 1), Caret::new(world, 2));
        let before = snapshot(&page);
        let dir = resolve_direction(&mut page, hello, world);
        assert_eq!(dir, Some(Direction::Forward));
        assert_eq!(snapshot(&page), before, "probe must leave the selection untouched");
    }

    #[test]
    fn backward_drag_probes_backward() {
        let (mut page, hello, world) = fixture();
        page.set_base_and_extent(Caret::new(world, 2), Caret::new(hello, 1));
        let before = snapshot(&page);
        let dir = resolve_direction(&mut page, hello, world);
        assert_eq!(dir, Some(Direction::Backward));
        assert_eq!(snapshot(&page), before);
    }

    #[test]
    fn forward_selection_ending_at_the_last_character_still_resolves() {
        let (mut page, hello, world) = fixture();
        // focus at the very end of the document text, forward probe is a no-op
        page.set_base_and_extent(Caret::new(hello, 2), Caret::new(world, 5));
        let before = snapshot(&page);
        assert_eq!(
            resolve_direction(&mut page, hello, world),
            Some(Direction::Forward)
        );
        assert_eq!(snapshot(&page), before);
    }

    #[test]
    fn backward_selection_reaching_the_first_character_still_resolves() {
        let (mut page, hello, world) = fixture();
        page.set_base_and_extent(Caret::new(world, 3), Caret::new(hello, 0));
        let before = snapshot(&page);
        assert_eq!(
            resolve_direction(&mut page, hello, world),
            Some(Direction::Backward)
        );
        assert_eq!(snapshot(&page), before);
    }

    #[test]
    fn select_all_is_immovable_and_undirected() {
        let (mut page, hello, world) = fixture();
        page.select_all();
        assert_eq!(resolve_direction(&mut page, hello, world), None);
        assert!(page.selection().is_directionless());
    }

    #[test]
    fn zero_width_hop_at_a_boundary_counts_as_forward() {
        let (mut page, hello, _) = fixture();
        // ends exactly at the end of "hello"; the forward probe can only hop
        page.set_base_and_extent(Caret::new(hello, 1), Caret::new(hello, 5));
        let before = snapshot(&page);
        assert_eq!(
            resolve_direction(&mut page, hello, hello),
            Some(Direction::Forward)
        );
        assert_eq!(snapshot(&page), before);
    }
}
