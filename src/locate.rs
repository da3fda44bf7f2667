use dom::{Document, NodeId, is_void_tag};
use selection::Selection;

/// Which edge of the selection a search runs toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Descends from `parent` to the most specific node bounding the selection
/// on one side.
///
/// Children are scanned in composed order, natural for [`Side::Left`] and
/// reversed for [`Side::Right`], so the first hit is the outermost node on
/// that edge. A fully covered child is the boundary as-is, with no
/// descending. A partially covered child is entered, except for void and
/// raw-content elements, which cannot hold a usable inner position and are
/// returned whole. Entering a text node scans an empty child list and falls
/// back out with the text node itself. When no child intersects at all,
/// `parent` comes back unchanged; the top-level caller reads that as "the
/// selection does not reach this root".
pub fn find_node(doc: &Document, sel: &Selection, parent: NodeId, side: Side) -> NodeId {
    let children = doc.composed_children(parent);
    let len = children.len();
    for i in 0..len {
        let child = match side {
            Side::Left => children[i],
            Side::Right => children[len - 1 - i],
        };
        if doc.kind(child).is_comment() {
            continue;
        }
        if sel.contains_node(doc, child, false) {
            return child;
        }
        if sel.contains_node(doc, child, true) {
            if doc.tag(child).is_some_and(is_void_tag) {
                return child;
            }
            return find_node(doc, sel, child, side);
        }
    }
    parent
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::Caret;
    use selection::{EngineProfile, Page};

    // <div> "ab" <x-host>#shadow("cd" "ef")</x-host> "gh" </div>
    fn fixture() -> (Page, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut page = Page::new(EngineProfile::safari());
        let div = page.create_element("div");
        page.append_child(NodeId::DOCUMENT, div).unwrap();
        let ab = page.create_text("ab");
        page.append_child(div, ab).unwrap();
        let host = page.create_element("x-host");
        page.append_child(div, host).unwrap();
        let root = page.attach_shadow(host).unwrap();
        let cd = page.create_text("cd");
        page.append_child(root, cd).unwrap();
        let ef = page.create_text("ef");
        page.append_child(root, ef).unwrap();
        let gh = page.create_text("gh");
        page.append_child(div, gh).unwrap();
        (page, div, ab, host, cd, gh)
    }

    #[test]
    fn boundaries_resolve_to_partial_text_nodes() {
        let (mut page, div, ab, _, _, gh) = fixture();
        page.set_base_and_extent(Caret::new(ab, 1), Caret::new(gh, 1));
        let sel = page.selection();
        assert_eq!(find_node(page.doc(), sel, div, Side::Left), ab);
        assert_eq!(find_node(page.doc(), sel, div, Side::Right), gh);
    }

    #[test]
    fn left_search_descends_into_a_shadow_root() {
        let (mut page, div, _, _, cd, gh) = fixture();
        page.set_base_and_extent(Caret::new(cd, 1), Caret::new(gh, 2));
        let sel = page.selection();
        assert_eq!(find_node(page.doc(), sel, div, Side::Left), cd);
    }

    #[test]
    fn fully_covered_child_is_returned_without_descending() {
        let (mut page, div, _, host, ..) = fixture();
        // from the host's slot to the end of the div: the host is wholly inside
        page.set_base_and_extent(Caret::new(div, 1), Caret::new(div, 3));
        let sel = page.selection();
        assert_eq!(find_node(page.doc(), sel, div, Side::Left), host);
    }

    #[test]
    fn caret_inside_text_finds_that_text() {
        let (mut page, div, _, _, cd, _) = fixture();
        page.set_position(Caret::new(cd, 1));
        let sel = page.selection();
        assert_eq!(find_node(page.doc(), sel, div, Side::Left), cd);
        assert_eq!(find_node(page.doc(), sel, div, Side::Right), cd);
    }

    #[test]
    fn detached_selection_returns_the_root_itself() {
        let (mut page, _, ab, ..) = fixture();
        let other = page.create_element("aside");
        page.append_child(NodeId::DOCUMENT, other).unwrap();
        let lone = page.create_text("xy");
        page.append_child(other, lone).unwrap();
        page.set_base_and_extent(Caret::new(ab, 0), Caret::new(ab, 2));
        let sel = page.selection();
        assert_eq!(find_node(page.doc(), sel, other, Side::Left), other);
    }

    #[test]
    fn void_elements_are_never_entered() {
        let mut page = Page::new(EngineProfile::safari());
        let div = page.create_element("div");
        page.append_child(NodeId::DOCUMENT, div).unwrap();
        let img = page.create_element("img");
        page.append_child(div, img).unwrap();
        let stray = page.create_text("alt");
        page.append_child(img, stray).unwrap();
        let tail = page.create_text("xyz");
        page.append_child(div, tail).unwrap();

        // crosses the img boundary; a descent would surface the stray text
        page.set_base_and_extent(Caret::new(stray, 0), Caret::new(tail, 2));
        let sel = page.selection();
        assert_eq!(find_node(page.doc(), sel, div, Side::Left), img);
    }
}
