use dom::{Caret, DomError, DomRange, NodeId};
use selection::{ExtendDirection, Page, SelectionKind};

use crate::direction::{Direction, resolve_direction};
use crate::locate::{Side, find_node};

/// Outcome of resolving the live selection against one root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSelection {
    /// The selection does not reach into the root at all.
    None,
    /// The selection spans everything selectable and cannot be probed;
    /// both edges are taken whole.
    All { range: DomRange },
    /// A precisely resolved extent. `direction` is `None` for a caret.
    Normal {
        range: DomRange,
        direction: Option<Direction>,
    },
}

impl ResolvedSelection {
    pub fn range(&self) -> Option<DomRange> {
        match self {
            ResolvedSelection::None => None,
            ResolvedSelection::All { range } | ResolvedSelection::Normal { range, .. } => {
                Some(*range)
            }
        }
    }
}

/// Resolves the live selection into an exact range scoped to `root`, on
/// engines where no API reports cross-boundary endpoints.
///
/// The edges come from [`find_node`], the ordering from
/// [`resolve_direction`], and the character offsets from split probing: the
/// engine clamps selection endpoints when the text node under them is split,
/// and the clamp is observable as a change in the measured selection length
/// even though the endpoint positions cannot be read directly. All probing
/// is undone before returning; the resolved extent is re-applied onto the
/// live selection so the caller sees it exactly as the user left it.
///
/// `recent_caret` is the bridge's last collapsed position, used to repair
/// the direction of one-character selections on engines that store those
/// smallest-endpoint-first.
pub fn resolve_range(
    page: &mut Page,
    root: NodeId,
    recent_caret: Option<Caret>,
) -> Result<ResolvedSelection, DomError> {
    let kind = page.selection().kind();
    if kind == SelectionKind::None {
        return Ok(ResolvedSelection::None);
    }

    let left = find_node(page.doc(), page.selection(), root, Side::Left);
    if left == root {
        return Ok(ResolvedSelection::None);
    }

    let mut right = None;
    let mut direction = None;
    if kind == SelectionKind::Range {
        let node = find_node(page.doc(), page.selection(), root, Side::Right);
        match resolve_direction(page, left, node) {
            Some(found) => direction = Some(found),
            None => {
                let range = DomRange::new(
                    Caret::new(left, 0),
                    Caret::new(node, page.doc().node_length(node)),
                );
                return Ok(ResolvedSelection::All { range });
            }
        }
        right = Some(node);
    }

    let initial = page.selection().selected_len(page.doc());
    let start = match page.selection().range(page.doc()) {
        Some(range) => range.start,
        None => {
            debug_assert!(false, "selection vanished during resolution");
            return Ok(ResolvedSelection::None);
        }
    };

    let mut right_offset = 0;
    if let Some(node) = right {
        right_offset = if page.doc().kind(node).is_text() {
            bisect_right(page, node, initial)?
        } else {
            page.doc().node_length(node)
        };
    }

    let left_offset = bisect_left(page, left, start)?;

    let (right, right_offset) = match right {
        Some(node) => (node, right_offset),
        None => (left, left_offset),
    };

    // One-character selections can come back from the engine with their
    // endpoints reordered; the caret seen just before the drag tells the
    // true story.
    if initial == 1
        && direction == Some(Direction::Forward)
        && recent_caret.is_some_and(|rec| rec.node == left && rec.offset > left_offset)
    {
        direction = Some(Direction::Backward);
    }

    let resolved_start = Caret::new(left, left_offset);
    let resolved_end = Caret::new(right, right_offset);
    match direction {
        Some(Direction::Forward) => {
            page.collapse(resolved_start);
            page.extend(resolved_end);
        }
        Some(Direction::Backward) => {
            page.collapse(resolved_end);
            page.extend(resolved_start);
        }
        None => page.set_position(resolved_start),
    }

    log::trace!(target: "shadow.bisect", "resolved {resolved_start:?}..{resolved_end:?}, direction {direction:?}");
    Ok(ResolvedSelection::Normal {
        range: DomRange::new(resolved_start, resolved_end),
        direction,
    })
}

/// Finds the character offset of the selection's end inside `node`.
///
/// Scanning split points from the end of the text downward, the first split
/// that disturbs the measured length sits just left of the endpoint, which
/// is therefore at `i + 1`. A scan that changes nothing means the selection
/// ends at or before the node's start.
fn bisect_right(page: &mut Page, node: NodeId, initial: usize) -> Result<usize, DomError> {
    probe_splits(page, node, |probe| {
        for i in (0..probe.text_len()).rev() {
            probe.split(i)?;
            if probe.measure() != initial {
                return Ok(i + 1);
            }
        }
        Ok(0)
    })
}

/// Finds the character offset of the selection's start inside `node`.
///
/// The working state is a one-character selection anchored at the start:
/// collapse onto the start point, extend forward once. A split at the true
/// start offset clamps the extended focus back onto the collapsed point and
/// the measurement drops to zero. A baseline that starts out empty means
/// the extend went nowhere or made a zero-width hop off the node's end, so
/// a sentinel character is appended to give it one character of room; the
/// sentinel goes away with the rest of the probe leftovers. A baseline that
/// is empty even with the sentinel in place puts the start before the
/// node's first character, which is offset zero.
fn bisect_left(page: &mut Page, node: NodeId, start: Caret) -> Result<usize, DomError> {
    if !page.doc().kind(node).is_text() {
        return Ok(0);
    }
    probe_splits(page, node, |probe| {
        probe.page.collapse(start);
        probe.page.modify_extend(ExtendDirection::Forward);
        if probe.measure() == 0 {
            probe.page.push_char(node, '.')?;
            probe.page.collapse(start);
            probe.page.modify_extend(ExtendDirection::Forward);
            if probe.measure() == 0 {
                return Ok(0);
            }
        }
        for i in (0..probe.text_len()).rev() {
            probe.split(i)?;
            if probe.measure() == 0 {
                return Ok(i);
            }
        }
        Ok(0)
    })
}

struct TextProbe<'a> {
    page: &'a mut Page,
    node: NodeId,
    tails: Vec<NodeId>,
}

impl TextProbe<'_> {
    fn text_len(&self) -> usize {
        self.page.doc().text_len(self.node)
    }

    fn split(&mut self, offset: usize) -> Result<(), DomError> {
        let tail = self.page.split_text(self.node, offset)?;
        self.tails.push(tail);
        Ok(())
    }

    fn measure(&self) -> usize {
        self.page.selection().selected_len(self.page.doc())
    }
}

/// Runs `probe` with license to split `node` and grow its text, then puts
/// the text and sibling structure back exactly as found, on success and
/// error alike.
fn probe_splits<T>(
    page: &mut Page,
    node: NodeId,
    probe: impl FnOnce(&mut TextProbe<'_>) -> Result<T, DomError>,
) -> Result<T, DomError> {
    let original = match page.doc().text(node) {
        Some(data) => data.to_string(),
        None => {
            debug_assert!(false, "split probe on a non-text node");
            return Err(DomError::NotAText(node));
        }
    };
    let mut state = TextProbe {
        page: &mut *page,
        node,
        tails: Vec::new(),
    };
    let out = probe(&mut state);
    let tails = state.tails;
    page.set_text(node, &original)?;
    for tail in tails {
        page.remove_node(tail)?;
    }
    out
}
