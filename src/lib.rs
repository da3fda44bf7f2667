//! Resolves text selections that cross shadow DOM boundaries.
//!
//! Engines disagree about what a script may see of a selection that starts
//! or ends inside a shadow tree: some report it truthfully, some scope it
//! per root, and some clamp everything to the light tree and keep the real
//! endpoints to themselves. [`SelectionResolver`] picks a read strategy for
//! the engine it runs on and, on the worst one, reconstructs the hidden
//! endpoints by probing: mutating the live selection, measuring what the
//! engine reports back, and undoing every step.
//!
//! Feed native `selectionchange` events through [`SelectionResolver::pump`]
//! and read the current range for a root with
//! [`SelectionResolver::get_range`]. Listeners interested in user-driven
//! changes should watch for the [`SHADOW_SELECTION_CHANGE`] event the pump
//! re-dispatches, not the native storm the probing produces.

use std::cmp::Ordering;

use dom::{Caret, Document, DomError, DomRange, NodeId};
use selection::{EngineProfile, Page, PageEvent};

pub mod bisect;
pub mod bridge;
pub mod cache;
pub mod detect;
pub mod direction;
pub mod locate;

pub use bisect::{ResolvedSelection, resolve_range};
pub use bridge::{Bridge, SHADOW_SELECTION_CHANGE};
pub use cache::RangeCache;
pub use detect::Strategy;
pub use direction::{Direction, resolve_direction};
pub use locate::{Side, find_node};

/// Entry point tying detection, event handling and range resolution
/// together for one page.
pub struct SelectionResolver {
    strategy: Strategy,
    bridge: Bridge,
    cache: RangeCache,
}

impl SelectionResolver {
    pub fn new(profile: EngineProfile) -> Self {
        SelectionResolver {
            strategy: Strategy::detect(profile),
            bridge: Bridge::new(),
            cache: RangeCache::new(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Drains the page's native event queue through the bridge. Call once
    /// per turn, before reading ranges.
    pub fn pump(&mut self, page: &mut Page) -> Result<(), DomError> {
        while let Some(event) = page.poll_native_event() {
            match event {
                PageEvent::SelectionChange => {
                    self.bridge.on_selection_change(page, self.strategy)?;
                }
            }
        }
        Ok(())
    }

    /// The current selection range scoped to `root`, or `None` when the
    /// selection does not reach into it.
    ///
    /// On the probing strategy this may mutate and restore the live
    /// selection; results are memoized per task so repeated reads within
    /// one task resolve at most once.
    pub fn get_range(
        &mut self,
        page: &mut Page,
        root: NodeId,
    ) -> Result<Option<DomRange>, DomError> {
        match self.strategy {
            Strategy::Document => {
                let doc = page.doc();
                let range = page
                    .selection()
                    .document_range(doc)
                    .filter(|r| range_touches(doc, r, root));
                Ok(range)
            }
            Strategy::PerRoot => Ok(page.selection().scoped_range(page.doc(), root)),
            Strategy::Probe => {
                if let Some(hit) = self.cache.get(page.task(), root) {
                    log::trace!(target: "shadow.range", "cache hit for {root:?}");
                    return Ok(hit);
                }
                let resolved = resolve_range(page, root, self.bridge.recent_caret())?;
                let range = resolved.range();
                self.cache.put(page.task(), root, range);
                Ok(range)
            }
        }
    }
}

/// True when `r` intersects the content span of `root`. A collapsed range
/// touches at the edges, a proper range needs actual overlap.
fn range_touches(doc: &Document, r: &DomRange, root: NodeId) -> bool {
    let first = Caret::new(root, 0);
    let last = Caret::new(root, doc.node_length(root));
    if r.is_collapsed() {
        doc.cmp_boundary(first, r.start) != Ordering::Greater
            && doc.cmp_boundary(r.start, last) != Ordering::Greater
    } else {
        doc.cmp_boundary(first, r.end) == Ordering::Less
            && doc.cmp_boundary(r.start, last) == Ordering::Less
    }
}
