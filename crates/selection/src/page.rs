use std::collections::VecDeque;

use dom::{Caret, Document, DomError, NodeId};

use crate::profile::EngineProfile;
use crate::selection::{ExtendDirection, Selection};

/// Native events the engine queues for listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    SelectionChange,
}

/// A document plus its live selection, behaving like one engine profile.
///
/// All mutation goes through the page: DOM edits adjust the selection the
/// way the profile's engine would, and every observable selection change
/// queues a [`PageEvent::SelectionChange`] for listeners to drain. Time is
/// modeled as two counters: `task` advances at every macrotask boundary
/// (where zero-delay timers fire) and `frame` at every animation frame,
/// which is itself a task boundary.
pub struct Page {
    doc: Document,
    selection: Selection,
    profile: EngineProfile,
    native_events: VecDeque<PageEvent>,
    custom_events: VecDeque<&'static str>,
    frame: u64,
    task: u64,
}

impl Page {
    pub fn new(profile: EngineProfile) -> Self {
        Page {
            doc: Document::new(),
            selection: Selection::new(profile),
            profile,
            native_events: VecDeque::new(),
            custom_events: VecDeque::new(),
            frame: 0,
            task: 0,
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn profile(&self) -> EngineProfile {
        self.profile
    }

    // --- Time ---

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn task(&self) -> u64 {
        self.task
    }

    /// Ends the current macrotask: pending zero-delay timers are considered
    /// fired after this.
    pub fn next_task(&mut self) {
        self.task += 1;
    }

    /// Advances to the next animation frame, which also ends the task.
    pub fn next_frame(&mut self) {
        self.frame += 1;
        self.task += 1;
    }

    // --- Event queues ---

    pub fn poll_native_event(&mut self) -> Option<PageEvent> {
        self.native_events.pop_front()
    }

    pub fn pending_native_events(&self) -> usize {
        self.native_events.len()
    }

    pub fn dispatch_custom_event(&mut self, name: &'static str) {
        self.custom_events.push_back(name);
    }

    pub fn take_custom_events(&mut self) -> Vec<&'static str> {
        self.custom_events.drain(..).collect()
    }

    fn note_selection_change(&mut self, changed: bool) {
        if changed {
            self.native_events.push_back(PageEvent::SelectionChange);
        }
    }

    // --- DOM construction ---

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.doc.create_element(tag)
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.doc.create_text(data)
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.doc.create_comment(data)
    }

    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        self.doc.attach_shadow(host)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let pos = self.doc.children(parent).len();
        self.doc.append_child(parent, child)?;
        let changed = self.selection.adjust_for_insert(parent, pos);
        self.note_selection_change(changed);
        Ok(())
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: NodeId,
    ) -> Result<(), DomError> {
        self.doc.insert_before(parent, child, before)?;
        let pos = match self.doc.children(parent).iter().position(|c| *c == child) {
            Some(pos) => pos,
            None => return Ok(()),
        };
        let changed = self.selection.adjust_for_insert(parent, pos);
        self.note_selection_change(changed);
        Ok(())
    }

    // --- DOM mutation with selection reactions ---

    pub fn remove_node(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = match self.doc.parent(node) {
            Some(p) => p,
            None => {
                // delegate so the error policy stays in one place
                return self.doc.remove_node(node);
            }
        };
        let pos = self
            .doc
            .children(parent)
            .iter()
            .position(|c| *c == node)
            .unwrap_or(0);
        self.doc.remove_node(node)?;
        let changed = self.selection.adjust_for_remove(&self.doc, node, parent, pos);
        self.note_selection_change(changed);
        Ok(())
    }

    pub fn set_text(&mut self, node: NodeId, data: &str) -> Result<(), DomError> {
        self.doc.set_text(node, data)?;
        let changed = self
            .selection
            .adjust_for_text_len(node, self.doc.text_len(node));
        self.note_selection_change(changed);
        Ok(())
    }

    /// Splits a text node and relocates or clamps selection endpoints the
    /// way this page's engine does. The clamping variant is the measurable
    /// side effect offset bisection drives.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let parent_slot = self.doc.parent(node).and_then(|parent| {
            self.doc
                .children(parent)
                .iter()
                .position(|c| *c == node)
                .map(|pos| (parent, pos))
        });
        let tail = self.doc.split_text(node, offset)?;
        let changed = self
            .selection
            .adjust_for_split(node, offset, tail, parent_slot);
        self.note_selection_change(changed);
        log::trace!(
            target: "selection.engine",
            "split text node at {offset}, selection adjusted: {changed}"
        );
        Ok(tail)
    }

    pub fn push_char(&mut self, node: NodeId, ch: char) -> Result<(), DomError> {
        self.doc.push_char(node, ch)
    }

    pub fn pop_char(&mut self, node: NodeId) -> Result<char, DomError> {
        let ch = self.doc.pop_char(node)?;
        let changed = self
            .selection
            .adjust_for_text_len(node, self.doc.text_len(node));
        self.note_selection_change(changed);
        Ok(ch)
    }

    // --- Selection mutation ---

    pub fn clear_selection(&mut self) {
        let changed = self.selection.clear();
        self.note_selection_change(changed);
    }

    pub fn collapse(&mut self, at: Caret) {
        let changed = self.selection.collapse(at);
        self.note_selection_change(changed);
    }

    /// `Selection.setPosition`, an alias of collapse.
    pub fn set_position(&mut self, at: Caret) {
        self.collapse(at);
    }

    pub fn collapse_to_start(&mut self) {
        let changed = self.selection.collapse_to_start(&self.doc);
        self.note_selection_change(changed);
    }

    pub fn extend(&mut self, to: Caret) {
        let changed = self.selection.extend(&self.doc, to);
        self.note_selection_change(changed);
    }

    pub fn set_base_and_extent(&mut self, anchor: Caret, focus: Caret) {
        let changed = self.selection.set_base_and_extent(&self.doc, anchor, focus);
        self.note_selection_change(changed);
    }

    pub fn select_all(&mut self) {
        let changed = self.selection.select_all(&self.doc);
        self.note_selection_change(changed);
    }

    pub fn modify_extend(&mut self, dir: ExtendDirection) -> bool {
        let moved = self.selection.modify_extend(&self.doc, dir);
        self.note_selection_change(moved);
        moved
    }
}
