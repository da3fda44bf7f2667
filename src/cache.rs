use std::collections::HashMap;

use dom::{DomRange, NodeId};

/// Memoizes resolved ranges per shadow root for the duration of one task.
///
/// Resolution mutates the live selection, so two reads in the same task must
/// not trigger two resolutions. Entries hold `Option<DomRange>` because "no
/// selection in this root" is just as expensive to recompute as a hit.
pub struct RangeCache {
    task: u64,
    entries: HashMap<NodeId, Option<DomRange>>,
}

impl RangeCache {
    pub fn new() -> Self {
        RangeCache {
            task: 0,
            entries: HashMap::new(),
        }
    }

    /// Looks up the cached result for `root`, `None` when the entry is
    /// missing or was computed in an earlier task.
    pub fn get(&self, task: u64, root: NodeId) -> Option<Option<DomRange>> {
        if task != self.task {
            return None;
        }
        self.entries.get(&root).copied()
    }

    /// Stores the result computed for `root` in `task`, evicting everything
    /// from older tasks first.
    pub fn put(&mut self, task: u64, root: NodeId, range: Option<DomRange>) {
        if task != self.task {
            self.entries.clear();
            self.task = task;
        }
        self.entries.insert(root, range);
    }
}

impl Default for RangeCache {
    fn default() -> Self {
        RangeCache::new()
    }
}
