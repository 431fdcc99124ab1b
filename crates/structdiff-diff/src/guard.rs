//! Cycle guard: composite identities entered during one comparison.

use std::collections::HashSet;

use structdiff_types::NodeId;

/// Which input a node identity belongs to. Ids are only unique per graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Old,
    New,
}

/// Visited composite identities, scoped to a single diff call.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<(Side, NodeId)>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as entered. Returns `true` if it had already been entered.
    pub fn enter(&mut self, side: Side, id: NodeId) -> bool {
        !self.seen.insert((side, id))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
