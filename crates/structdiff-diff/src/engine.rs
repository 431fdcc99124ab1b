//! The recursive comparator.
//!
//! Both inputs are walked depth-first in lock-step. Mapping keys are visited
//! in sorted order and sequence elements by ascending index, so the same
//! inputs always produce the same record order. The walk has no failure
//! modes: a shape mismatch becomes a `Modified` record.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use structdiff_types::{Node, NodeId, Path, Value, ValueGraph};
use tracing::debug;

use crate::guard::{Side, VisitedSet};
use crate::options::{DiffOptions, KeyMatch};
use crate::record::{DiffRecord, DiffResult};

/// Compare two value trees.
///
/// Each call owns all of its working state; concurrent calls are
/// independent.
pub fn diff(old: &Value, new: &Value, options: &DiffOptions) -> DiffResult {
    diff_graphs(
        &ValueGraph::from_value(old),
        &ValueGraph::from_value(new),
        options,
    )
}

/// Compare two value graphs, which may share or cycle through composites.
///
/// A composite already entered during this call (on either side) is not
/// descended into again; the pair is treated as equal from that point.
pub fn diff_graphs(old: &ValueGraph, new: &ValueGraph, options: &DiffOptions) -> DiffResult {
    let mut walk = Walk {
        old,
        new,
        options,
        visited: VisitedSet::new(),
        records: Vec::new(),
    };
    walk.compare(&Path::root(), old.root(), new.root());

    let visited = walk.visited.len();
    let result = DiffResult::from_records(walk.records);
    let counts = result.counts();
    debug!(
        total = counts.total,
        added = counts.added,
        removed = counts.removed,
        modified = counts.modified,
        visited,
        "structural diff complete"
    );
    result
}

struct Walk<'g> {
    old: &'g ValueGraph,
    new: &'g ValueGraph,
    options: &'g DiffOptions,
    visited: VisitedSet,
    records: Vec<DiffRecord>,
}

impl<'g> Walk<'g> {
    fn compare(&mut self, path: &Path, a: NodeId, b: NodeId) {
        let (old, new) = (self.old, self.new);
        match (old.node(a), new.node(b)) {
            (Node::Mapping(left), Node::Mapping(right)) => {
                if !self.revisits(a, b) {
                    self.compare_mappings(path, left, right);
                }
            }
            (Node::Sequence(left), Node::Sequence(right)) => {
                if !self.revisits(a, b) {
                    self.compare_sequences(path, left, right);
                }
            }
            (Node::Null, Node::Null) => {}
            (Node::Bool(x), Node::Bool(y)) => {
                if x != y {
                    self.modified(path, a, b);
                }
            }
            (Node::Number(x), Node::Number(y)) => {
                if !numbers_equal(*x, *y) {
                    self.modified(path, a, b);
                }
            }
            (Node::String(x), Node::String(y)) => {
                if !self.strings_equal(x, y) {
                    self.modified(path, a, b);
                }
            }
            // Every same-variant pair is handled above.
            _ => self.modified(path, a, b),
        }
    }

    /// Enter both composites; returns `true` if either was already entered.
    fn revisits(&mut self, a: NodeId, b: NodeId) -> bool {
        let seen_old = self.visited.enter(Side::Old, a);
        let seen_new = self.visited.enter(Side::New, b);
        seen_old || seen_new
    }

    fn compare_mappings(
        &mut self,
        path: &Path,
        left: &'g BTreeMap<String, NodeId>,
        right: &'g BTreeMap<String, NodeId>,
    ) {
        let key_match = self.options.key_match;
        let left = index_keys(left, key_match);
        let right = index_keys(right, key_match);
        let keys: BTreeSet<&Cow<'g, str>> = left.keys().chain(right.keys()).collect();

        for key in keys {
            match (left.get(key), right.get(key)) {
                (Some(&(name, a)), Some(&(_, b))) => self.compare(&path.child(name), a, b),
                (Some(&(name, a)), None) => self.removed(&path.child(name), a),
                (None, Some(&(name, b))) => self.added(&path.child(name), b),
                (None, None) => {}
            }
        }
    }

    fn compare_sequences(&mut self, path: &Path, left: &'g [NodeId], right: &'g [NodeId]) {
        let common = left.len().min(right.len());
        for (i, (a, b)) in left.iter().zip(right).enumerate() {
            self.compare(&path.index(i), *a, *b);
        }
        for (i, a) in left.iter().enumerate().skip(common) {
            self.removed(&path.index(i), *a);
        }
        for (i, b) in right.iter().enumerate().skip(common) {
            self.added(&path.index(i), *b);
        }
    }

    fn strings_equal(&self, x: &str, y: &str) -> bool {
        if self.options.value_compare_ignore_case {
            x == y || x.to_lowercase() == y.to_lowercase()
        } else {
            x == y
        }
    }

    fn added(&mut self, path: &Path, b: NodeId) {
        if self.options.filter.allows(path) {
            let value = self.new.to_value(b);
            self.records.push(DiffRecord::added(path.clone(), value));
        }
    }

    fn removed(&mut self, path: &Path, a: NodeId) {
        if self.options.filter.allows(path) {
            let value = self.old.to_value(a);
            self.records.push(DiffRecord::removed(path.clone(), value));
        }
    }

    fn modified(&mut self, path: &Path, a: NodeId, b: NodeId) {
        if self.options.filter.allows(path) {
            let (old, new) = (self.old.to_value(a), self.new.to_value(b));
            self.records.push(DiffRecord::modified(path.clone(), old, new));
        }
    }
}

/// Key each entry by its pairing text, keeping the first (smallest) original
/// key when several collide.
fn index_keys(
    entries: &BTreeMap<String, NodeId>,
    key_match: KeyMatch,
) -> BTreeMap<Cow<'_, str>, (&str, NodeId)> {
    let mut index = BTreeMap::new();
    for (key, id) in entries {
        index
            .entry(key_match.normalize(key))
            .or_insert((key.as_str(), *id));
    }
    index
}

/// Numeric equality, except that NaN equals NaN so a tree always equals itself.
fn numbers_equal(x: f64, y: f64) -> bool {
    x == y || (x.is_nan() && y.is_nan())
}
