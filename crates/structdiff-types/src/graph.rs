//! Arena representation of value trees.
//!
//! A [`ValueGraph`] stores every node of a document in a flat arena and
//! addresses it by [`NodeId`]. Composites refer to their children by id, so
//! the id of a mapping or sequence is a stable identity assigned once at
//! construction. This is what the cycle guard keys on.
//!
//! Graphs lowered from a [`Value`] are always trees. [`GraphBuilder`] can also
//! produce shared and cyclic graphs by reserving a composite slot first and
//! filling it afterwards; once [`GraphBuilder::build`] returns, the graph is
//! immutable.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::TypeError;
use crate::value::{Value, ValueKind};

/// Identity of a node inside one [`ValueGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of a [`ValueGraph`]. Mirrors [`Value`], with composites holding
/// child ids instead of owned children.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<NodeId>),
    Mapping(BTreeMap<String, NodeId>),
}

impl Node {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }
}

/// An immutable, arena-backed value document.
///
/// Every child id stored in the graph is guaranteed to belong to it, which
/// [`GraphBuilder`] checks as nodes are linked.
#[derive(Clone, Debug)]
pub struct ValueGraph {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ValueGraph {
    /// Lower an owned value tree into a graph. Each composite gets its own id.
    pub fn from_value(value: &Value) -> Self {
        let mut builder = GraphBuilder::new();
        let root = builder.insert_value(value);
        Self {
            nodes: builder.nodes,
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different graph and is out of range.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The node behind `id`, if it belongs to this graph.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Snapshot the subtree under `id` as an owned value.
    ///
    /// Each composite is expanded at most once per snapshot. A later
    /// occurrence, whether a back-edge of a cycle or a second reference to a
    /// shared node, renders as [`Value::Null`]. This keeps the snapshot linear
    /// in the size of the graph; graphs lowered from a [`Value`] are trees and
    /// snapshot losslessly.
    pub fn to_value(&self, id: NodeId) -> Value {
        let mut expanded = HashSet::new();
        self.snapshot(id, &mut expanded)
    }

    fn snapshot(&self, id: NodeId, expanded: &mut HashSet<NodeId>) -> Value {
        match self.node(id) {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(*n),
            Node::String(s) => Value::String(s.clone()),
            Node::Sequence(_) | Node::Mapping(_) if !expanded.insert(id) => Value::Null,
            Node::Sequence(items) => {
                Value::Sequence(items.iter().map(|c| self.snapshot(*c, expanded)).collect())
            }
            Node::Mapping(entries) => Value::Mapping(
                entries
                    .iter()
                    .map(|(k, c)| (k.clone(), self.snapshot(*c, expanded)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for ValueGraph {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

/// Incremental constructor for [`ValueGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        // Arena indices never exceed u32 for documents that fit in memory.
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn check(&self, id: NodeId) -> Result<(), TypeError> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(TypeError::UnknownNode(id))
        }
    }

    /// Add a node whose children (if any) were already added.
    pub fn push(&mut self, node: Node) -> Result<NodeId, TypeError> {
        match &node {
            Node::Sequence(items) => items.iter().try_for_each(|c| self.check(*c))?,
            Node::Mapping(entries) => entries.values().try_for_each(|c| self.check(*c))?,
            _ => {}
        }
        Ok(self.alloc(node))
    }

    /// Lower an owned value, returning the id of its root.
    pub fn insert_value(&mut self, value: &Value) -> NodeId {
        match value {
            Value::Null => self.alloc(Node::Null),
            Value::Bool(b) => self.alloc(Node::Bool(*b)),
            Value::Number(n) => self.alloc(Node::Number(*n)),
            Value::String(s) => self.alloc(Node::String(s.clone())),
            Value::Sequence(items) => {
                let id = self.alloc(Node::Sequence(Vec::with_capacity(items.len())));
                let children: Vec<NodeId> = items.iter().map(|v| self.insert_value(v)).collect();
                self.nodes[id.index()] = Node::Sequence(children);
                id
            }
            Value::Mapping(entries) => {
                let id = self.alloc(Node::Mapping(BTreeMap::new()));
                let children = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.insert_value(v)))
                    .collect();
                self.nodes[id.index()] = Node::Mapping(children);
                id
            }
        }
    }

    /// Allocate an empty mapping to be filled with [`set_entry`](Self::set_entry).
    pub fn reserve_mapping(&mut self) -> NodeId {
        self.alloc(Node::Mapping(BTreeMap::new()))
    }

    /// Allocate an empty sequence to be filled with [`push_item`](Self::push_item).
    pub fn reserve_sequence(&mut self) -> NodeId {
        self.alloc(Node::Sequence(Vec::new()))
    }

    /// Insert or replace `key` in a mapping node.
    pub fn set_entry(
        &mut self,
        mapping: NodeId,
        key: impl Into<String>,
        child: NodeId,
    ) -> Result<(), TypeError> {
        self.check(mapping)?;
        self.check(child)?;
        match &mut self.nodes[mapping.index()] {
            Node::Mapping(entries) => {
                entries.insert(key.into(), child);
                Ok(())
            }
            other => Err(TypeError::NotComposite {
                id: mapping,
                expected: ValueKind::Mapping,
                actual: other.kind(),
            }),
        }
    }

    /// Append a child to a sequence node.
    pub fn push_item(&mut self, sequence: NodeId, child: NodeId) -> Result<(), TypeError> {
        self.check(sequence)?;
        self.check(child)?;
        match &mut self.nodes[sequence.index()] {
            Node::Sequence(items) => {
                items.push(child);
                Ok(())
            }
            other => Err(TypeError::NotComposite {
                id: sequence,
                expected: ValueKind::Sequence,
                actual: other.kind(),
            }),
        }
    }

    /// Freeze the graph with `root` as its document root.
    pub fn build(self, root: NodeId) -> Result<ValueGraph, TypeError> {
        self.check(root)?;
        Ok(ValueGraph {
            nodes: self.nodes,
            root,
        })
    }
}
