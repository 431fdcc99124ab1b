//! Foundation types for structdiff.
//!
//! Every decoder produces a [`Value`], and every consumer addresses locations
//! inside it with a [`Path`]. Format identity stops mattering at this layer.
//!
//! # Key Types
//!
//! - [`Value`] -- Closed value model (null, bool, number, string, sequence, mapping)
//! - [`ValueGraph`] -- Arena form of a value tree with stable composite identities
//! - [`NodeId`] -- Identity of a node inside a [`ValueGraph`]
//! - [`Path`] / [`Segment`] -- Canonical address of a location in a value tree

pub mod error;
pub mod graph;
pub mod path;
pub mod value;

pub use error::TypeError;
pub use graph::{GraphBuilder, Node, NodeId, ValueGraph};
pub use path::{Path, Segment};
pub use value::{Value, ValueKind};
