use thiserror::Error;

use crate::graph::NodeId;
use crate::value::ValueKind;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },

    #[error("node {0} does not belong to this graph")]
    UnknownNode(NodeId),

    #[error("node {id} is a {actual}, expected a {expected}")]
    NotComposite {
        id: NodeId,
        expected: ValueKind,
        actual: ValueKind,
    },
}

impl TypeError {
    pub(crate) fn invalid_path(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
