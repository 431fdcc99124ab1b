//! Structural diff engine for structdiff.
//!
//! Walks two value trees in lock-step and reports every addition, removal,
//! and modification at a stable [`Path`](structdiff_types::Path). Sequences
//! are compared by position; mappings by key under a [`KeyMatch`] policy.
//!
//! # Key Types
//!
//! - [`diff`] / [`diff_graphs`] -- Entry points; each call is independent
//! - [`DiffOptions`] / [`KeyMatch`] -- Filter, key pairing, and string comparison settings
//! - [`PathFilter`] -- Segment-aligned allow-list of path prefixes
//! - [`VisitedSet`] -- Per-call cycle guard over composite identities
//! - [`DiffResult`] / [`DiffRecord`] / [`DiffKind`] -- The ordered change set

pub mod engine;
pub mod filter;
pub mod guard;
pub mod options;
pub mod record;

pub use engine::{diff, diff_graphs};
pub use filter::PathFilter;
pub use guard::{Side, VisitedSet};
pub use options::{DiffOptions, KeyMatch};
pub use record::{DiffCounts, DiffKind, DiffRecord, DiffResult};
