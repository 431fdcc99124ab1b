//! Format collaborators for structdiff.
//!
//! Turns raw bytes from files, stdin, or HTTP(S) URLs into [`Value`](structdiff_types::Value)
//! trees. Once decoded, the diff engine never sees which format a document
//! came from.
//!
//! # Key Types
//!
//! - [`Format`] -- Supported formats, extension detection, and validation help
//! - [`decode`] -- Bytes to value tree for a given format
//! - [`SourceLoader`] -- Size-limited reads from paths, stdin, or URLs
//! - [`RemoteOptions`] -- Credentials, headers, and timeout for URL sources
//! - [`FormatError`] -- Everything that can go wrong before a diff starts

pub mod decode;
pub mod error;
pub mod format;
pub mod remote;
pub mod source;

pub use decode::decode;
pub use error::{FormatError, FormatResult};
pub use format::Format;
pub use remote::{is_remote, RemoteOptions, DEFAULT_TIMEOUT};
pub use source::{SourceLoader, DEFAULT_MAX_SIZE, STDIN};
