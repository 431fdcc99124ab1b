//! Error types for the formats crate.

use std::path::PathBuf;

use crate::format::Format;

/// Errors raised while locating, reading, or decoding a document.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// An explicit format name was not recognised.
    #[error("unknown format: {0:?}")]
    UnknownFormat(String),

    /// The file extension does not map to a supported format.
    #[error("cannot detect format of {path}: unsupported extension {extension:?}")]
    UnsupportedExtension { path: PathBuf, extension: String },

    /// The source has no extension and no format was given (e.g. stdin).
    #[error("cannot detect format of {0}: specify the format explicitly")]
    MissingFormat(PathBuf),

    /// Reading the source failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote request could not be sent or its response not received.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A remote server answered with something other than `200 OK`.
    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    /// The source exceeds the configured size limit.
    #[error("{path} is at least {size} bytes, exceeding the limit of {limit} bytes")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The content is not a well-formed document of the format.
    #[error("invalid {format} document: {message}")]
    Decode { format: Format, message: String },
}

impl FormatError {
    pub(crate) fn decode(format: Format, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            format,
            message: err.to_string(),
        }
    }

    /// Validation tips for decode failures.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::Decode { format, .. } => Some(format.validation_help()),
            _ => None,
        }
    }
}

/// Convenience alias for format results.
pub type FormatResult<T> = Result<T, FormatError>;
