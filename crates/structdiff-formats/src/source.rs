//! Size-limited loading of documents from local files, stdin, or HTTP(S).

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use structdiff_types::Value;
use tracing::debug;

use crate::decode::decode;
use crate::error::{FormatError, FormatResult};
use crate::format::Format;
use crate::remote::{is_remote, RemoteOptions};

/// Source name that reads standard input.
pub const STDIN: &str = "-";

/// Default upper bound on a single document (10 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Reads raw document bytes with an upper size bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLoader {
    max_size: u64,
    remote: RemoteOptions,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl SourceLoader {
    /// A loader rejecting sources larger than `max_size` bytes. Zero disables the limit.
    pub fn new(max_size: u64) -> Self {
        Self {
            max_size,
            remote: RemoteOptions::default(),
        }
    }

    /// Use `remote` for `http://` and `https://` sources.
    pub fn with_remote(mut self, remote: RemoteOptions) -> Self {
        self.remote = remote;
        self
    }

    pub fn remote(&self) -> &RemoteOptions {
        &self.remote
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    fn limit(&self) -> Option<u64> {
        (self.max_size > 0).then_some(self.max_size)
    }

    /// Read a file path, a URL, or stdin when `source` is `-`.
    pub fn read(&self, source: &str) -> FormatResult<Vec<u8>> {
        if source == STDIN {
            return self.read_stream(source, std::io::stdin().lock());
        }
        if is_remote(source) {
            return self.fetch(source);
        }

        let path = Path::new(source);
        let io_err = |source| FormatError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(limit) = self.limit() {
            let size = fs::metadata(path).map_err(io_err)?.len();
            if size > limit {
                return Err(FormatError::TooLarge {
                    path: path.to_path_buf(),
                    size,
                    limit,
                });
            }
        }

        let bytes = fs::read(path).map_err(io_err)?;
        debug!(source, bytes = bytes.len(), "read file");
        Ok(bytes)
    }

    /// Read an arbitrary stream, failing once more than the limit arrives.
    pub fn read_stream(&self, label: &str, reader: impl Read) -> FormatResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let io_err = |source| FormatError::Io {
            path: PathBuf::from(label),
            source,
        };

        match self.limit() {
            Some(limit) => {
                reader
                    .take(limit.saturating_add(1))
                    .read_to_end(&mut bytes)
                    .map_err(io_err)?;
                let size = bytes.len() as u64;
                if size > limit {
                    return Err(FormatError::TooLarge {
                        path: PathBuf::from(label),
                        size,
                        limit,
                    });
                }
            }
            None => {
                let mut reader = reader;
                reader.read_to_end(&mut bytes).map_err(io_err)?;
            }
        }

        debug!(source = label, bytes = bytes.len(), "read stream");
        Ok(bytes)
    }

    /// GET `url`, failing on any status but `200 OK` or a body over the limit.
    pub fn fetch(&self, url: &str) -> FormatResult<Vec<u8>> {
        let http_err = |source| FormatError::Http {
            url: url.to_string(),
            source,
        };
        let client = self.remote.client(url)?;
        let response = self.remote.apply(client.get(url)).send().map_err(http_err)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FormatError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if let (Some(limit), Some(size)) = (self.limit(), response.content_length()) {
            if size > limit {
                return Err(FormatError::TooLarge {
                    path: PathBuf::from(url),
                    size,
                    limit,
                });
            }
        }

        debug!(url, "fetched remote document");
        self.read_stream(url, response)
    }

    /// Read and decode a source. `format` overrides extension detection and
    /// is required for stdin. URLs are detected by the extension of their
    /// path, ignoring any query string.
    pub fn load(&self, source: &str, format: Option<Format>) -> FormatResult<Value> {
        let format = match format {
            Some(format) => format,
            None => detect(source)?,
        };
        let bytes = self.read(source)?;
        decode(&bytes, format)
    }
}

fn detect(source: &str) -> FormatResult<Format> {
    if is_remote(source) {
        if let Ok(url) = reqwest::Url::parse(source) {
            return Format::detect(Path::new(url.path()));
        }
    }
    Format::detect(Path::new(source))
}
