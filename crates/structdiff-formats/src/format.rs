use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// A supported document format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Toml,
    Ini,
    Csv,
}

impl Format {
    /// Every supported format, in display order.
    pub const ALL: [Format; 5] = [
        Format::Json,
        Format::Yaml,
        Format::Toml,
        Format::Ini,
        Format::Csv,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Ini => "ini",
            Self::Csv => "csv",
        }
    }

    /// File extensions (without the dot) that map to this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::Yaml => &["yaml", "yml"],
            Self::Toml => &["toml"],
            Self::Ini => &["ini", "cfg"],
            Self::Csv => &["csv"],
        }
    }

    /// Case-insensitive extension lookup.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extensions().contains(&extension.as_str()))
    }

    /// Detect the format of a file from its extension.
    pub fn detect(path: &Path) -> Result<Self, FormatError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| FormatError::MissingFormat(path.to_path_buf()))?;
        Self::from_extension(extension).ok_or_else(|| FormatError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        })
    }

    /// Tips shown when a document of this format fails to decode.
    pub fn validation_help(&self) -> &'static str {
        match self {
            Self::Json => {
                "JSON validation tips:\n\
                 • Check for proper quoting of all strings\n\
                 • Verify all brackets and braces are balanced\n\
                 • Ensure trailing commas are removed\n\
                 • Validate correct use of null, true, false literals"
            }
            Self::Yaml => {
                "YAML validation tips:\n\
                 • Use spaces for indentation (no tabs)\n\
                 • Ensure proper colon usage in key: value pairs\n\
                 • Quote strings with special characters\n\
                 • Check for consistent indentation levels\n\
                 • Verify multiline strings use proper syntax (| or >)"
            }
            Self::Toml => {
                "TOML validation tips:\n\
                 • Use key = \"value\" format\n\
                 • Tables should be in [table] format\n\
                 • Arrays use brackets: values = [1, 2, 3]\n\
                 • Ensure proper quoting of strings"
            }
            Self::Ini => {
                "INI validation tips:\n\
                 • Ensure each section is in brackets [section]\n\
                 • Use key=value format for properties\n\
                 • Comments start with ; or #\n\
                 • Escape special characters properly"
            }
            Self::Csv => {
                "CSV validation tips:\n\
                 • Ensure consistent column count per row\n\
                 • Properly escape quotes in quoted fields\n\
                 • Use consistent line endings\n\
                 • Check for malformed records"
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    /// Accepts a format name or any of its extensions, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(wanted))
            .or_else(|| Self::from_extension(wanted))
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}
