//! Filenames and content types of stored files.

use crate::{Error, Result};
use std::fmt;

/// Maximum filename length, in bytes.
pub const MAX_FILENAME_LEN: usize = 255;

/// Content type recorded when an upload does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A validated filename: 1-255 bytes, no path separators or control
/// characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Filename(String);

impl Filename {
    /// Validate and wrap a filename.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidFilename("filename is empty".to_string()));
        }
        if s.len() > MAX_FILENAME_LEN {
            return Err(Error::InvalidFilename(format!(
                "filename exceeds {MAX_FILENAME_LEN} bytes"
            )));
        }
        if let Some(c) = s
            .chars()
            .find(|c| matches!(c, '/' | '\\') || c.is_control())
        {
            return Err(Error::InvalidFilename(format!(
                "filename contains invalid character {c:?}"
            )));
        }
        if s == "." || s == ".." {
            return Err(Error::InvalidFilename(format!("invalid filename: {s}")));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filename({})", self.0)
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The declared content type, or [`DEFAULT_CONTENT_TYPE`] when absent or blank.
pub fn content_type_or_default(declared: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_filenames() {
        for name in ["notes.txt", "a", "report 2024 (final).pdf", "ünïcödé.md", ".hidden"] {
            assert_eq!(Filename::parse(name).unwrap().as_str(), name);
        }
        assert!(Filename::parse(&"x".repeat(MAX_FILENAME_LEN)).is_ok());
    }

    #[test]
    fn test_invalid_filenames() {
        assert!(Filename::parse("").is_err());
        assert!(Filename::parse(&"x".repeat(MAX_FILENAME_LEN + 1)).is_err());
        assert!(Filename::parse("dir/file").is_err());
        assert!(Filename::parse("dir\\file").is_err());
        assert!(Filename::parse("bell\u{7}").is_err());
        assert!(Filename::parse("line\nbreak").is_err());
        assert!(Filename::parse("..").is_err());
    }

    #[test]
    fn test_length_is_counted_in_bytes() {
        // 128 two-byte characters
        let name = "é".repeat(128);
        assert!(matches!(
            Filename::parse(&name),
            Err(Error::InvalidFilename(_))
        ));
    }

    #[test]
    fn test_content_type_defaults() {
        assert_eq!(content_type_or_default(None), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_or_default(Some("  ")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_or_default(Some("text/plain")), "text/plain");
    }
}
