//! Document locations
//!
//! A sample document either lives on disk or is handed over as text.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where a sample document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// In-memory document text
    String(String),
}

impl Location {
    /// Create a location for a file on disk
    pub fn path(path: impl AsRef<Path>) -> Self {
        Location::Path(path.as_ref().to_path_buf())
    }

    /// Create a location for in-memory text
    pub fn text(text: impl Into<String>) -> Self {
        Location::String(text.into())
    }

    /// Identifier written at the top of generated code, if the location has one
    pub fn source_name(&self) -> Option<String> {
        match self {
            Location::Path(p) => Some(p.to_string_lossy().to_string()),
            Location::String(_) => None,
        }
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(p) => write!(f, "{}", p.display()),
            Location::String(_) => write!(f, "<string>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_path() {
        let loc = Location::path("/tmp/order.xml");
        assert!(loc.is_file());
        assert_eq!(loc.source_name().as_deref(), Some("/tmp/order.xml"));
        assert_eq!(loc.to_string(), "/tmp/order.xml");
    }

    #[test]
    fn test_location_from_text() {
        let loc = Location::text("<root/>");
        assert!(!loc.is_file());
        assert_eq!(loc.source_name(), None);
        assert_eq!(loc.to_string(), "<string>");
    }
}
