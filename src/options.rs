//! Generator configuration

use crate::limits::Limits;

/// Options controlling tree building and code rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Resource limits for loading and tree building
    pub limits: Limits,
    /// Emit fields for attributes of container elements
    pub include_attributes: bool,
    /// Indentation of field lines inside a class block
    pub indent: String,
    /// Write the source file name as the first line of generated code
    pub source_comment: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            include_attributes: false,
            indent: "    ".to_string(),
            source_comment: true,
        }
    }
}

impl GeneratorOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set whether attributes of container elements become fields
    pub fn with_attributes(mut self, include: bool) -> Self {
        self.include_attributes = include;
        self
    }

    /// Set the field indentation
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Set whether file-based generation starts with a source comment
    pub fn with_source_comment(mut self, enabled: bool) -> Self {
        self.source_comment = enabled;
        self
    }
}
