//! Code generation from sample documents
//!
//! The [`Generator`] wires the pipeline together: load the document, rebuild
//! its structural tree, walk it with a [`CodeBuilder`] and render the
//! resulting [`ClassModel`]. Each call builds fresh state, so one generator
//! can be shared between threads.

mod builder;
mod model;
mod render;

pub use builder::CodeBuilder;
pub use model::{ClassDecl, ClassModel, FieldDecl};
pub use render::{render, PREAMBLE};

use crate::documents::Document;
use crate::error::Result;
use crate::loaders::Loader;
use crate::locations::Location;
use crate::options::GeneratorOptions;
use crate::tree::{build_tree, SchemaTree};
use crate::visitor::{walk, TreePrinter};
use std::path::Path;

/// Infer the class declarations of a tree
pub fn infer_model(tree: &SchemaTree) -> Result<ClassModel> {
    let mut builder = CodeBuilder::new();
    walk(tree, &mut builder)?;
    Ok(builder.into_model())
}

/// Schema inference and code generation entry point
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    /// Create a generator with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with the given options
    pub fn with_options(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Build the structural tree of an XML text
    pub fn tree(&self, xml: &str) -> Result<SchemaTree> {
        let document = Document::parse(xml, &self.options.limits)?;
        build_tree(&document, &self.options)
    }

    /// Infer the class declarations of an XML text
    pub fn model(&self, xml: &str) -> Result<ClassModel> {
        infer_model(&self.tree(xml)?)
    }

    /// Generate code for an XML text
    pub fn generate_str(&self, xml: &str) -> Result<String> {
        self.generate_with_source(xml, None)
    }

    /// Generate code for a document at any location
    ///
    /// File locations get a leading source comment unless disabled in the options.
    pub fn generate(&self, location: &Location) -> Result<String> {
        let xml = Loader::new()
            .with_limits(self.options.limits.clone())
            .load(location)?;
        let source = location
            .source_name()
            .filter(|_| self.options.source_comment);
        self.generate_with_source(&xml, source.as_deref())
    }

    /// Generate code for a file
    pub fn generate_file(&self, path: impl AsRef<Path>) -> Result<String> {
        self.generate(&Location::path(path))
    }

    /// Diagnostic dump of the structural tree of an XML text
    pub fn print_tree(&self, xml: &str) -> Result<String> {
        let tree = self.tree(xml)?;
        let mut printer = TreePrinter::new();
        walk(&tree, &mut printer)?;
        Ok(printer.into_string())
    }

    fn generate_with_source(&self, xml: &str, source: Option<&str>) -> Result<String> {
        let model = self.model(xml)?;
        tracing::debug!(classes = model.len(), "inferred class model");
        Ok(render(&model, &self.options.indent, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_generate_str() {
        let code = Generator::new()
            .generate_str("<root><child>value</child></root>")
            .unwrap();
        assert!(code.starts_with(PREAMBLE));
        assert!(code.contains("class Root(base.BaseXmlParser):"));
        assert!(code.contains("    child = base.ValueField('./child', default='')  # value"));
    }

    #[test]
    fn test_generate_file_with_source_comment() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<root><child>value</child></root>").unwrap();

        let code = Generator::new().generate_file(file.path()).unwrap();
        let expected_first = format!("#  {}", file.path().display());
        assert_eq!(code.lines().next(), Some(expected_first.as_str()));

        let options = GeneratorOptions::default().with_source_comment(false);
        let code = Generator::with_options(options)
            .generate_file(file.path())
            .unwrap();
        assert!(code.starts_with(PREAMBLE));
    }

    #[test]
    fn test_generate_from_text_location() {
        let location = Location::text("<root><child>value</child></root>");
        assert!(!location.is_file());
        let code = Generator::new().generate(&location).unwrap();
        assert!(code.starts_with(PREAMBLE));
    }

    #[test]
    fn test_malformed_document() {
        let result = Generator::new().generate_str("<root><open></root>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_print_tree() {
        let printed = Generator::new()
            .print_tree("<root><a>1</a></root>")
            .unwrap();
        assert!(printed.contains("  a: 1    ./a"));
    }
}
