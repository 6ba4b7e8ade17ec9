//! # xml2class
//!
//! Infers a typed object schema from a sample XML document and generates
//! class declarations for the `pyxmlmapper` declarative mapping runtime,
//! binding object attributes to XPath queries over that document.
//!
//! ## Pipeline
//!
//! - [`documents`] parses the XML and exposes a flat open/close event stream
//! - [`tree`] rebuilds a structural tree from those events
//! - [`visitor`] walks the tree depth-first
//! - [`classify`] decides value / list of values / object / list of objects / date
//! - [`codegen`] accumulates class declarations and renders them
//!
//! ## Example
//!
//! ```rust
//! use xml2class::Generator;
//!
//! let code = Generator::new()
//!     .generate_str("<order><id>42</id><shipped>1999-05-21</shipped></order>")?;
//!
//! assert!(code.contains("class Order(base.BaseXmlParser):"));
//! assert!(code.contains("shipped = base.DateTimeField('./shipped', default='')"));
//! # Ok::<(), xml2class::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod options;

// Utilities
pub mod names;
pub mod namespaces;
pub mod locations;

// Resource loading
pub mod loaders;
pub mod documents;

// Inference
pub mod tree;
pub mod visitor;
pub mod classify;

// Code generation
pub mod codegen;
pub mod bulk;

// Re-exports for convenience
pub use classify::FieldKind;
pub use codegen::{ClassModel, Generator};
pub use error::{Error, Result};
pub use limits::Limits;
pub use options::GeneratorOptions;

/// Version of the xml2class library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate code for an XML text with default options
pub fn generate_from_str(xml: &str) -> Result<String> {
    Generator::new().generate_str(xml)
}

/// Generate code for an XML file with default options
pub fn generate_from_file(path: impl AsRef<std::path::Path>) -> Result<String> {
    Generator::new().generate_file(path)
}
