//! Cardinality and type classification of tree nodes
//!
//! Every node is classified once into a [`Classification`]: a container or a
//! leaf, single or repeated among its siblings. Together with the leaf text
//! this yields the [`FieldKind`] emitted for the node.

use crate::tree::{NodeId, SchemaTree};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Texts shorter than this are too ambiguous to be taken for dates
pub const MIN_DATE_LENGTH: usize = 10;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%d%H%M%S",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Whether a node holds nested nodes or a plain value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    /// Has children; becomes a nested class
    Container,
    /// No children; holds a text value
    Leaf,
}

/// Whether other children of the same parent share the node's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    /// The only child with this name
    Single,
    /// Two or more siblings with this name
    Repeated,
}

/// Binding construct emitted for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single text value
    Value,
    /// Collection of text values
    ListValue,
    /// Single nested object
    Object,
    /// Collection of nested objects
    ListObject,
    /// Single value that looks like a date
    DateTime,
}

impl FieldKind {
    /// Name of the runtime field class bound by this kind
    pub fn runtime_class(self) -> &'static str {
        match self {
            FieldKind::Value => "ValueField",
            FieldKind::ListValue => "ListValueField",
            FieldKind::Object => "ObjectField",
            FieldKind::ListObject => "ListObjectField",
            FieldKind::DateTime => "DateTimeField",
        }
    }

    /// Check if the field yields a collection
    pub fn is_collection(self) -> bool {
        matches!(self, FieldKind::ListValue | FieldKind::ListObject)
    }

    /// Check if the field refers to a nested class
    pub fn is_nested(self) -> bool {
        matches!(self, FieldKind::Object | FieldKind::ListObject)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Value => "value",
            FieldKind::ListValue => "list_value",
            FieldKind::Object => "object",
            FieldKind::ListObject => "list_object",
            FieldKind::DateTime => "date_time",
        };
        f.write_str(name)
    }
}

/// Classification of one node, computed once per visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Container or leaf
    pub shape: Shape,
    /// Single or repeated
    pub cardinality: Cardinality,
    /// The root is declared as a class, never as a field
    pub is_root: bool,
}

impl Classification {
    /// Field kind for this node given its trimmed text
    pub fn field_kind(&self, text: &str) -> FieldKind {
        match (self.shape, self.cardinality) {
            (Shape::Container, Cardinality::Repeated) => FieldKind::ListObject,
            (Shape::Container, Cardinality::Single) => FieldKind::Object,
            (Shape::Leaf, Cardinality::Repeated) => FieldKind::ListValue,
            (Shape::Leaf, Cardinality::Single) if looks_like_date(text) => FieldKind::DateTime,
            (Shape::Leaf, Cardinality::Single) => FieldKind::Value,
        }
    }
}

/// Classify a node of the tree
pub fn classify(tree: &SchemaTree, id: NodeId) -> Classification {
    let node = tree.node(id);
    let shape = if node.has_children() {
        Shape::Container
    } else {
        Shape::Leaf
    };
    let cardinality = if tree.has_same_siblings(id) {
        Cardinality::Repeated
    } else {
        Cardinality::Single
    };
    Classification {
        shape,
        cardinality,
        is_root: node.parent.is_none(),
    }
}

/// Heuristic date detection
///
/// Texts under [`MIN_DATE_LENGTH`] characters are rejected without parsing.
/// Longer texts count as dates when one of the known date or datetime
/// layouts parses them completely.
pub fn looks_like_date(text: &str) -> bool {
    let text = text.trim();
    if text.chars().count() < MIN_DATE_LENGTH {
        return false;
    }

    DateTime::parse_from_rfc3339(text).is_ok()
        || DateTime::parse_from_rfc2822(text).is_ok()
        || OFFSET_DATETIME_FORMATS
            .iter()
            .any(|fmt| DateTime::parse_from_str(text, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(text, fmt).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(text, fmt).is_ok())
}
