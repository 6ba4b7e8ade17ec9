//! XML document handling
//!
//! A parsed sample document and the flat open/close event stream the tree
//! builder consumes. Parsing is delegated to `roxmltree`, which keeps the
//! per-element namespace scopes needed to rewrite paths.

use crate::error::Result;
use crate::limits::Limits;
use crate::namespaces::{NamespaceContext, QName};
use roxmltree::{Node, ParsingOptions};
use std::collections::HashMap;

/// Data carried by an open event: one element or one attribute-derived leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEvent {
    /// Local name, namespace stripped
    pub name: String,
    /// Raw text content, untrimmed
    pub value: Option<String>,
    /// Namespace-normalized path from the document root
    pub path: String,
}

impl ElementEvent {
    /// Create an event
    pub fn new(name: impl Into<String>, value: Option<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            path: path.into(),
        }
    }

    /// Last path segment, used as the query fragment of a field
    pub fn relative_path(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Check if the text content is absent or whitespace-only
    pub fn is_blank(&self) -> bool {
        self.value.as_deref().map_or(true, |v| v.trim().is_empty())
    }
}

/// One step of a depth-first walk over a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// An element was opened; attribute leaves follow the element itself
    Open {
        /// The element
        element: ElementEvent,
        /// Its attributes, in document order
        attributes: Vec<ElementEvent>,
    },
    /// The most recently opened element was closed
    Close,
}

/// XML Document representation
#[derive(Debug)]
pub struct Document<'input> {
    inner: roxmltree::Document<'input>,
}

impl<'input> Document<'input> {
    /// Parse an XML document from a string with default limits
    pub fn from_string(xml: &'input str) -> Result<Self> {
        Self::parse(xml, &Limits::default())
    }

    /// Parse an XML document, enforcing size and node limits
    pub fn parse(xml: &'input str, limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let options = ParsingOptions {
            allow_dtd: true,
            nodes_limit: limits.parser_nodes_limit(),
            ..ParsingOptions::default()
        };
        let inner = roxmltree::Document::parse_with_options(xml, options)?;
        Ok(Self { inner })
    }

    /// Get the root element
    pub fn root_element(&self) -> Node<'_, 'input> {
        self.inner.root_element()
    }

    /// Depth-first open/close events over every element of the document
    pub fn events(&self) -> Events<'_, 'input> {
        Events {
            stack: vec![Frame::Enter {
                node: self.root_element(),
                parent_path: None,
                position: None,
            }],
        }
    }
}

enum Frame<'a, 'input> {
    Enter {
        node: Node<'a, 'input>,
        parent_path: Option<String>,
        position: Option<usize>,
    },
    Exit,
}

/// Iterator over the [`DocumentEvent`]s of a document
///
/// Walks with an explicit stack. Paths are built on the way down; the `[n]`
/// predicates of an element's children come from a single pass over them.
pub struct Events<'a, 'input> {
    stack: Vec<Frame<'a, 'input>>,
}

impl<'a, 'input> Events<'a, 'input> {
    fn push_children(&mut self, parent: Node<'a, 'input>, path: &str) {
        let children: Vec<_> = parent.children().filter(|c| c.is_element()).collect();

        let mut totals: HashMap<(Option<&'a str>, &'input str), usize> = HashMap::new();
        for child in &children {
            *totals.entry(expanded_key(*child)).or_default() += 1;
        }

        let mut seen: HashMap<(Option<&'a str>, &'input str), usize> = HashMap::new();
        let frames: Vec<_> = children
            .into_iter()
            .map(|child| {
                let key = expanded_key(child);
                let position = if totals.get(&key).copied().unwrap_or(0) > 1 {
                    let n = seen.entry(key).or_default();
                    *n += 1;
                    Some(*n)
                } else {
                    None
                };
                Frame::Enter {
                    node: child,
                    parent_path: Some(path.to_string()),
                    position,
                }
            })
            .collect();

        // Reversed so the first child is popped first
        self.stack.extend(frames.into_iter().rev());
    }
}

impl<'a, 'input> Iterator for Events<'a, 'input> {
    type Item = DocumentEvent;

    fn next(&mut self) -> Option<DocumentEvent> {
        match self.stack.pop()? {
            Frame::Exit => Some(DocumentEvent::Close),
            Frame::Enter {
                node,
                parent_path,
                position,
            } => {
                let ctx = NamespaceContext::in_scope(node);
                let path = match parent_path {
                    None => ".".to_string(),
                    Some(parent) => {
                        let mut segment = ctx.prefixed(&QName::from(node.tag_name()));
                        if let Some(position) = position {
                            segment.push_str(&format!("[{}]", position));
                        }
                        join_path(&parent, &segment)
                    }
                };

                self.stack.push(Frame::Exit);
                self.push_children(node, &path);

                let attributes = attribute_events(node, &path, &ctx);
                let element = ElementEvent::new(
                    node.tag_name().name(),
                    node.text().map(str::to_string),
                    path,
                );
                Some(DocumentEvent::Open {
                    element,
                    attributes,
                })
            }
        }
    }
}

fn expanded_key<'a, 'input>(node: Node<'a, 'input>) -> (Option<&'a str>, &'input str) {
    let name = node.tag_name();
    (name.namespace(), name.name())
}

fn join_path(base: &str, segment: &str) -> String {
    if base == "." {
        segment.to_string()
    } else {
        format!("{}/{}", base, segment)
    }
}

/// Leaf events for the attributes of an element at `path`
///
/// Namespace declarations are not attributes and never show up here.
fn attribute_events(node: Node<'_, '_>, path: &str, ctx: &NamespaceContext) -> Vec<ElementEvent> {
    node.attributes()
        .map(|attr| {
            let qname = QName::new(attr.namespace(), attr.name());
            let segment = format!("@{}", ctx.prefixed(&qname));
            ElementEvent::new(
                attr.name(),
                Some(attr.value().to_string()),
                join_path(path, &segment),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Opened elements as `(path, attribute paths)`, in event order
    fn opened(xml: &str) -> Vec<(String, Vec<String>)> {
        let doc = Document::from_string(xml).unwrap();
        doc.events()
            .filter_map(|event| match event {
                DocumentEvent::Open {
                    element,
                    attributes,
                } => Some((
                    element.path,
                    attributes.into_iter().map(|a| a.path).collect(),
                )),
                DocumentEvent::Close => None,
            })
            .collect()
    }

    fn element_paths(xml: &str) -> Vec<String> {
        opened(xml).into_iter().map(|(path, _)| path).collect()
    }

    #[test]
    fn test_parse_simple_xml() {
        let doc = Document::from_string("<root><child>text</child></root>").unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "root");
    }

    #[test]
    fn test_parse_error() {
        let result = Document::from_string("<root><child></root>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_size_limit() {
        let xml = format!("<root>{}</root>", "x".repeat(64));
        let limits = Limits {
            max_xml_size: 16,
            ..Limits::default()
        };
        assert!(matches!(
            Document::parse(&xml, &limits),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_element_paths() {
        let xml = "<Order><Address><Name>A</Name></Address><Note>n</Note><Address><Name>B</Name></Address><Items><Item/></Items></Order>";
        assert_eq!(
            element_paths(xml),
            vec![
                ".",
                "Address[1]",
                "Address[1]/Name",
                "Note",
                "Address[2]",
                "Address[2]/Name",
                "Items",
                "Items/Item",
            ]
        );
    }

    #[test]
    fn test_namespaced_paths() {
        let xml = r#"<aw:Order xmlns:aw="urn:aw"><aw:Items><aw:Item/><aw:Item/></aw:Items></aw:Order>"#;
        assert_eq!(
            element_paths(xml),
            vec![".", "aw:Items", "aw:Items/aw:Item[1]", "aw:Items/aw:Item[2]"]
        );
    }

    #[test]
    fn test_same_local_name_in_different_namespaces() {
        let xml = r#"<r xmlns:a="urn:a" xmlns:b="urn:b"><a:x/><b:x/><a:x/></r>"#;
        assert_eq!(element_paths(xml), vec![".", "a:x[1]", "b:x", "a:x[2]"]);
    }

    #[test]
    fn test_default_namespace_paths() {
        let xml = r#"<Order xmlns="urn:po"><Items><Item/></Items></Order>"#;
        assert_eq!(element_paths(xml), vec![".", "Items", "Items/Item"]);
    }

    #[test]
    fn test_attribute_paths() {
        let xml = r#"<Order xmlns:aw="urn:aw" id="7"><Item aw:sku="X1" qty="2"/></Order>"#;
        let doc = Document::from_string(xml).unwrap();

        let mut events = doc.events();
        match events.next() {
            Some(DocumentEvent::Open { attributes, .. }) => {
                assert_eq!(attributes, vec![ElementEvent::new("id", Some("7".into()), "@id")]);
            }
            other => panic!("unexpected event {:?}", other),
        }
        match events.next() {
            Some(DocumentEvent::Open { attributes, .. }) => {
                assert_eq!(attributes.len(), 2);
                assert_eq!(attributes[0].name, "sku");
                assert_eq!(attributes[0].path, "Item/@aw:sku");
                assert_eq!(attributes[0].relative_path(), "@aw:sku");
                assert_eq!(attributes[1].relative_path(), "@qty");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_event_order_for_nested_document() {
        let xml = "<root><a>1</a><b><c/><d><e/></d></b><f/></root>";
        let doc = Document::from_string(xml).unwrap();
        let trace: Vec<String> = doc
            .events()
            .map(|event| match event {
                DocumentEvent::Open { element, .. } => format!("+{}", element.name),
                DocumentEvent::Close => "-".to_string(),
            })
            .collect();
        assert_eq!(
            trace,
            vec![
                "+root", "+a", "-", "+b", "+c", "-", "+d", "+e", "-", "-", "-", "+f", "-", "-",
            ]
        );
    }

    #[test]
    fn test_deep_document_does_not_recurse() {
        let depth = 5000;
        let xml = format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth));
        let limits = Limits::permissive();
        let doc = Document::parse(&xml, &limits).unwrap();
        assert_eq!(doc.events().count(), depth * 2);
    }

    #[test]
    fn test_wide_document_paths() {
        let rows = 20_000;
        let xml = format!("<r>{}<tail/></r>", "<row><a>1</a></row>".repeat(rows));
        let paths = element_paths(&xml);
        assert_eq!(paths.len(), 1 + rows * 2 + 1);
        assert_eq!(paths[1], "row[1]");
        assert_eq!(paths[2], "row[1]/a");
        assert_eq!(paths[paths.len() - 2], format!("row[{}]/a", rows));
        assert_eq!(paths[paths.len() - 1], "tail");
    }

    #[test]
    fn test_element_event_text() {
        let doc = Document::from_string("<root>\n  <a> padded </a><b/></root>").unwrap();
        let elements: Vec<_> = doc
            .events()
            .filter_map(|event| match event {
                DocumentEvent::Open { element, .. } => Some(element),
                DocumentEvent::Close => None,
            })
            .collect();

        assert!(elements[0].is_blank());
        assert_eq!(elements[0].relative_path(), ".");

        assert_eq!(elements[1].value.as_deref(), Some(" padded "));
        assert!(!elements[1].is_blank());

        assert_eq!(elements[2].value, None);
        assert!(elements[2].is_blank());
    }
}
