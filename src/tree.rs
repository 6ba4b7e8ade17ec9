//! Structural tree inferred from a sample document
//!
//! Nodes live in a `Vec<Node>` owned by the [`SchemaTree`] and refer to each
//! other through [`NodeId`] indices. Each node owns its ordered list of
//! children; the parent link is a plain index used for lookups only.
//!
//! The tree is rebuilt from the flat open/close event stream by
//! [`TreeBuilder`]. Text-bearing elements become leaves and never take over
//! as the active node, so elements nested inside them are attached to the
//! enclosing container.

use crate::documents::{Document, DocumentEvent, ElementEvent};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::options::GeneratorOptions;
use std::collections::HashMap;

/// A typed index into the tree's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in creation (document) order
    pub fn index(self) -> usize {
        self.0
    }
}

/// One element (or attribute-derived leaf) of the inferred structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Local name, namespace stripped
    pub name: String,
    /// Raw text content when the element was opened
    pub value: Option<String>,
    /// Namespace-normalized path from the document root
    pub path: String,
    /// Last segment of `path`
    pub relative_path: String,
    /// Owning node; `None` only for the root
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
}

impl Node {
    fn from_event(event: ElementEvent, parent: Option<NodeId>) -> Self {
        let relative_path = event.relative_path().to_string();
        Self {
            name: event.name,
            value: event.value,
            path: event.path,
            relative_path,
            parent,
            children: Vec::new(),
        }
    }

    /// Check if the node has any children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Trimmed text content, empty when absent
    pub fn text(&self) -> &str {
        self.value.as_deref().map_or("", str::trim)
    }
}

/// Arena-backed tree with exactly one root
#[derive(Debug, Clone)]
pub struct SchemaTree {
    nodes: Vec<Node>,
    root: NodeId,
    /// Per node: children of its parent sharing its name, itself included
    same_name: Vec<usize>,
}

impl SchemaTree {
    /// Root node id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Access a node
    ///
    /// Ids are only handed out by the builder of this tree, so indexing
    /// cannot go out of bounds.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// Number of children of the node's parent sharing its name, itself included
    ///
    /// The root has no siblings and reports 1.
    pub fn same_name_count(&self, id: NodeId) -> usize {
        self.same_name[id.0]
    }

    /// Check if another child of the same parent shares this node's name
    pub fn has_same_siblings(&self, id: NodeId) -> bool {
        self.same_name_count(id) > 1
    }

    /// All node ids in creation order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}

/// Rebuilds a [`SchemaTree`] from open/close events
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    active: Option<NodeId>,
    /// One entry per open element: whether it became the active node
    open: Vec<bool>,
    limits: Limits,
}

impl TreeBuilder {
    /// Create a builder with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Handle an open event and return the id of the new node
    ///
    /// Blank elements are containers and become the active node; elements
    /// with text are leaves attached to the active node.
    pub fn open(&mut self, event: ElementEvent) -> Result<NodeId> {
        self.limits.check_xml_depth(self.open.len() + 1)?;

        let container = event.is_blank();
        let id = self.attach(event)?;
        if container {
            self.active = Some(id);
        }
        self.open.push(container);
        Ok(id)
    }

    /// Attach an attribute-derived leaf to the active node
    pub fn attribute(&mut self, event: ElementEvent) -> Result<NodeId> {
        if self.active.is_none() {
            return Err(Error::Tree(format!(
                "attribute '{}' outside of a container element",
                event.name
            )));
        }
        self.attach(event)
    }

    /// Handle a close event
    pub fn close(&mut self) -> Result<()> {
        let was_container = self
            .open
            .pop()
            .ok_or_else(|| Error::Tree("close event without a matching open".to_string()))?;

        if was_container {
            if let Some(active) = self.active {
                if let Some(parent) = self.nodes[active.0].parent {
                    self.active = Some(parent);
                }
            }
        }
        Ok(())
    }

    /// Check if a node is the current insertion point
    pub fn is_active(&self, id: NodeId) -> bool {
        self.active == Some(id)
    }

    /// Finish building
    pub fn finish(self) -> Result<SchemaTree> {
        let root = self.root.ok_or(Error::NoRoot)?;
        if !self.open.is_empty() {
            tracing::warn!(unclosed = self.open.len(), "event stream ended with open elements");
        }
        let same_name = count_same_names(&self.nodes);
        Ok(SchemaTree {
            nodes: self.nodes,
            root,
            same_name,
        })
    }

    fn attach(&mut self, event: ElementEvent) -> Result<NodeId> {
        self.limits.check_nodes(self.nodes.len() + 1)?;

        let id = NodeId(self.nodes.len());
        // Elements below a text-bearing root have no active container
        let parent = self.active.or(self.root);
        self.nodes.push(Node::from_event(event, parent));

        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.root = Some(id),
        }
        Ok(id)
    }
}

/// Same-name sibling counts for every node, one pass per child list
fn count_same_names(nodes: &[Node]) -> Vec<usize> {
    let mut same_name = vec![1; nodes.len()];
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for node in nodes {
        counts.clear();
        for child in &node.children {
            *counts.entry(nodes[child.0].name.as_str()).or_default() += 1;
        }
        for child in &node.children {
            let name = nodes[child.0].name.as_str();
            same_name[child.0] = counts.get(name).copied().unwrap_or(1);
        }
    }
    same_name
}

/// Build the structural tree of a parsed document
pub fn build_tree(document: &Document<'_>, options: &GeneratorOptions) -> Result<SchemaTree> {
    let mut builder = TreeBuilder::new().with_limits(options.limits.clone());

    for event in document.events() {
        match event {
            DocumentEvent::Open {
                element,
                attributes,
            } => {
                let id = builder.open(element)?;
                // Attributes of text-bearing leaves are not represented
                if options.include_attributes && builder.is_active(id) {
                    for attribute in attributes {
                        builder.attribute(attribute)?;
                    }
                }
            }
            DocumentEvent::Close => builder.close()?,
        }
    }

    let tree = builder.finish()?;
    tracing::debug!(nodes = tree.len(), "built schema tree");
    Ok(tree)
}
