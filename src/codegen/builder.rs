//! Tree visitor that turns classified nodes into class declarations

use super::model::{ClassModel, FieldDecl};
use crate::classify::{classify, FieldKind, Shape};
use crate::error::Result;
use crate::names;
use crate::tree::{Node, NodeId, SchemaTree};
use crate::visitor::TreeVisitor;

/// Accumulates one class per container name while walking a tree
#[derive(Debug, Default)]
pub struct CodeBuilder {
    level: usize,
    model: ClassModel,
}

impl CodeBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting level of the walk
    pub fn level(&self) -> usize {
        self.level
    }

    /// Accumulated declarations
    pub fn model(&self) -> &ClassModel {
        &self.model
    }

    /// Finish and take the accumulated declarations
    pub fn into_model(self) -> ClassModel {
        self.model
    }

    fn field_for(node: &Node, kind: FieldKind, target: Option<String>) -> FieldDecl {
        let query_segment = if kind.is_collection() {
            names::strip_position(&node.relative_path)
        } else {
            node.relative_path.as_str()
        };
        let attribute = if kind.is_collection() {
            names::collection_attribute_name(&node.name)
        } else {
            names::attribute_name(&node.name)
        };
        let observed = if kind.is_nested() {
            None
        } else {
            Some(names::comment_text(node.text()))
        };

        FieldDecl {
            attribute,
            kind,
            query: format!("./{}", query_segment),
            target,
            observed,
        }
    }
}

impl TreeVisitor for CodeBuilder {
    fn visit(&mut self, tree: &SchemaTree, id: NodeId) -> Result<()> {
        let node = tree.node(id);
        let classification = classify(tree, id);

        if classification.shape == Shape::Container {
            self.model.class_entry(&node.name);
        }

        let parent = match node.parent {
            Some(parent) if !classification.is_root => tree.node(parent),
            _ => return Ok(()),
        };

        let kind = classification.field_kind(node.text());
        let target = kind
            .is_nested()
            .then(|| self.model.class_entry(&node.name).class_name.clone());
        let field = Self::field_for(node, kind, target);
        let attribute = field.attribute.clone();
        let class = self.model.class_entry(&parent.name);

        if class.push_field(field) {
            tracing::debug!(class = %class.class_name, field = %attribute, %kind, "declared field");
        } else {
            tracing::trace!(class = %class.class_name, field = %attribute, "skipped duplicate field");
        }
        Ok(())
    }

    fn enter(&mut self) {
        self.level += 1;
    }

    fn leave(&mut self) {
        self.level = self.level.saturating_sub(1);
    }
}
