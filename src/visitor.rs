//! Depth-first traversal of a [`SchemaTree`]
//!
//! [`walk`] visits nodes in pre-order with children in document order. For
//! each node the visitor gets `visit`, then `enter` before the node's
//! children and `leave` after them, which is enough to track nesting level.

use crate::error::Result;
use crate::tree::{NodeId, SchemaTree};
use std::fmt::Write;

/// Consumer of a depth-first walk
pub trait TreeVisitor {
    /// Process one node
    fn visit(&mut self, tree: &SchemaTree, id: NodeId) -> Result<()>;

    /// Called after `visit`, before the node's children
    fn enter(&mut self) {}

    /// Called after the node's children
    fn leave(&mut self) {}
}

enum Step {
    Visit(NodeId),
    Leave,
}

/// Walk the whole tree from its root
pub fn walk<V: TreeVisitor + ?Sized>(tree: &SchemaTree, visitor: &mut V) -> Result<()> {
    walk_from(tree, tree.root(), visitor)
}

/// Walk the subtree below `start`, `start` included
pub fn walk_from<V: TreeVisitor + ?Sized>(
    tree: &SchemaTree,
    start: NodeId,
    visitor: &mut V,
) -> Result<()> {
    // Explicit stack: deep documents must not overflow the call stack
    let mut stack = vec![Step::Visit(start)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Visit(id) => {
                visitor.visit(tree, id)?;
                visitor.enter();
                stack.push(Step::Leave);
                stack.extend(tree.node(id).children.iter().rev().map(|&c| Step::Visit(c)));
            }
            Step::Leave => visitor.leave(),
        }
    }
    Ok(())
}

/// Diagnostic printer: one indented `name: value    ./path` line per node
#[derive(Debug, Default)]
pub struct TreePrinter {
    level: usize,
    output: String,
}

impl TreePrinter {
    /// Create an empty printer
    pub fn new() -> Self {
        Self::default()
    }

    /// Printed tree
    pub fn into_string(self) -> String {
        self.output
    }
}

impl TreeVisitor for TreePrinter {
    fn visit(&mut self, tree: &SchemaTree, id: NodeId) -> Result<()> {
        let node = tree.node(id);
        let indent = "  ".repeat(self.level);
        tracing::debug!(level = self.level, name = %node.name, path = %node.path, "tree node");
        // Writing into a String cannot fail
        let _ = writeln!(
            self.output,
            "{}{}: {}    ./{}",
            indent,
            node.name,
            node.text(),
            node.path
        );
        Ok(())
    }

    fn enter(&mut self) {
        self.level += 1;
    }

    fn leave(&mut self) {
        self.level = self.level.saturating_sub(1);
    }
}
