//! Tree node and owned child links.

use crate::types::Record;

/// An owned, optional child subtree
pub(crate) type Link = Option<Box<Node>>;

/// A tree node: one record plus up to two exclusively owned children
pub(crate) struct Node {
    pub(crate) record: Record,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn new(record: Record) -> Box<Self> {
        Box::new(Self {
            record,
            left: None,
            right: None,
        })
    }

    /// Key this node is ordered by
    pub(crate) fn key(&self) -> &str {
        &self.record.id
    }
}

/// Release a whole subtree without recursing.
///
/// Dropping a `Box<Node>` that still holds children recurses once per level,
/// which overflows the stack on the linked-list shaped trees that sorted
/// input produces.
pub(crate) fn release(root: Link) {
    let mut stack: Vec<Box<Node>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}
