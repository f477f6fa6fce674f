//! In-order cursor over the tree.
//!
//! The cursor keeps an explicit stack of the nodes whose left subtree is
//! being visited, so iteration never recurses and a fresh cursor can be
//! taken from the tree at any time.

use super::node::Node;
use crate::types::Record;
use std::iter::FusedIterator;

/// Lazy iterator yielding records in ascending id order
pub struct InOrder<'a> {
    /// Pending ancestors, deepest last
    stack: Vec<&'a Node>,
    /// Records not yet yielded
    remaining: usize,
}

impl<'a> InOrder<'a> {
    pub(crate) fn new(root: Option<&'a Node>, len: usize) -> Self {
        let mut cursor = Self {
            stack: Vec::new(),
            remaining: len,
        };
        cursor.descend_to_leftmost(root);
        cursor
    }

    /// Push `node` and its chain of left children
    fn descend_to_leftmost(&mut self, mut node: Option<&'a Node>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_to_leftmost(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for InOrder<'_> {}

impl FusedIterator for InOrder<'_> {}
