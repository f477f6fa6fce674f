//! Binary search tree core implementation.
//!
//! This module provides the main BinarySearchTree struct with operations for:
//! - insert: Insertions, with duplicates handled per `DuplicatePolicy`
//! - find: Point lookups
//! - remove: Removals
//! - iter: In-order traversal
//!
//! Keys are compared as `str`, i.e. lexicographically by bytes. A node's left
//! subtree holds strictly smaller keys and its right subtree holds keys that
//! compare greater or equal. No rebalancing is ever performed, so every
//! walk here is a loop rather than a recursion.

use super::cursor::InOrder;
use super::node::{release, Link, Node};
use crate::error::{IndexError, Result};
use crate::types::{DuplicatePolicy, IndexConfig, Record};
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// An in-memory, unbalanced binary search tree of records keyed by id
pub struct BinarySearchTree {
    /// Root node (None means empty tree)
    root: Link,
    /// Number of stored records
    len: usize,
    /// Duplicate id handling
    policy: DuplicatePolicy,
}

impl BinarySearchTree {
    /// Create an empty tree with the default configuration
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    /// Create an empty tree with a custom configuration
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            root: None,
            len: 0,
            policy: config.duplicate_policy,
        }
    }

    /// Duplicate policy this tree was built with
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no records
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a record
    ///
    /// Records with an empty id or a negative or non-finite amount are
    /// rejected. Returns the displaced record when `Replace` overwrote an existing id,
    /// `None` when a new node was attached.
    pub fn insert(&mut self, record: Record) -> Result<Option<Record>> {
        record.validate()?;

        let policy = self.policy;
        let mut slot = &mut self.root;

        while let Some(node) = slot {
            if node.key() > record.id.as_str() {
                slot = &mut node.left;
                continue;
            }

            if node.key() == record.id {
                match policy {
                    DuplicatePolicy::Replace => {
                        return Ok(Some(mem::replace(&mut node.record, record)));
                    }
                    DuplicatePolicy::Reject => {
                        return Err(IndexError::DuplicateKey(record.id));
                    }
                    DuplicatePolicy::KeepBoth => {}
                }
            }

            slot = &mut node.right;
        }

        *slot = Some(Node::new(record));
        self.len += 1;
        Ok(None)
    }

    /// Look up a record by id
    pub fn find(&self, id: &str) -> Option<&Record> {
        let mut current = self.root.as_deref();

        while let Some(node) = current {
            current = match id.cmp(node.key()) {
                Ordering::Equal => return Some(&node.record),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }

        None
    }

    /// Look up a record by id, falling back to the empty sentinel record
    pub fn find_or_default(&self, id: &str) -> Record {
        self.find(id).cloned().unwrap_or_default()
    }

    /// Check if an id is stored
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Remove the record with the given id
    ///
    /// Returns the removed record, or `None` (leaving the tree untouched)
    /// if the id is not present.
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let mut slot = &mut self.root;

        loop {
            let direction = match slot.as_deref() {
                Some(node) => id.cmp(node.key()),
                None => return None,
            };
            match direction {
                Ordering::Less => slot = &mut slot.as_mut()?.left,
                Ordering::Greater => slot = &mut slot.as_mut()?.right,
                Ordering::Equal => break,
            }
        }

        let removed = Self::unlink(slot)?;
        self.len -= 1;
        Some(removed)
    }

    /// Smallest key in the tree
    pub fn first(&self) -> Option<&Record> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.record)
    }

    /// Largest key in the tree
    pub fn last(&self) -> Option<&Record> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.record)
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }

        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            if let Some(left) = node.left.as_deref() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }

        height
    }

    /// Iterate over all records in ascending id order
    pub fn iter(&self) -> InOrder<'_> {
        InOrder::new(self.root.as_deref(), self.len)
    }

    /// Remove every record
    pub fn clear(&mut self) {
        release(self.root.take());
        self.len = 0;
    }

    /// Detach the node held in `slot`, returning its record.
    ///
    /// A node with two children keeps its place and takes over the record of
    /// its in-order successor, which is unlinked from the right subtree
    /// instead. Otherwise the single child (if any) moves up into `slot`.
    fn unlink(slot: &mut Link) -> Option<Record> {
        let node = slot.as_mut()?;

        if node.left.is_some() && node.right.is_some() {
            let successor = Self::take_min(&mut node.right)?;
            return Some(mem::replace(&mut node.record, successor));
        }

        let mut node = slot.take()?;
        *slot = node.left.take().or_else(|| node.right.take());
        Some(node.record)
    }

    /// Unlink the leftmost node under `slot`, splicing its right child into
    /// its place
    fn take_min(mut slot: &mut Link) -> Option<Record> {
        while slot.as_ref().is_some_and(|node| node.left.is_some()) {
            slot = &mut slot.as_mut()?.left;
        }

        let mut node = slot.take()?;
        *slot = node.right.take();
        Some(node.record)
    }
}

impl Default for BinarySearchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BinarySearchTree {
    fn drop(&mut self) {
        release(self.root.take());
    }
}

impl fmt::Debug for BinarySearchTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinarySearchTree")
            .field("len", &self.len)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<'a> IntoIterator for &'a BinarySearchTree {
    type Item = &'a Record;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
