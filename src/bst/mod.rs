//! Binary search tree index.
//!
//! This module provides an unbalanced, in-memory binary search tree that
//! supports:
//! - Point lookups (find)
//! - Insertions (insert)
//! - Removals (remove)
//! - In-order iteration

mod cursor;
mod node;
mod tree;

pub use cursor::InOrder;
pub use tree::BinarySearchTree;
