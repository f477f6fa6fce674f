//! # Bid Index
//!
//! An in-memory ordered index over auction bid records, backed by an
//! unbalanced binary search tree keyed by bid id.
//!
//! ## Architecture
//!
//! - **Tree Layer** (`bst`): Binary search tree with insert, find, remove
//!   and in-order iteration
//! - **Types** (`types`): The `Record` payload, index configuration and
//!   amount parsing
//! - **Loader** (`loader`): CSV import of monthly sales exports
//! - **Shared handle** ([`Index`]): One coarse lock around a tree for
//!   callers on several threads
//!
//! ## Usage
//!
//! ```rust
//! use bid_index::{Index, IndexConfig, Record};
//!
//! let index = Index::new(IndexConfig::default());
//!
//! index.insert(Record::new("98188", "Oak table", "General Fund", 42.5))?;
//!
//! let bid = index.find("98188");
//! assert_eq!(bid.map(|b| b.amount), Some(42.5));
//!
//! index.remove("98188");
//! assert!(index.is_empty());
//! # Ok::<(), bid_index::IndexError>(())
//! ```

pub mod bst;
pub mod error;
pub mod loader;
pub mod types;

pub use bst::{BinarySearchTree, InOrder};
pub use error::{IndexError, Result};
pub use loader::{
    insert_records, load_into, load_records, read_records, CsvLayout, LoadReport,
};
pub use types::{parse_amount, DuplicatePolicy, IndexConfig, Record};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handle to a bid index
///
/// The tree itself assumes exclusive access, so every operation here runs
/// under a single reader/writer lock. Clones share the same tree and the
/// records handed out are copies.
#[derive(Clone)]
pub struct Index {
    tree: Arc<RwLock<BinarySearchTree>>,
}

impl Index {
    /// Create an empty index
    pub fn new(config: IndexConfig) -> Self {
        Self {
            tree: Arc::new(RwLock::new(BinarySearchTree::with_config(config))),
        }
    }

    /// Get the index configuration
    pub fn config(&self) -> IndexConfig {
        IndexConfig::new().duplicate_policy(self.tree.read().duplicate_policy())
    }

    /// Insert a record
    ///
    /// Returns the record it replaced, if the duplicate policy replaced one.
    pub fn insert(&self, record: Record) -> Result<Option<Record>> {
        let id = record.id.clone();
        let mut tree = self.tree.write();
        let replaced = tree.insert(record)?;
        debug!(id = %id, replaced = replaced.is_some(), "inserted bid");
        Ok(replaced)
    }

    /// Get a copy of the record with the given id
    ///
    /// Returns `None` if the id does not exist.
    pub fn find(&self, id: &str) -> Option<Record> {
        let tree = self.tree.read();
        tree.find(id).cloned()
    }

    /// Remove a record
    ///
    /// Returns the removed record; absent ids are a no-op.
    pub fn remove(&self, id: &str) -> Option<Record> {
        let mut tree = self.tree.write();
        let removed = tree.remove(id);
        debug!(id = %id, found = removed.is_some(), "removed bid");
        removed
    }

    /// Check if an id exists
    pub fn contains(&self, id: &str) -> bool {
        self.tree.read().contains(id)
    }

    /// Snapshot of all records in ascending id order
    pub fn records(&self) -> Vec<Record> {
        let tree = self.tree.read();
        tree.iter().cloned().collect()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Drop every record
    pub fn clear(&self) {
        self.tree.write().clear();
    }

    /// Load a CSV file into the index
    ///
    /// The file is read and parsed without holding the lock; the write lock
    /// is only taken to insert the parsed records.
    pub fn load_csv(&self, path: impl AsRef<Path>, layout: &CsvLayout) -> Result<LoadReport> {
        let path = path.as_ref();
        let (records, report) = load_records(path, layout)?;
        let report = self.insert_loaded(records, report)?;
        info!(
            path = %path.display(),
            loaded = report.loaded,
            replaced = report.replaced,
            skipped = report.skipped,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "loaded bids"
        );
        Ok(report)
    }

    /// Load CSV rows from any source into the index
    ///
    /// Like [`Index::load_csv`], the source is drained before the lock is taken.
    pub fn load_reader<R: io::Read>(&self, source: R, layout: &CsvLayout) -> Result<LoadReport> {
        let (records, report) = read_records(source, layout)?;
        self.insert_loaded(records, report)
    }

    fn insert_loaded(&self, records: Vec<Record>, report: LoadReport) -> Result<LoadReport> {
        let mut tree = self.tree.write();
        insert_records(&mut tree, records, report)
    }

    /// Get statistics about the index
    pub fn stats(&self) -> IndexStats {
        let tree = self.tree.read();
        IndexStats {
            record_count: tree.len(),
            tree_height: tree.height(),
            first_id: tree.first().map(|r| r.id.clone()),
            last_id: tree.last().map(|r| r.id.clone()),
            duplicate_policy: tree.duplicate_policy(),
        }
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

/// Index statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Number of stored records
    pub record_count: usize,
    /// Height of the tree
    pub tree_height: usize,
    /// Smallest id
    pub first_id: Option<String>,
    /// Largest id
    pub last_id: Option<String>,
    /// Duplicate policy in effect
    pub duplicate_policy: DuplicatePolicy,
}
