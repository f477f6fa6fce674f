//! Common types used throughout the bid index.

mod amount;

pub use amount::{parse_amount, DEFAULT_CURRENCY_SYMBOL};

use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single auction bid, keyed by its id
///
/// `Record::default()` doubles as the empty sentinel: an empty id with a
/// zero amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique key, compared lexicographically
    pub id: String,
    /// Item title
    pub title: String,
    /// Fund the sale is credited to
    pub fund: String,
    /// Winning bid amount
    #[serde(default)]
    pub amount: f64,
}

impl Record {
    /// Create a record from its parts
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        fund: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fund: fund.into(),
            amount,
        }
    }

    /// Whether this is the empty sentinel record
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Check the record can be stored: a non-empty id and a finite,
    /// non-negative amount
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(IndexError::invalid_record("bid id must not be empty"));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(IndexError::invalid_amount(self.amount.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} | {} | {}",
            self.id, self.title, self.amount, self.fund
        )
    }
}

/// What `insert` does when the id is already present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicatePolicy {
    /// Overwrite the stored record and hand back the old one
    #[default]
    Replace,
    /// Refuse the insert with `IndexError::DuplicateKey`
    Reject,
    /// Store the duplicate in the right subtree of the existing node.
    /// Lookups find the shallowest copy; enumeration yields all of them.
    KeepBoth,
}

/// Index configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    /// Policy applied to inserts of an id that is already stored
    pub duplicate_policy: DuplicatePolicy,
}

impl IndexConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duplicate policy
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
