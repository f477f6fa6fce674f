//! CSV loading of bid records.
//!
//! The monthly sales export has one bid per row, with the columns this
//! crate cares about scattered across a wider table. [`CsvLayout`] says
//! where each field lives; malformed rows are skipped and counted rather
//! than aborting the whole load.

use crate::bst::BinarySearchTree;
use crate::error::{IndexError, Result};
use crate::types::{parse_amount, Record, DEFAULT_CURRENCY_SYMBOL};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Column mapping for a bid CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvLayout {
    /// Column holding the item title
    pub title_column: usize,
    /// Column holding the bid id
    pub id_column: usize,
    /// Column holding the winning amount
    pub amount_column: usize,
    /// Column holding the fund
    pub fund_column: usize,
    /// Character stripped from amounts before parsing
    pub currency_symbol: char,
    /// Whether the first row is a header
    pub has_headers: bool,
}

impl Default for CsvLayout {
    /// Layout of the eBid monthly sales export
    fn default() -> Self {
        Self {
            title_column: 0,
            id_column: 1,
            amount_column: 4,
            fund_column: 8,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL,
            has_headers: true,
        }
    }
}

impl CsvLayout {
    /// Set the columns for id, title, fund and amount
    pub fn columns(mut self, id: usize, title: usize, fund: usize, amount: usize) -> Self {
        self.id_column = id;
        self.title_column = title;
        self.fund_column = fund;
        self.amount_column = amount;
        self
    }

    /// Set the currency symbol stripped from amounts
    pub fn currency_symbol(mut self, symbol: char) -> Self {
        self.currency_symbol = symbol;
        self
    }

    /// Set whether the first row is a header
    pub fn has_headers(mut self, enabled: bool) -> Self {
        self.has_headers = enabled;
        self
    }

    /// Build a record from one CSV row
    fn record_from_row(&self, row: &StringRecord, line: u64) -> Result<Record> {
        let column = |index: usize| {
            row.get(index)
                .map(str::trim)
                .ok_or(IndexError::MissingColumn { line, column: index })
        };

        let id = column(self.id_column)?;
        if id.is_empty() {
            return Err(IndexError::invalid_record(format!(
                "line {}: empty bid id",
                line
            )));
        }

        let record = Record {
            id: id.to_string(),
            title: column(self.title_column)?.to_string(),
            fund: column(self.fund_column)?.to_string(),
            amount: parse_amount(column(self.amount_column)?, self.currency_symbol)?,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Summary of a CSV load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Header row, empty when the layout has none
    pub header: Vec<String>,
    /// Records read (or inserted, for [`load_into`])
    pub loaded: usize,
    /// Existing records overwritten by a later row with the same id
    pub replaced: usize,
    /// Rows dropped as malformed or rejected as duplicates
    pub skipped: usize,
    /// Wall time spent reading and inserting
    pub elapsed: Duration,
}

/// Read every valid bid from the CSV file at `path`
pub fn load_records(
    path: impl AsRef<Path>,
    layout: &CsvLayout,
) -> Result<(Vec<Record>, LoadReport)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let (records, report) = read_records(file, layout)?;
    info!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        "read bid file"
    );
    Ok((records, report))
}

/// Read every valid bid from any CSV source
pub fn read_records<R: io::Read>(
    source: R,
    layout: &CsvLayout,
) -> Result<(Vec<Record>, LoadReport)> {
    let start = Instant::now();
    let mut reader = ReaderBuilder::new()
        .has_headers(layout.has_headers)
        .flexible(true)
        .from_reader(source);

    let mut report = LoadReport::default();
    if layout.has_headers {
        report.header = reader.headers()?.iter().map(str::to_string).collect();
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        match layout.record_from_row(&row, line) {
            Ok(record) => records.push(record),
            Err(e) if e.is_row_error() => {
                warn!(line, error = %e, "skipping bid row");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    report.loaded = records.len();
    report.elapsed = start.elapsed();
    Ok((records, report))
}

/// Load the CSV file at `path` straight into `tree`
///
/// Rows are inserted in file order under the tree's duplicate policy.
pub fn load_into(
    tree: &mut BinarySearchTree,
    path: impl AsRef<Path>,
    layout: &CsvLayout,
) -> Result<LoadReport> {
    let (records, report) = load_records(path, layout)?;
    insert_records(tree, records, report)
}

/// Insert records already read by [`read_records`] or [`load_records`]
///
/// `loaded`, `replaced` and `skipped` are updated from the insert outcomes,
/// and the insert time is added to `elapsed`.
pub fn insert_records(
    tree: &mut BinarySearchTree,
    records: Vec<Record>,
    mut report: LoadReport,
) -> Result<LoadReport> {
    let start = Instant::now();

    report.loaded = 0;
    for record in records {
        match tree.insert(record) {
            Ok(Some(_)) => report.replaced += 1,
            Ok(None) => report.loaded += 1,
            Err(IndexError::DuplicateKey(id)) => {
                warn!(id = %id, "skipping duplicate bid");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    report.elapsed += start.elapsed();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DuplicatePolicy, IndexConfig};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "ArticleTitle,ArticleID,Department,CloseDate,WinningBid,\
                          InventoryID,VehicleID,ReceiptNumber,Fund";

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_ebid_layout() -> Result<()> {
        let file = write_csv(&[
            "Table,98188,Surplus,12/1/2016,$12.50,,,,General Fund",
            "\"Chair, oak\",98109,Surplus,12/2/2016,\"$1,020.00\",,,,Enterprise",
        ]);

        let (records, report) = load_records(file.path(), &CsvLayout::default())?;

        assert_eq!(report.header.len(), 9);
        assert_eq!(report.header[1], "ArticleID");
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(records[0], Record::new("98188", "Table", "General Fund", 12.5));
        assert_eq!(records[1], Record::new("98109", "Chair, oak", "Enterprise", 1020.0));
        Ok(())
    }

    #[test]
    fn test_load_skips_bad_rows() -> Result<()> {
        let file = write_csv(&[
            "Table,98188,Surplus,12/1/2016,$12.50,,,,General Fund",
            "Short,1,2",
            "Nameless,,Surplus,12/1/2016,$3.00,,,,General Fund",
            "Broken,98190,Surplus,12/1/2016,$abc,,,,General Fund",
            "Blank,98191,Surplus,12/1/2016,,,,,General Fund",
        ]);

        let (records, report) = load_records(file.path(), &CsvLayout::default())?;

        assert_eq!(report.skipped, 3);
        assert_eq!(report.loaded, 2);
        assert_eq!(records[1].id, "98191");
        assert_eq!(records[1].amount, 0.0);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            load_records(dir.path().join("absent.csv"), &CsvLayout::default()).unwrap_err();
        assert!(matches!(err, IndexError::Io(_)));
    }

    #[test]
    fn test_read_custom_layout() -> Result<()> {
        let data = "a1,Lamp,12,Fund A\na2,Desk,€30,Fund B\n";
        let layout = CsvLayout::default()
            .columns(0, 1, 3, 2)
            .currency_symbol('€')
            .has_headers(false);

        let (records, report) = read_records(data.as_bytes(), &layout)?;

        assert!(report.header.is_empty());
        assert_eq!(
            records,
            vec![
                Record::new("a1", "Lamp", "Fund A", 12.0),
                Record::new("a2", "Desk", "Fund B", 30.0),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_load_into_tree() -> Result<()> {
        let file = write_csv(&[
            "Table,98188,Surplus,12/1/2016,$12.50,,,,General Fund",
            "Chair,98109,Surplus,12/2/2016,$20.00,,,,Enterprise",
            "Table again,98188,Surplus,12/3/2016,$14.00,,,,General Fund",
        ]);

        let mut tree = BinarySearchTree::new();
        let report = load_into(&mut tree, file.path(), &CsvLayout::default())?;

        assert_eq!(report.loaded, 2);
        assert_eq!(report.replaced, 1);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.find("98188").map(|r| r.amount), Some(14.0));
        Ok(())
    }

    #[test]
    fn test_load_into_rejecting_tree() -> Result<()> {
        let file = write_csv(&[
            "Table,98188,Surplus,12/1/2016,$12.50,,,,General Fund",
            "Table again,98188,Surplus,12/3/2016,$14.00,,,,General Fund",
        ]);

        let config = IndexConfig::new().duplicate_policy(DuplicatePolicy::Reject);
        let mut tree = BinarySearchTree::with_config(config);
        let report = load_into(&mut tree, file.path(), &CsvLayout::default())?;

        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(tree.find("98188").map(|r| r.amount), Some(12.5));
        Ok(())
    }
}
