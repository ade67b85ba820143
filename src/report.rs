//! Report builder: the tidy comparison table, one row per matrix size and
//! one ratio column per variant.
//!
//! Missing comparisons stay visible as `None` cells (never rendered as 0,
//! never dropped rows) so downstream consumers can tell "not measured"
//! from "parity". No rounding or formatting happens here; presentation
//! belongs to the consumer.

use crate::compare::RatioRecord;
use crate::error::Result;
use crate::variant::VariantTag;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

/// One tidy-table row: a matrix size plus one cell per table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Matrix size this row describes.
    pub size: u32,
    /// Per-variant ratio cells, aligned with the table's column order.
    pub ratios: Vec<(VariantTag, Option<f64>)>,
}

/// Ordered tidy table of relative-performance ratios.
///
/// # Examples
///
/// ```
/// use cotejar::compare::{ComparisonKey, RatioRecord};
/// use cotejar::report::TidyTable;
/// use cotejar::variant::VariantTag;
///
/// let records = vec![RatioRecord {
///     key: ComparisonKey { size: 1000, variant: VariantTag::Standard },
///     ratio: Some(2.0),
/// }];
/// let table = TidyTable::build(&records);
/// assert_eq!(table.get(1000, VariantTag::Standard), Some(2.0));
/// assert_eq!(table.get(1000, VariantTag::Line), None);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct TidyTable {
    columns: Vec<VariantTag>,
    rows: Vec<ReportRow>,
}

impl TidyTable {
    /// Assemble matched ratios into an ordered table.
    ///
    /// Columns are the five tracked variants plus any further variant
    /// appearing in `records`, in fixed rank order. Rows cover every size
    /// appearing in `records`, ascending. On duplicate records for one
    /// key, the first wins.
    #[must_use]
    pub fn build(records: &[RatioRecord]) -> Self {
        let mut columns: BTreeSet<VariantTag> = VariantTag::tracked().into_iter().collect();
        for record in records {
            columns.insert(record.key.variant);
        }
        let columns: Vec<VariantTag> = columns.into_iter().collect();

        let mut cells: BTreeMap<(u32, VariantTag), Option<f64>> = BTreeMap::new();
        let mut sizes: BTreeSet<u32> = BTreeSet::new();
        for record in records {
            sizes.insert(record.key.size);
            cells
                .entry((record.key.size, record.key.variant))
                .or_insert(record.ratio);
        }

        let rows = sizes
            .into_iter()
            .map(|size| ReportRow {
                size,
                ratios: columns
                    .iter()
                    .map(|&variant| (variant, cells.get(&(size, variant)).copied().flatten()))
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }

    /// Table columns in order.
    #[must_use]
    pub fn columns(&self) -> &[VariantTag] {
        &self.columns
    }

    /// Table rows ordered by ascending size.
    #[must_use]
    pub fn to_rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Ratio at (size, variant); `None` covers both "no such cell" and a
    /// recorded missing comparison.
    #[must_use]
    pub fn get(&self, size: u32, variant: VariantTag) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.size == size)
            .and_then(|r| r.ratios.iter().find(|(v, _)| *v == variant))
            .and_then(|(_, ratio)| *ratio)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as flat delimited text: a `size` column plus one
    /// ratio column per table column, missing comparisons as empty fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn to_csv(&self, writer: impl Write) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec!["size".to_string()];
        header.extend(self.columns.iter().map(ToString::to_string));
        csv_writer.write_record(&header)?;

        for row in &self.rows {
            let mut fields = vec![row.size.to_string()];
            fields.extend(
                row.ratios
                    .iter()
                    .map(|(_, ratio)| ratio.map(|v| v.to_string()).unwrap_or_default()),
            );
            csv_writer.write_record(&fields)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the table to a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.to_csv(file)
    }
}
