//! Dataset model: one implementation's benchmark run as a normalized table.
//!
//! A [`Dataset`] wraps the rows of one benchmark CSV together with the set
//! of columns the source actually carried. Only `algorithm`, `size` and
//! `time` are required; every other column is probed defensively so that a
//! source without, say, cache-miss counters simply disables the features
//! that need them instead of fabricating zeros.

use crate::error::{CotejarError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every benchmark source must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["algorithm", "size", "time"];

/// Columns probed from the header when present.
pub const OPTIONAL_COLUMNS: [&str; 6] = [
    "blockSize",
    "mflops",
    "L1",
    "L2",
    "speedup",
    "efficiency",
];

/// One benchmark row.
///
/// `size` plus the normalized variant (plus block size for block-tiled
/// variants) identify a row within one dataset; on duplicates the first
/// match wins downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Raw algorithm label as the producer spelled it.
    pub algorithm: String,
    /// Matrix size (one side of the square matrices).
    pub size: u32,
    /// Tile size for block variants; `None` when absent or the producer's
    /// `0` sentinel.
    pub block_size: Option<u32>,
    /// Execution time in seconds.
    pub time: f64,
    /// Throughput in MFLOPS.
    pub mflops: Option<f64>,
    /// L1 data cache misses.
    pub l1_misses: Option<u64>,
    /// L2 data cache misses.
    pub l2_misses: Option<u64>,
    /// Parallel speedup over the serial run.
    pub speedup: Option<f64>,
    /// Parallel efficiency (speedup / threads).
    pub efficiency: Option<f64>,
}

impl Measurement {
    /// Create a measurement with the required fields only.
    #[must_use]
    pub fn new(algorithm: impl Into<String>, size: u32, time: f64) -> Self {
        Self {
            algorithm: algorithm.into(),
            size,
            block_size: None,
            time,
            mflops: None,
            l1_misses: None,
            l2_misses: None,
            speedup: None,
            efficiency: None,
        }
    }

    /// Set the block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Set the MFLOPS throughput.
    #[must_use]
    pub fn with_mflops(mut self, mflops: f64) -> Self {
        self.mflops = Some(mflops);
        self
    }

    /// Set L1/L2 cache miss counts.
    #[must_use]
    pub fn with_cache_misses(mut self, l1: u64, l2: u64) -> Self {
        self.l1_misses = Some(l1);
        self.l2_misses = Some(l2);
        self
    }

    /// Set parallel speedup and efficiency.
    #[must_use]
    pub fn with_parallel(mut self, speedup: f64, efficiency: f64) -> Self {
        self.speedup = Some(speedup);
        self.efficiency = Some(efficiency);
        self
    }
}

/// One implementation's benchmark run, loaded once and read-only.
///
/// # Examples
///
/// ```
/// use cotejar::dataset::Dataset;
///
/// let csv = "algorithm,size,time\nStandard,600,0.2\nLine,600,0.1\n";
/// let ds = Dataset::from_reader("csharp", csv.as_bytes()).unwrap();
/// assert_eq!(ds.len(), 2);
/// assert!(ds.column_exists("time"));
/// assert!(!ds.column_exists("mflops"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    rows: Vec<Measurement>,
    columns: BTreeSet<String>,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a required column is
    /// missing, a required field fails to parse, or the source has no data
    /// rows. Any of these makes the dataset entirely absent, never
    /// partially usable.
    pub fn from_csv_path(name: &str, path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(name, file)
    }

    /// Load a dataset from any CSV reader.
    ///
    /// # Errors
    ///
    /// Same contract as [`Dataset::from_csv_path`].
    pub fn from_reader(name: &str, reader: impl Read) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(ToString::to_string)
            .collect();

        let idx = |col: &str| headers.iter().position(|h| h == col);
        let require = |col: &str| idx(col).ok_or_else(|| CotejarError::missing_column(name, col));

        let algorithm_idx = require("algorithm")?;
        let size_idx = require("size")?;
        let time_idx = require("time")?;
        let block_size_idx = idx("blockSize");
        let mflops_idx = idx("mflops");
        let l1_idx = idx("L1");
        let l2_idx = idx("L2");
        let speedup_idx = idx("speedup");
        let efficiency_idx = idx("efficiency");

        let mut rows = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let required_field = |i: usize| -> Result<&str> {
                record.get(i).ok_or_else(|| {
                    CotejarError::Csv(format!("{name}: short record on data row {}", line + 1))
                })
            };

            let algorithm = required_field(algorithm_idx)?.to_string();
            let size: u32 = required_field(size_idx)?.parse().map_err(|_| {
                CotejarError::Csv(format!("{name}: bad 'size' on data row {}", line + 1))
            })?;
            let time: f64 = required_field(time_idx)?.parse().map_err(|_| {
                CotejarError::Csv(format!("{name}: bad 'time' on data row {}", line + 1))
            })?;

            // Optional cells: empty or unparsable values read as absent.
            let opt_cell = |i: Option<usize>| i.and_then(|i| record.get(i)).filter(|s| !s.is_empty());
            let block_size: Option<u32> = opt_cell(block_size_idx)
                .and_then(|s| s.parse().ok())
                .filter(|&k| k != 0);
            let mflops: Option<f64> = opt_cell(mflops_idx).and_then(|s| s.parse().ok());
            let l1_misses: Option<u64> = opt_cell(l1_idx).and_then(|s| s.parse().ok());
            let l2_misses: Option<u64> = opt_cell(l2_idx).and_then(|s| s.parse().ok());
            let speedup: Option<f64> = opt_cell(speedup_idx).and_then(|s| s.parse().ok());
            let efficiency: Option<f64> = opt_cell(efficiency_idx).and_then(|s| s.parse().ok());

            rows.push(Measurement {
                algorithm,
                size,
                block_size,
                time,
                mflops,
                l1_misses,
                l2_misses,
                speedup,
                efficiency,
            });
        }

        if rows.is_empty() {
            return Err(CotejarError::EmptyDataset {
                dataset: name.to_string(),
            });
        }

        let columns = headers
            .iter()
            .filter(|h| {
                REQUIRED_COLUMNS.contains(&h.as_str()) || OPTIONAL_COLUMNS.contains(&h.as_str())
            })
            .cloned()
            .collect();

        Ok(Self {
            name: name.to_string(),
            rows,
            columns,
        })
    }

    /// Build a dataset from in-memory rows.
    ///
    /// Optional-column presence is inferred: a column exists when any row
    /// carries a value for it.
    #[must_use]
    pub fn from_rows(name: &str, rows: Vec<Measurement>) -> Self {
        let mut columns: BTreeSet<String> =
            REQUIRED_COLUMNS.iter().map(ToString::to_string).collect();
        for row in &rows {
            if row.block_size.is_some() {
                columns.insert("blockSize".to_string());
            }
            if row.mflops.is_some() {
                columns.insert("mflops".to_string());
            }
            if row.l1_misses.is_some() {
                columns.insert("L1".to_string());
            }
            if row.l2_misses.is_some() {
                columns.insert("L2".to_string());
            }
            if row.speedup.is_some() {
                columns.insert("speedup".to_string());
            }
            if row.efficiency.is_some() {
                columns.insert("efficiency".to_string());
            }
        }
        Self {
            name: name.to_string(),
            rows,
            columns,
        }
    }

    /// Dataset name (e.g. "csharp", "cpp").
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    /// Rows satisfying a predicate, in source order.
    pub fn rows_matching<P>(&self, predicate: P) -> impl Iterator<Item = &Measurement>
    where
        P: FnMut(&&Measurement) -> bool,
    {
        self.rows.iter().filter(predicate)
    }

    /// True when the source carried the named column.
    #[must_use]
    pub fn column_exists(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Distinct matrix sizes, ascending.
    #[must_use]
    pub fn sizes(&self) -> BTreeSet<u32> {
        self.rows.iter().map(|r| r.size).collect()
    }
}
