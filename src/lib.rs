//! Cotejar: cross-implementation benchmark comparison in pure Rust.
//!
//! Cotejar aligns benchmark measurements from two independently benchmarked
//! implementations of the same algorithm family onto a shared key space
//! (matrix size × algorithm variant × block size), computes relative
//! performance ratios that stay honest in the presence of missing or
//! misaligned rows, and renders tidy tables and terminal charts.
//!
//! # Quick Start
//!
//! ```
//! use cotejar::prelude::*;
//!
//! let a = Dataset::from_rows("csharp", vec![
//!     Measurement::new("Standard", 1000, 2.0),
//!     Measurement::new("Block_256", 4096, 5.0),
//! ]);
//! let b = Dataset::from_rows("cpp", vec![
//!     Measurement::new("Standard", 1000, 1.0),
//!     Measurement::new("Block", 4096, 4.0).with_block_size(256),
//! ]);
//!
//! // Intersection of sizes x tracked variants, compared A against baseline B.
//! let comparison = compare(&a, &b, &common_keys(&a, &b));
//! let table = TidyTable::build(&comparison.records);
//!
//! assert_eq!(table.get(1000, VariantTag::Standard), Some(2.0));
//! assert_eq!(table.get(4096, VariantTag::Block(256)), Some(1.25));
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: one implementation's benchmark run as a normalized table
//! - [`variant`]: canonical variant tags and label normalization
//! - [`compare`]: per-key matching and safe ratio computation
//! - [`report`]: ordered tidy tables and CSV export
//! - [`chart`]: terminal chart rendering
//! - [`error`]: crate-wide error type

pub mod chart;
pub mod compare;
pub mod dataset;
pub mod error;
pub mod prelude;
pub mod report;
pub mod variant;
