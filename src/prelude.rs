//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use cotejar::prelude::*;
//! ```

pub use crate::chart::{ChartConfig, ChartRenderer};
pub use crate::compare::{common_keys, compare, Comparison, ComparisonKey, MatchTally, RatioRecord};
pub use crate::dataset::{Dataset, Measurement};
pub use crate::error::{CotejarError, Result};
pub use crate::report::{ReportRow, TidyTable};
pub use crate::variant::{normalize, SkipReason, VariantTag};
