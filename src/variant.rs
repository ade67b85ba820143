//! Canonical algorithm variant tags and label normalization.
//!
//! The two benchmark producers spell the same logical variant differently:
//! one writes `Block_256` with the tile size embedded in the label, the
//! other writes `Block` plus a separate `blockSize` column; one writes
//! `Line_large` for the same algorithm the other calls `Line`. This module
//! collapses every raw label onto one [`VariantTag`] before any cross-dataset
//! lookup happens, so aliasing rules live in one auditable table instead of
//! scattered string checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical algorithm variant under benchmark.
///
/// Declaration order is the fixed report ordering: Standard, Line, blocked
/// variants by ascending tile size, then the parallel variants. `Ord`
/// relies on this.
///
/// # Examples
///
/// ```
/// use cotejar::variant::{normalize, VariantTag};
///
/// assert_eq!(normalize("Line_large", None), Ok(VariantTag::Line));
/// assert_eq!(normalize("Block_256", None), Ok(VariantTag::Block(256)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum VariantTag {
    /// Naive triple-loop multiplication.
    Standard,
    /// Line-oriented (cache-friendly loop order) multiplication.
    Line,
    /// Cache-blocked multiplication with the given tile size.
    Block(u32),
    /// Parallelized over the outer loop (OpenMP `parallel for`).
    ExternalParallel,
    /// Parallelized over the inner loop.
    InternalParallel,
}

impl VariantTag {
    /// The five serially-benchmarked variants every comparison report
    /// carries one column for.
    #[must_use]
    pub const fn tracked() -> [Self; 5] {
        [
            Self::Standard,
            Self::Line,
            Self::Block(128),
            Self::Block(256),
            Self::Block(512),
        ]
    }

    /// True for block-tiled variants.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    /// True for the parallel variants.
    #[must_use]
    pub const fn is_parallel(&self) -> bool {
        matches!(self, Self::ExternalParallel | Self::InternalParallel)
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "Standard"),
            Self::Line => write!(f, "Line"),
            Self::Block(k) => write!(f, "Block_{k}"),
            Self::ExternalParallel => write!(f, "LineExtParallel"),
            Self::InternalParallel => write!(f, "LineIntParallel"),
        }
    }
}

/// Why a row could not be normalized onto a [`VariantTag`].
///
/// These are expected, recoverable states: the row is excluded from
/// comparison and counted in a skip tally, never raised as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Block-tiled label with no companion block size and no numeric suffix.
    MissingBlockSize,
    /// Label matched no alias and no category rule.
    UnknownLabel,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBlockSize => write!(f, "block variant without resolvable block size"),
            Self::UnknownLabel => write!(f, "unrecognized algorithm label"),
        }
    }
}

/// Exact-string aliases, one dataset spelling per row.
///
/// `Line_large` is the C++ producer's size-class spelling of the same line
/// algorithm; the original tooling folded it onto `Line` and that aliasing
/// is kept here. If the two ever turn out to be genuinely different
/// algorithms, this table is the single place to split them.
const EXACT_ALIASES: &[(&str, VariantTag)] = &[
    ("Standard", VariantTag::Standard),
    ("Line", VariantTag::Line),
    ("Line_large", VariantTag::Line),
];

/// Substring markers for category membership.
const EXT_PARALLEL_MARKER: &str = "ExtParallel";
const INT_PARALLEL_MARKER: &str = "IntParallel";
const BLOCK_MARKER: &str = "Block";

/// Translate a raw algorithm label (plus companion block size, when the
/// source has one) into a canonical [`VariantTag`].
///
/// Rules, in order:
/// 1. exact alias table,
/// 2. `ExtParallel` / `IntParallel` substring categories,
/// 3. `Block` substring, with the tile size taken from `block_size` or a
///    trailing `_<digits>` suffix on the label.
///
/// # Errors
///
/// Returns a [`SkipReason`] when the label cannot be normalized; callers
/// exclude the row and tally the skip.
pub fn normalize(label: &str, block_size: Option<u32>) -> Result<VariantTag, SkipReason> {
    for (alias, tag) in EXACT_ALIASES {
        if label == *alias {
            return Ok(*tag);
        }
    }

    // Parallel categories first: a blocked-parallel label classifies as
    // parallel, not as a block variant.
    if label.contains(EXT_PARALLEL_MARKER) {
        return Ok(VariantTag::ExternalParallel);
    }
    if label.contains(INT_PARALLEL_MARKER) {
        return Ok(VariantTag::InternalParallel);
    }

    if label.contains(BLOCK_MARKER) {
        return match block_size.or_else(|| suffix_number(label)) {
            Some(k) => Ok(VariantTag::Block(k)),
            None => Err(SkipReason::MissingBlockSize),
        };
    }

    Err(SkipReason::UnknownLabel)
}

/// Trailing `_<digits>` suffix, e.g. `Block_256` -> 256.
fn suffix_number(label: &str) -> Option<u32> {
    let (_, suffix) = label.rsplit_once('_')?;
    suffix.parse().ok()
}
