//! Matcher/ratio engine: per-key row lookup across two datasets and safe
//! relative-performance ratios.
//!
//! Ratio direction is `a.time / b.time` with B treated as the baseline:
//! 1.0 means parity, above 1.0 means A is slower. Partial coverage across
//! implementations is expected (one side tests more block sizes, one side
//! skips large sizes), so a key present on only one side records a `None`
//! ratio and the run continues; absence is data here, not an error.

use crate::dataset::{Dataset, Measurement};
use crate::variant::{normalize, VariantTag};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Shared comparison key: matrix size plus canonical variant.
///
/// Block size rides inside [`VariantTag::Block`]. Ordering is
/// (size, variant rank), the fixed output ordering of every comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ComparisonKey {
    /// Matrix size.
    pub size: u32,
    /// Canonical variant.
    pub variant: VariantTag,
}

/// One matched (or half-matched) comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioRecord {
    /// The key this ratio was computed for.
    pub key: ComparisonKey,
    /// `a.time / b.time`; `None` when either side lacks the row or the
    /// baseline time is zero.
    pub ratio: Option<f64>,
}

/// Skip and miss counts for one comparison run, for diagnosability.
///
/// `zero_baseline` is deliberately separate from `unmatched`: a zero-time
/// denominator is a bad upstream sample, not a coverage gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
    /// Keys present on exactly one side.
    pub unmatched: usize,
    /// Keys where both rows exist but the baseline time is zero.
    pub zero_baseline: usize,
    /// Rows of dataset A that could not be normalized.
    pub skipped_a: usize,
    /// Rows of dataset B that could not be normalized.
    pub skipped_b: usize,
}

/// Result of one comparison run: ordered records plus tallies.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Ratio records ordered by ascending size, then variant rank.
    pub records: Vec<RatioRecord>,
    /// Skip and miss counts.
    pub tally: MatchTally,
}

/// Index a dataset's rows by normalized key, first match winning on
/// duplicates. Returns the index and the count of rows that failed
/// normalization.
pub(crate) fn index_dataset(dataset: &Dataset) -> (HashMap<ComparisonKey, &Measurement>, usize) {
    let mut index: HashMap<ComparisonKey, &Measurement> = HashMap::new();
    let mut skipped = 0;
    for row in dataset.rows() {
        match normalize(&row.algorithm, row.block_size) {
            Ok(variant) => {
                index
                    .entry(ComparisonKey {
                        size: row.size,
                        variant,
                    })
                    .or_insert(row);
            }
            Err(_) => skipped += 1,
        }
    }
    (index, skipped)
}

/// Default key universe for two datasets: the intersection of their size
/// sets crossed with the five tracked serial variants, in output order.
///
/// # Examples
///
/// ```
/// use cotejar::dataset::{Dataset, Measurement};
/// use cotejar::compare::common_keys;
///
/// let a = Dataset::from_rows("a", vec![Measurement::new("Standard", 600, 0.2)]);
/// let b = Dataset::from_rows("b", vec![Measurement::new("Standard", 600, 0.1)]);
/// assert_eq!(common_keys(&a, &b).len(), 5); // one size x five tracked variants
/// ```
#[must_use]
pub fn common_keys(a: &Dataset, b: &Dataset) -> Vec<ComparisonKey> {
    let sizes_a = a.sizes();
    let sizes_b = b.sizes();
    sizes_a
        .intersection(&sizes_b)
        .flat_map(|&size| {
            VariantTag::tracked()
                .into_iter()
                .map(move |variant| ComparisonKey { size, variant })
        })
        .collect()
}

/// Compare two datasets over the requested keys.
///
/// For each key (sorted and deduplicated first), the row is looked up
/// independently in each dataset:
/// 1. both present: ratio `a.time / b.time`, or `None` with a
///    `zero_baseline` tally when the baseline time is zero;
/// 2. exactly one present: `None` ratio, `unmatched` tally;
/// 3. neither present: key omitted from the output entirely.
///
/// Output is order-stable regardless of input row order or requested-key
/// order. The function is pure: identical inputs give identical output.
#[must_use]
pub fn compare(a: &Dataset, b: &Dataset, keys: &[ComparisonKey]) -> Comparison {
    let (index_a, skipped_a) = index_dataset(a);
    let (index_b, skipped_b) = index_dataset(b);

    let requested: BTreeSet<ComparisonKey> = keys.iter().copied().collect();

    let mut tally = MatchTally {
        skipped_a,
        skipped_b,
        ..MatchTally::default()
    };
    let mut records = Vec::with_capacity(requested.len());

    for key in requested {
        match (index_a.get(&key), index_b.get(&key)) {
            (Some(row_a), Some(row_b)) => {
                let ratio = if row_b.time == 0.0 {
                    tally.zero_baseline += 1;
                    None
                } else {
                    Some(row_a.time / row_b.time)
                };
                records.push(RatioRecord { key, ratio });
            }
            (None, None) => {}
            _ => {
                tally.unmatched += 1;
                records.push(RatioRecord { key, ratio: None });
            }
        }
    }

    Comparison { records, tally }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Measurement;

    fn key(size: u32, variant: VariantTag) -> ComparisonKey {
        ComparisonKey { size, variant }
    }

    #[test]
    fn test_both_present_gives_ratio() {
        let a = Dataset::from_rows("a", vec![Measurement::new("Standard", 1000, 2.0)]);
        let b = Dataset::from_rows("b", vec![Measurement::new("Standard", 1000, 1.0)]);
        let result = compare(&a, &b, &[key(1000, VariantTag::Standard)]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].ratio, Some(2.0));
    }

    #[test]
    fn test_one_sided_key_records_none() {
        let a = Dataset::from_rows("a", vec![Measurement::new("Line", 2000, 3.0)]);
        let b = Dataset::from_rows("b", vec![Measurement::new("Line", 1000, 1.0)]);
        let result = compare(&a, &b, &[key(2000, VariantTag::Line)]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].ratio, None);
        assert_eq!(result.tally.unmatched, 1);
    }

    #[test]
    fn test_cross_spelling_block_match() {
        // A embeds the tile size in the label, B carries a blockSize column.
        let a = Dataset::from_rows("a", vec![Measurement::new("Block_256", 4096, 5.0)]);
        let b = Dataset::from_rows(
            "b",
            vec![Measurement::new("Block", 4096, 4.0).with_block_size(256)],
        );
        let result = compare(&a, &b, &[key(4096, VariantTag::Block(256))]);
        assert_eq!(result.records[0].ratio, Some(1.25));
    }

    #[test]
    fn test_neither_present_key_is_omitted() {
        let a = Dataset::from_rows("a", vec![Measurement::new("Standard", 600, 0.2)]);
        let b = Dataset::from_rows("b", vec![Measurement::new("Standard", 600, 0.1)]);
        let result = compare(&a, &b, &[key(3000, VariantTag::Line)]);
        assert!(result.records.is_empty());
        assert_eq!(result.tally.unmatched, 0);
    }

    #[test]
    fn test_zero_baseline_yields_none_with_own_tally() {
        let a = Dataset::from_rows("a", vec![Measurement::new("Standard", 600, 0.2)]);
        let b = Dataset::from_rows("b", vec![Measurement::new("Standard", 600, 0.0)]);
        let result = compare(&a, &b, &[key(600, VariantTag::Standard)]);
        assert_eq!(result.records[0].ratio, None);
        assert_eq!(result.tally.zero_baseline, 1);
        assert_eq!(result.tally.unmatched, 0);
    }

    #[test]
    fn test_unnormalizable_rows_are_tallied_per_dataset() {
        let a = Dataset::from_rows(
            "a",
            vec![
                Measurement::new("Standard", 600, 0.2),
                Measurement::new("Block", 4096, 5.0), // no block size anywhere
            ],
        );
        let b = Dataset::from_rows("b", vec![Measurement::new("Standard", 600, 0.1)]);
        let result = compare(&a, &b, &common_keys(&a, &b));
        assert_eq!(result.tally.skipped_a, 1);
        assert_eq!(result.tally.skipped_b, 0);
        // The unresolvable block row never shows up as a fabricated key.
        assert!(result
            .records
            .iter()
            .all(|r| !matches!(r.key.variant, VariantTag::Block(_)) || r.ratio.is_none()));
    }

    #[test]
    fn test_duplicate_rows_first_match_wins() {
        let a = Dataset::from_rows(
            "a",
            vec![
                Measurement::new("Standard", 600, 2.0),
                Measurement::new("Standard", 600, 99.0),
            ],
        );
        let b = Dataset::from_rows("b", vec![Measurement::new("Standard", 600, 1.0)]);
        let result = compare(&a, &b, &[key(600, VariantTag::Standard)]);
        assert_eq!(result.records[0].ratio, Some(2.0));
    }

    #[test]
    fn test_output_ordered_by_size_then_variant() {
        let rows = |name: &str| {
            Dataset::from_rows(
                name,
                vec![
                    Measurement::new("Line", 3000, 3.0),
                    Measurement::new("Standard", 600, 1.0),
                    Measurement::new("Line", 600, 0.5),
                    Measurement::new("Standard", 1800, 2.0),
                ],
            )
        };
        let a = rows("a");
        let b = rows("b");
        // Requested out of order, with a duplicate.
        let keys = vec![
            key(3000, VariantTag::Line),
            key(600, VariantTag::Line),
            key(600, VariantTag::Standard),
            key(1800, VariantTag::Standard),
            key(600, VariantTag::Standard),
        ];
        let result = compare(&a, &b, &keys);
        let got: Vec<(u32, VariantTag)> = result
            .records
            .iter()
            .map(|r| (r.key.size, r.key.variant))
            .collect();
        assert_eq!(
            got,
            vec![
                (600, VariantTag::Standard),
                (600, VariantTag::Line),
                (1800, VariantTag::Standard),
                (3000, VariantTag::Line),
            ]
        );
    }

    #[test]
    fn test_common_keys_is_size_intersection() {
        let a = Dataset::from_rows(
            "a",
            vec![
                Measurement::new("Standard", 600, 1.0),
                Measurement::new("Standard", 1000, 2.0),
            ],
        );
        let b = Dataset::from_rows(
            "b",
            vec![
                Measurement::new("Standard", 1000, 1.5),
                Measurement::new("Standard", 1400, 3.0),
            ],
        );
        let keys = common_keys(&a, &b);
        assert!(keys.iter().all(|k| k.size == 1000));
        assert_eq!(keys.len(), VariantTag::tracked().len());
    }

    #[test]
    fn test_compare_is_idempotent() {
        let a = Dataset::from_rows(
            "a",
            vec![
                Measurement::new("Standard", 600, 0.2),
                Measurement::new("Line", 600, 0.1),
            ],
        );
        let b = Dataset::from_rows(
            "b",
            vec![
                Measurement::new("Standard", 600, 0.15),
                Measurement::new("Line", 600, 0.05),
            ],
        );
        let keys = common_keys(&a, &b);
        let first = compare(&a, &b, &keys);
        let second = compare(&a, &b, &keys);
        assert_eq!(first.records, second.records);
        assert_eq!(first.tally, second.tally);
    }

    #[test]
    fn test_comparison_serializes() {
        let a = Dataset::from_rows("a", vec![Measurement::new("Standard", 600, 0.2)]);
        let b = Dataset::from_rows("b", vec![Measurement::new("Standard", 600, 0.1)]);
        let result = compare(&a, &b, &common_keys(&a, &b));
        assert!(serde_json::to_string(&result).is_ok());
    }
}
