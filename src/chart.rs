//! Terminal chart rendering for benchmark comparisons.
//!
//! Renders labeled ASCII bar charts as `String`s: execution time, block-size
//! behavior, parallel speedup/efficiency, MFLOPS, cache misses, and the
//! relative-performance ratio table. Charts that depend on an optional
//! column return [`CotejarError::MissingColumn`] once per call when the
//! dataset's source never carried that column; nothing is fabricated.
//!
//! All state lives in a caller-owned [`ChartConfig`]; rendering itself is
//! pure and writes nothing until [`ChartRenderer::save_charts`] is asked to.

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::compare::{index_dataset, ComparisonKey};
use crate::dataset::{Dataset, Measurement};
use crate::error::{CotejarError, Result};
use crate::report::TidyTable;
use crate::variant::VariantTag;
use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

/// ANSI escape codes for colored terminal output.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
}

/// Caller-owned chart configuration.
///
/// This replaces interactive-menu global state: the consumer decides where
/// charts land and how they look, and passes the config into each call.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Directory `save_charts` writes into.
    pub out_dir: PathBuf,
    /// Emit ANSI colors.
    pub colors: bool,
    /// Width of the widest bar in glyphs.
    pub bar_width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("plots"),
            colors: true,
            bar_width: 40,
        }
    }
}

impl ChartConfig {
    /// Set the output directory.
    #[must_use]
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Toggle ANSI colors.
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Set the bar width.
    #[must_use]
    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }
}

/// Renders benchmark charts under one configuration.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    /// Create a renderer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with a custom configuration.
    #[must_use]
    pub fn with_config(config: ChartConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Execution time of the Standard and Line variants for both datasets,
    /// grouped by matrix size.
    #[must_use]
    pub fn render_time_comparison(&self, a: &Dataset, b: &Dataset) -> String {
        let (index_a, _) = index_dataset(a);
        let (index_b, _) = index_dataset(b);
        let mut sizes: BTreeSet<u32> = a.sizes();
        sizes.extend(b.sizes());

        let mut entries: Vec<(u32, String, f64)> = Vec::new();
        for &size in &sizes {
            for (name, index) in [(a.name(), &index_a), (b.name(), &index_b)] {
                for variant in [VariantTag::Standard, VariantTag::Line] {
                    if let Some(row) = index.get(&ComparisonKey { size, variant }) {
                        entries.push((size, format!("{name} {variant}"), row.time));
                    }
                }
            }
        }
        let max = entries.iter().map(|(_, _, t)| *t).fold(0.0, f64::max);

        let mut out = self.header(&format!(
            "EXECUTION TIME: {} vs {} (seconds)",
            a.name(),
            b.name()
        ));
        for &size in &sizes {
            let group: Vec<_> = entries.iter().filter(|(s, _, _)| *s == size).collect();
            if group.is_empty() {
                continue;
            }
            let _ = writeln!(out, "  N = {size}");
            for (_, label, time) in group {
                let _ = writeln!(
                    out,
                    "    {label:<24} {} {time:>9.3}s",
                    self.bar(*time, max, false)
                );
            }
        }
        out
    }

    /// Block-variant execution time at one (large) matrix size, one bar per
    /// implementation and tile size.
    #[must_use]
    pub fn render_block_comparison(&self, a: &Dataset, b: &Dataset, size: u32) -> String {
        let (index_a, _) = index_dataset(a);
        let (index_b, _) = index_dataset(b);

        let mut entries: Vec<(String, f64)> = Vec::new();
        for tile in [128, 256, 512] {
            let key = ComparisonKey {
                size,
                variant: VariantTag::Block(tile),
            };
            for (name, index) in [(a.name(), &index_a), (b.name(), &index_b)] {
                if let Some(row) = index.get(&key) {
                    entries.push((format!("{name} Block {tile}"), row.time));
                }
            }
        }
        let max = entries.iter().map(|(_, t)| *t).fold(0.0, f64::max);

        let mut out = self.header(&format!("BLOCK MULTIPLICATION - {size}x{size} (seconds)"));
        for (label, time) in &entries {
            let _ = writeln!(
                out,
                "  {label:<24} {} {time:>9.3}s",
                self.bar(*time, max, false)
            );
        }
        out
    }

    /// Parallel speedup per matrix size for the external/internal parallel
    /// variants.
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::MissingColumn`] when the dataset's source
    /// never carried a `speedup` column.
    pub fn render_speedup(&self, dataset: &Dataset) -> Result<String> {
        self.require_column(dataset, "speedup")?;
        self.render_parallel_metric(
            dataset,
            &format!("PARALLEL SPEEDUP: {}", dataset.name()),
            "x",
            |row| row.speedup,
        )
    }

    /// Parallel efficiency per matrix size (1.0 = perfect scaling).
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::MissingColumn`] when the dataset's source
    /// never carried an `efficiency` column.
    pub fn render_efficiency(&self, dataset: &Dataset) -> Result<String> {
        self.require_column(dataset, "efficiency")?;
        self.render_parallel_metric(
            dataset,
            &format!("PARALLEL EFFICIENCY: {} (1.0 = perfect)", dataset.name()),
            "",
            |row| row.efficiency,
        )
    }

    /// MFLOPS per matrix size for every variant carrying throughput data.
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::MissingColumn`] when the dataset's source
    /// never carried an `mflops` column.
    pub fn render_mflops(&self, dataset: &Dataset) -> Result<String> {
        self.require_column(dataset, "mflops")?;
        let entries = normalized_metric(dataset, |row| row.mflops);
        let max = entries.iter().map(|(_, _, v)| *v).fold(0.0, f64::max);

        let mut out = self.header(&format!("MFLOPS: {}", dataset.name()));
        for (size, variant, value) in &entries {
            let _ = writeln!(
                out,
                "  N={size:<6} {:<16} {} {value:>10.1}",
                variant.to_string(),
                self.bar(*value, max, true)
            );
        }
        Ok(out)
    }

    /// L1 and L2 data cache misses (millions) per matrix size and variant.
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::MissingColumn`] when the dataset's source
    /// never carried the `L1` or `L2` column.
    pub fn render_cache_misses(&self, dataset: &Dataset) -> Result<String> {
        self.require_column(dataset, "L1")?;
        self.require_column(dataset, "L2")?;

        let l1 = normalized_metric(dataset, |row| row.l1_misses.map(|v| v as f64 / 1e6));
        let l2 = normalized_metric(dataset, |row| row.l2_misses.map(|v| v as f64 / 1e6));
        let max = l1
            .iter()
            .chain(l2.iter())
            .map(|(_, _, v)| *v)
            .fold(0.0, f64::max);

        let mut out = self.header(&format!("CACHE MISSES: {} (millions)", dataset.name()));
        for (section, entries) in [("L1 DCM", &l1), ("L2 DCM", &l2)] {
            let _ = writeln!(out, "  {section}");
            for (size, variant, value) in entries {
                let _ = writeln!(
                    out,
                    "    N={size:<6} {:<16} {} {value:>10.1}M",
                    variant.to_string(),
                    self.bar(*value, max, false)
                );
            }
        }
        Ok(out)
    }

    /// The relative-performance table as ratio bars around the 1.0 baseline.
    ///
    /// Missing comparisons render as an explicit `--` marker.
    #[must_use]
    pub fn render_relative_performance(
        &self,
        table: &TidyTable,
        numerator: &str,
        baseline: &str,
    ) -> String {
        let max = table
            .to_rows()
            .iter()
            .flat_map(|row| row.ratios.iter().filter_map(|(_, r)| *r))
            .fold(1.0, f64::max);

        let mut out = self.header(&format!(
            "RELATIVE PERFORMANCE: {numerator} time / {baseline} time (1.0 = {baseline} parity)"
        ));
        for row in table.to_rows() {
            let _ = writeln!(out, "  N = {}", row.size);
            for (variant, ratio) in &row.ratios {
                match ratio {
                    Some(value) => {
                        let _ = writeln!(
                            out,
                            "    {:<16} {} {value:>7.2}x",
                            variant.to_string(),
                            self.bar(*value, max, *value <= 1.0)
                        );
                    }
                    None => {
                        let _ = writeln!(out, "    {:<16} --", variant.to_string());
                    }
                }
            }
        }
        out
    }

    /// Write rendered charts under `config.out_dir`, one text file each,
    /// creating the directory. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a file cannot be written.
    pub fn save_charts(&self, charts: &[(&str, String)]) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.config.out_dir)?;
        let mut paths = Vec::with_capacity(charts.len());
        for (name, content) in charts {
            let path = self.config.out_dir.join(format!("{name}.txt"));
            std::fs::write(&path, content)?;
            paths.push(path);
        }
        Ok(paths)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn require_column(&self, dataset: &Dataset, column: &str) -> Result<()> {
        if dataset.column_exists(column) {
            Ok(())
        } else {
            Err(CotejarError::missing_column(dataset.name(), column))
        }
    }

    fn render_parallel_metric(
        &self,
        dataset: &Dataset,
        title: &str,
        unit: &str,
        metric: impl Fn(&Measurement) -> Option<f64>,
    ) -> Result<String> {
        let entries: Vec<(u32, VariantTag, f64)> = normalized_metric(dataset, metric)
            .into_iter()
            .filter(|(_, variant, _)| variant.is_parallel())
            .collect();
        let max = entries.iter().map(|(_, _, v)| *v).fold(1.0, f64::max);

        let mut out = self.header(title);
        for (size, variant, value) in &entries {
            let label = match variant {
                VariantTag::ExternalParallel => "External Parallel",
                VariantTag::InternalParallel => "Internal Parallel",
                _ => unreachable!("filtered to parallel variants"),
            };
            let _ = writeln!(
                out,
                "  N={size:<6} {label:<18} {} {value:>7.2}{unit}",
                self.bar(*value, max, *value >= 1.0)
            );
        }
        Ok(out)
    }

    fn header(&self, title: &str) -> String {
        let (bold, cyan, reset) = if self.config.colors {
            (colors::BOLD, colors::CYAN, colors::RESET)
        } else {
            ("", "", "")
        };
        let rule = "═".repeat(72);
        format!("{cyan}{rule}{reset}\n{bold}{title}{reset}\n{cyan}{rule}{reset}\n")
    }

    /// Scaled ASCII bar; highlighted bars render green when colors are on.
    fn bar(&self, value: f64, max: f64, highlight: bool) -> String {
        let width = self.config.bar_width;
        let ratio = if max > 0.0 { value / max } else { 0.0 };
        let filled = ((ratio * width as f64) as usize).min(width);
        let empty = width - filled;

        if self.config.colors && highlight {
            format!(
                "{}{}{}{}",
                colors::GREEN,
                "█".repeat(filled),
                colors::RESET,
                "░".repeat(empty)
            )
        } else if self.config.colors {
            format!(
                "{}{}{}{}",
                colors::DIM,
                "█".repeat(filled),
                colors::RESET,
                "░".repeat(empty)
            )
        } else {
            format!("{}{}", "█".repeat(filled), "░".repeat(empty))
        }
    }
}

/// Normalized (size, variant, value) triples for one metric, ordered by
/// (size, variant rank), rows without the metric or without a normalizable
/// label excluded.
fn normalized_metric(
    dataset: &Dataset,
    metric: impl Fn(&Measurement) -> Option<f64>,
) -> Vec<(u32, VariantTag, f64)> {
    let (index, _) = index_dataset(dataset);
    let mut entries: Vec<(u32, VariantTag, f64)> = index
        .into_iter()
        .filter_map(|(key, row)| metric(row).map(|v| (key.size, key.variant, v)))
        .collect();
    entries.sort_by_key(|&(size, variant, _)| (size, variant));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{common_keys, compare};
    use crate::dataset::Measurement;

    fn plain_renderer() -> ChartRenderer {
        ChartRenderer::with_config(ChartConfig::default().with_colors(false).with_bar_width(20))
    }

    fn cpp_dataset() -> Dataset {
        Dataset::from_rows(
            "cpp",
            vec![
                Measurement::new("Standard", 600, 0.132)
                    .with_mflops(3270.9)
                    .with_cache_misses(31_000_000, 6_200_000),
                Measurement::new("Line", 600, 0.095)
                    .with_mflops(4547.4)
                    .with_cache_misses(9_000_000, 2_100_000),
                Measurement::new("LineExtParallel", 600, 0.021).with_parallel(6.2, 0.78),
                Measurement::new("LineIntParallel", 600, 0.034).with_parallel(3.8, 0.48),
            ],
        )
    }

    #[test]
    fn test_time_comparison_renders_both_datasets() {
        let a = Dataset::from_rows(
            "csharp",
            vec![
                Measurement::new("Standard", 600, 0.221),
                Measurement::new("Line", 600, 0.131),
            ],
        );
        let b = cpp_dataset();
        let out = plain_renderer().render_time_comparison(&a, &b);
        assert!(out.contains("csharp Standard"));
        assert!(out.contains("cpp Line"));
        assert!(out.contains("N = 600"));
        assert!(out.contains("0.221"));
    }

    #[test]
    fn test_block_comparison_renders_present_tiles_only() {
        let a = Dataset::from_rows(
            "csharp",
            vec![Measurement::new("Block_128", 4096, 62.1)],
        );
        let b = Dataset::from_rows(
            "cpp",
            vec![
                Measurement::new("Block", 4096, 24.5).with_block_size(128),
                Measurement::new("Block", 4096, 22.9).with_block_size(256),
            ],
        );
        let out = plain_renderer().render_block_comparison(&a, &b, 4096);
        assert!(out.contains("csharp Block 128"));
        assert!(out.contains("cpp Block 256"));
        assert!(!out.contains("Block 512"));
    }

    #[test]
    fn test_speedup_requires_column() {
        let bare = Dataset::from_rows("cs", vec![Measurement::new("Standard", 600, 0.2)]);
        let err = plain_renderer().render_speedup(&bare).unwrap_err();
        assert!(matches!(
            err,
            CotejarError::MissingColumn { ref column, .. } if column == "speedup"
        ));
    }

    #[test]
    fn test_speedup_renders_parallel_rows() {
        let out = plain_renderer().render_speedup(&cpp_dataset()).unwrap();
        assert!(out.contains("External Parallel"));
        assert!(out.contains("Internal Parallel"));
        assert!(out.contains("6.20x"));
    }

    #[test]
    fn test_efficiency_renders() {
        let out = plain_renderer().render_efficiency(&cpp_dataset()).unwrap();
        assert!(out.contains("0.78"));
    }

    #[test]
    fn test_mflops_gated_and_rendered() {
        let out = plain_renderer().render_mflops(&cpp_dataset()).unwrap();
        assert!(out.contains("Standard"));
        assert!(out.contains("3270.9"));

        let bare = Dataset::from_rows("cs", vec![Measurement::new("Standard", 600, 0.2)]);
        assert!(plain_renderer().render_mflops(&bare).is_err());
    }

    #[test]
    fn test_cache_misses_in_millions() {
        let out = plain_renderer().render_cache_misses(&cpp_dataset()).unwrap();
        assert!(out.contains("L1 DCM"));
        assert!(out.contains("L2 DCM"));
        assert!(out.contains("31.0M"));
    }

    #[test]
    fn test_relative_performance_marks_missing() {
        let a = Dataset::from_rows(
            "csharp",
            vec![
                Measurement::new("Standard", 600, 0.2),
                Measurement::new("Line", 600, 0.1),
            ],
        );
        let b = Dataset::from_rows("cpp", vec![Measurement::new("Standard", 600, 0.1)]);
        let comparison = compare(&a, &b, &common_keys(&a, &b));
        let table = crate::report::TidyTable::build(&comparison.records);
        let out = plain_renderer().render_relative_performance(&table, "csharp", "cpp");
        assert!(out.contains("2.00x"));
        assert!(out.contains("--"));
        assert!(out.contains("1.0 = cpp parity"));
    }

    #[test]
    fn test_save_charts_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::with_config(
            ChartConfig::default()
                .with_colors(false)
                .with_out_dir(dir.path().join("plots")),
        );
        let charts = vec![("speedup_comparison", "content".to_string())];
        let paths = renderer.save_charts(&charts).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("speedup_comparison.txt"));
        assert!(paths[0].exists());
    }

    #[test]
    fn test_bar_scales_to_width() {
        let renderer = plain_renderer();
        let full = renderer.bar(10.0, 10.0, false);
        assert_eq!(full.chars().filter(|&c| c == '█').count(), 20);
        let half = renderer.bar(5.0, 10.0, false);
        assert_eq!(half.chars().filter(|&c| c == '█').count(), 10);
    }
}
