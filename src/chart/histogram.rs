//! Histogram bin derivation.

use serde::Serialize;

use crate::dataset::Dataset;

/// Upper bound on the number of bins.
const MAX_BINS: usize = 20;

/// One histogram bin over `[start, end)`; the last bin is closed so the
/// maximum value is absorbed rather than overflowing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Upper edge.
    pub end: f64,
    /// Number of values in the bin.
    pub count: usize,
}

/// Bin one numeric column.
///
/// Bin count is `min(20, ceil(sqrt(valid_count)))` over the
/// numeric-coercible values; each value maps to
/// `floor((v - min) / bin_size)` clamped to the last bin. No valid values
/// yields no bins; a constant column yields a single bin holding everything.
pub(super) fn derive(dataset: &Dataset, column: &str) -> Vec<HistogramBin> {
    let values: Vec<f64> = dataset
        .column_values(column)
        .filter_map(crate::value::Value::to_number)
        .collect();
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_count = ((values.len() as f64).sqrt().ceil() as usize).clamp(1, MAX_BINS);
    let bin_size = (max - min) / bin_count as f64;

    if bin_size <= 0.0 {
        // Constant column: one bin holds every value.
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let mut counts = vec![0usize; bin_count];
    for value in &values {
        let bin = ((value - min) / bin_size).floor() as usize;
        counts[bin.min(bin_count - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * bin_size,
            end: min + (i + 1) as f64 * bin_size,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use crate::schema::{Column, ColumnType, Schema};
    use crate::value::Value;

    fn dataset(values: Vec<Value>) -> Dataset {
        Dataset::new(
            Schema::new(vec![Column::new("v", ColumnType::Number)]),
            values
                .into_iter()
                .map(|v| Row::from_pairs([("v", v)]))
                .collect(),
        )
    }

    fn numbers(values: &[f64]) -> Dataset {
        dataset(values.iter().map(|&n| Value::Number(n)).collect())
    }

    #[test]
    fn test_outlier_clamps_into_last_bin() {
        // 5 values -> ceil(sqrt(5)) = 3 bins of width 33; 100 lands in the
        // last bin instead of overflowing.
        let bins = derive(&numbers(&[1.0, 2.0, 3.0, 4.0, 100.0]), "v");
        assert_eq!(bins.len(), 3);
        assert_eq!(bins[0].count, 4);
        assert_eq!(bins[1].count, 0);
        assert_eq!(bins[2].count, 1);
    }

    #[test]
    fn test_counts_sum_to_valid_count() {
        let bins = derive(&numbers(&[1.0, 5.0, 9.0, 2.0, 8.0, 3.0, 7.0]), "v");
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn test_invalid_values_excluded() {
        let bins = derive(
            &dataset(vec![
                Value::Number(1.0),
                Value::from("junk"),
                Value::Null,
                Value::Number(2.0),
            ]),
            "v",
        );
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_bin_count_capped_at_twenty() {
        let values: Vec<f64> = (0..1000).map(f64::from).collect();
        let bins = derive(&numbers(&values), "v");
        assert_eq!(bins.len(), 20);
    }

    #[test]
    fn test_no_valid_values_yields_no_bins() {
        assert!(derive(&dataset(vec![Value::Null, Value::from("x")]), "v").is_empty());
        assert!(derive(&dataset(Vec::new()), "v").is_empty());
    }

    #[test]
    fn test_constant_column_single_bin() {
        let bins = derive(&numbers(&[5.0, 5.0, 5.0, 5.0]), "v");
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 4);
        assert_eq!(bins[0].start, 5.0);
    }

    #[test]
    fn test_bin_edges_tile_the_range() {
        let bins = derive(&numbers(&[0.0, 1.0, 2.0, 3.0]), "v");
        assert_eq!(bins[0].start, 0.0);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!((bins[bins.len() - 1].end - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_numerals_count_as_valid() {
        let bins = derive(
            &dataset(vec![Value::from("1"), Value::from("2"), Value::Number(3.0)]),
            "v",
        );
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
    }
}
