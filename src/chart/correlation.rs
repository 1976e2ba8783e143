//! Pearson correlation.
//!
//! Degenerate inputs — fewer than two valid pairs, or zero variance on
//! either side — are defined as exactly `0.0` rather than an error, so a
//! heatmap over constant or junk columns renders as "no correlation"
//! instead of failing.

use crate::dataset::Dataset;

/// Pearson correlation coefficient over paired samples.
///
/// Extra elements of the longer slice are ignored. Returns exactly `0.0`
/// when fewer than two pairs exist or the variance-product denominator is
/// zero.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];
    let nf = n as f64;

    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    cov / denominator
}

/// Pearson correlation between two dataset columns.
///
/// Rows where either cell fails numeric coercion are excluded pairwise
/// before the coefficient is computed.
#[must_use]
pub fn pearson_columns(dataset: &Dataset, a: &str, b: &str) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
        .rows()
        .iter()
        .filter_map(|row| {
            let x = row.get(a).to_number()?;
            let y = row.get(b).to_number()?;
            Some((x, y))
        })
        .unzip();
    pearson(&xs, &ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use crate::schema::{Column, ColumnType, Schema};
    use crate::value::Value;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_positive() {
        assert_relative_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
    }

    #[test]
    fn test_perfect_negative() {
        assert_relative_eq!(pearson(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]), -1.0);
    }

    #[test]
    fn test_bounds() {
        let r = pearson(&[1.0, 5.0, 2.0, 8.0, 3.0], &[2.0, 1.0, 9.0, 4.0, 7.0]);
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_fewer_than_two_pairs_is_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0], &[3.0]), 0.0);
    }

    #[test]
    fn test_zero_variance_is_zero() {
        assert_eq!(pearson(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let xs = [1.0, 4.0, 2.0, 9.0];
        let ys = [3.0, 1.0, 8.0, 5.0];
        assert_relative_eq!(pearson(&xs, &ys), pearson(&ys, &xs));
    }

    #[test]
    fn test_longer_slice_truncated() {
        assert_relative_eq!(pearson(&[1.0, 2.0, 3.0, 99.0], &[2.0, 4.0, 6.0]), 1.0);
    }

    #[test]
    fn test_columns_filter_invalid_pairs() {
        let ds = Dataset::new(
            Schema::new(vec![
                Column::new("a", ColumnType::Number),
                Column::new("b", ColumnType::Number),
            ]),
            vec![
                Row::from_pairs([("a", Value::Number(1.0)), ("b", Value::Number(2.0))]),
                Row::from_pairs([("a", Value::from("junk")), ("b", Value::Number(100.0))]),
                Row::from_pairs([("a", Value::Number(2.0)), ("b", Value::Number(4.0))]),
                Row::from_pairs([("a", Value::Number(50.0)), ("b", Value::Null)]),
                Row::from_pairs([("a", Value::Number(3.0)), ("b", Value::Number(6.0))]),
            ],
        );
        assert_relative_eq!(pearson_columns(&ds, "a", "b"), 1.0);
    }

    #[test]
    fn test_columns_degenerate_to_zero() {
        let ds = Dataset::new(
            Schema::new(vec![
                Column::new("a", ColumnType::Number),
                Column::new("b", ColumnType::Number),
            ]),
            vec![Row::from_pairs([("a", Value::Number(1.0)), ("b", Value::Number(2.0))])],
        );
        assert_eq!(pearson_columns(&ds, "a", "b"), 0.0);
    }
}
