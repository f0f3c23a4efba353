//! Grouping and quartile statistics for box plots.
//!
//! Quantiles use linear interpolation between order statistics (the R-7 /
//! spreadsheet method): for `n` sorted values and probability `p`, the index is
//! `p * (n - 1)` and the result interpolates between its floor and ceiling.

use std::collections::BTreeMap;

use crate::data::model::{NumericField, Record};
use crate::error::{DataFormatError, Result};

/// Tukey's whisker multiplier.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Quantile `p` in `[0, 1]` of an ascending slice. `None` when empty.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let i = p * (n - 1) as f64;
    let lo = i.floor() as usize;
    let hi = i.ceil() as usize;
    let lower = sorted[lo];
    if hi == lo {
        return Some(lower);
    }
    Some(lower + (sorted[hi] - lower) * (i - lo as f64))
}

// ---------------------------------------------------------------------------
// QuartileSummary
// ---------------------------------------------------------------------------

/// Five-number style summary of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuartileSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub iqr: f64,
}

impl QuartileSummary {
    /// Summarize a set of values in any order.
    ///
    /// Fails on an empty slice or any non-finite value.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(DataFormatError::NonFiniteValue {
                row: pos + 1,
                field: "value".to_string(),
            });
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (Some(q1), Some(median), Some(q3)) = (
            quantile_sorted(&sorted, 0.25),
            quantile_sorted(&sorted, 0.5),
            quantile_sorted(&sorted, 0.75),
        ) else {
            return Err(DataFormatError::EmptyGroup(String::new()));
        };

        Ok(QuartileSummary {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            iqr: q3 - q1,
        })
    }

    pub fn lower_whisker(&self) -> f64 {
        self.q1 - WHISKER_IQR_FACTOR * self.iqr
    }

    pub fn upper_whisker(&self) -> f64 {
        self.q3 + WHISKER_IQR_FACTOR * self.iqr
    }

    /// Whether `v` lies strictly outside the whiskers.
    pub fn is_outlier(&self, v: f64) -> bool {
        v < self.lower_whisker() || v > self.upper_whisker()
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Partition records by species label. Record order is kept within a group.
pub fn group_by_species(records: &[Record]) -> BTreeMap<String, Vec<&Record>> {
    let mut groups: BTreeMap<String, Vec<&Record>> = BTreeMap::new();
    for r in records {
        groups.entry(r.species.clone()).or_default().push(r);
    }
    groups
}

/// Per-species quartile summaries of `field`.
pub fn summarize_by_species(
    records: &[Record],
    field: NumericField,
) -> Result<BTreeMap<String, QuartileSummary>> {
    let mut out = BTreeMap::new();
    for (species, group) in group_by_species(records) {
        if group.is_empty() {
            continue;
        }
        let values: Vec<f64> = group.iter().map(|r| field.value(r)).collect();
        let summary = QuartileSummary::from_values(&values).map_err(|e| match e {
            DataFormatError::EmptyGroup(_) => DataFormatError::EmptyGroup(species.clone()),
            DataFormatError::NonFiniteValue { .. } => DataFormatError::NonFiniteValue {
                row: records
                    .iter()
                    .position(|r| r.species == species && !field.value(r).is_finite())
                    .map_or(0, |i| i + 1),
                field: field.to_string(),
            },
            other => other,
        })?;
        log::debug!(
            "{species}: n={} q1={:.3} median={:.3} q3={:.3}",
            summary.count,
            summary.q1,
            summary.median,
            summary.q3
        );
        out.insert(species, summary);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn record(len: f64, species: &str) -> Record {
        Record {
            petal_length: len,
            petal_width: len / 4.0,
            species: species.to_string(),
        }
    }

    #[test]
    fn test_quartiles_interpolated() {
        let s = QuartileSummary::from_values(&[1.0, 1.2, 1.3, 1.5, 1.9, 2.1]).unwrap();
        assert!((s.q1 - 1.225).abs() < EPS);
        assert!((s.median - 1.4).abs() < EPS);
        assert!((s.q3 - 1.8).abs() < EPS);
        assert!((s.iqr - 0.575).abs() < EPS);
        assert_eq!(s.count, 6);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 2.1);
    }

    #[test]
    fn test_quartiles_order_invariant() {
        let a = QuartileSummary::from_values(&[1.0, 1.2, 1.3, 1.5, 1.9, 2.1]).unwrap();
        let b = QuartileSummary::from_values(&[1.9, 1.0, 2.1, 1.3, 1.5, 1.2]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_value() {
        let s = QuartileSummary::from_values(&[4.2]).unwrap();
        assert_eq!(s.q1, 4.2);
        assert_eq!(s.median, 4.2);
        assert_eq!(s.q3, 4.2);
        assert_eq!(s.iqr, 0.0);
        assert_eq!(s.lower_whisker(), 4.2);
        assert_eq!(s.upper_whisker(), 4.2);
    }

    #[test]
    fn test_quartile_ordering_holds() {
        let samples: [&[f64]; 4] = [
            &[3.0, 3.0, 3.0],
            &[5.0, -1.0],
            &[0.1, 0.4, 0.2, 9.0, 2.5, 2.5, 7.7],
            &[-3.0, -2.0, -10.0, 4.0, 4.0],
        ];
        for values in samples {
            let s = QuartileSummary::from_values(values).unwrap();
            assert!(s.min <= s.q1 && s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max);
            assert!(s.iqr >= 0.0);
            assert!((s.iqr - (s.q3 - s.q1)).abs() < EPS);
        }
    }

    #[test]
    fn test_whiskers_and_outliers() {
        let s = QuartileSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        // q1 = 2, q3 = 4, iqr = 2
        assert_eq!(s.lower_whisker(), -1.0);
        assert_eq!(s.upper_whisker(), 7.0);
        assert!(s.is_outlier(7.5));
        assert!(!s.is_outlier(7.0));
        assert!(s.is_outlier(-1.1));
    }

    #[test]
    fn test_empty_and_nan_rejected() {
        assert!(matches!(
            QuartileSummary::from_values(&[]),
            Err(DataFormatError::EmptyGroup(_))
        ));
        assert!(matches!(
            QuartileSummary::from_values(&[1.0, f64::NAN]),
            Err(DataFormatError::NonFiniteValue { row: 2, .. })
        ));
    }

    #[test]
    fn test_quantile_sorted_bounds() {
        let v = [1.0, 2.0, 4.0];
        assert_eq!(quantile_sorted(&v, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&v, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&v, 0.75), Some(3.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_summarize_by_species() {
        let records = vec![
            record(1.4, "setosa"),
            record(4.7, "versicolor"),
            record(1.3, "setosa"),
            record(1.5, "setosa"),
            record(4.5, "versicolor"),
            record(6.0, "virginica"),
        ];
        let by_species = summarize_by_species(&records, NumericField::PetalLength).unwrap();
        let keys: Vec<&str> = by_species.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["setosa", "versicolor", "virginica"]);

        let setosa = &by_species["setosa"];
        assert_eq!(setosa.count, 3);
        assert!((setosa.median - 1.4).abs() < EPS);

        let virginica = &by_species["virginica"];
        assert_eq!(virginica.iqr, 0.0);
        assert_eq!(virginica.median, 6.0);

        let widths = summarize_by_species(&records, NumericField::PetalWidth).unwrap();
        assert!((widths["versicolor"].median - 4.6 / 4.0).abs() < EPS);
    }

    #[test]
    fn test_summarize_reports_offending_row() {
        let records = vec![record(1.4, "setosa"), record(f64::INFINITY, "setosa")];
        assert!(matches!(
            summarize_by_species(&records, NumericField::PetalLength),
            Err(DataFormatError::NonFiniteValue { row: 2, .. })
        ));
    }
}
