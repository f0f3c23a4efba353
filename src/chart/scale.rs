//! Continuous and categorical scales: data values → pixel positions.

use crate::error::{DataFormatError, Result};

// ---------------------------------------------------------------------------
// LinearScale
// ---------------------------------------------------------------------------

/// Maps `[lo, hi]` onto `[r0, r1]`. The range may be inverted (`r0 > r1`),
/// which is how vertical axes put small values at the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        let (lo, hi) = domain;
        if !lo.is_finite() || !hi.is_finite() {
            return Err(DataFormatError::InvalidDomain { lo, hi });
        }
        if lo == hi {
            log::warn!("zero-width domain [{lo}, {hi}]; values map to the range midpoint");
        }
        Ok(LinearScale { domain, range })
    }

    /// `[min, max + pad_upper]` over `values`.
    pub fn extent(values: &[f64], pad_upper: f64) -> Result<(f64, f64)> {
        if values.is_empty() {
            return Err(DataFormatError::EmptyDataset);
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok((min, max + pad_upper))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn map(&self, v: f64) -> f64 {
        let (lo, hi) = self.domain;
        let (r0, r1) = self.range;
        let span = hi - lo;
        let t = if span == 0.0 { 0.5 } else { (v - lo) / span };
        // Written as a blend so t = 0 and t = 1 land exactly on the range ends.
        r0 * (1.0 - t) + r1 * t
    }

    /// Round tick values (steps of 1, 2 or 5 × 10^k) within the domain,
    /// aiming for roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (a, b) = self.domain;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if count == 0 {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }

        let raw = (hi - lo) / count as f64;
        let power = raw.log10().floor() as i32;
        let error = raw / 10f64.powi(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        // Negative powers divide by an integer increment to avoid 0.1 * 3 drift.
        if power < 0 {
            let inc = 10f64.powi(-power) / factor;
            let first = (lo * inc).ceil() as i64;
            let last = (hi * inc).floor() as i64;
            (first..=last).map(|i| i as f64 / inc).collect()
        } else {
            let step = factor * 10f64.powi(power);
            let first = (lo / step).ceil() as i64;
            let last = (hi / step).floor() as i64;
            (first..=last).map(|i| i as f64 * step).collect()
        }
    }
}

// ---------------------------------------------------------------------------
// BandScale
// ---------------------------------------------------------------------------

/// Splits a pixel range into equal bands, one per category, with `padding`
/// (a fraction of one step) between bands and on both outer edges. The bands
/// are centred in the range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new<S: AsRef<str>>(domain: &[S], range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let width = r1 - r0;

        let step = width / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (width - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);

        BandScale {
            domain: domain.iter().map(|s| s.as_ref().to_string()).collect(),
            start,
            step,
            bandwidth,
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Left edge of the band for `label`, or `None` if it is not in the domain.
    pub fn band_start(&self, label: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|d| d == label)
            .map(|i| self.start + i as f64 * self.step)
    }

    /// Centre of the band for `label`.
    pub fn band_center(&self, label: &str) -> Option<f64> {
        self.band_start(label).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_linear_boundaries_exact() {
        let s = LinearScale::new((0.1, 6.9), (0.0, 410.0)).unwrap();
        assert_eq!(s.map(0.1), 0.0);
        assert_eq!(s.map(6.9), 410.0);

        let inverted = LinearScale::new((0.1, 2.5), (330.0, 0.0)).unwrap();
        assert_eq!(inverted.map(0.1), 330.0);
        assert_eq!(inverted.map(2.5), 0.0);
    }

    #[test]
    fn test_linear_monotonic() {
        let up = LinearScale::new((1.0, 7.0), (0.0, 400.0)).unwrap();
        let down = LinearScale::new((1.0, 7.0), (300.0, 0.0)).unwrap();
        let values = [1.0, 1.5, 2.25, 4.0, 6.99, 7.0];
        for w in values.windows(2) {
            assert!(up.map(w[0]) < up.map(w[1]));
            assert!(down.map(w[0]) > down.map(w[1]));
        }
        assert!((up.map(4.0) - 200.0).abs() < EPS);
    }

    #[test]
    fn test_linear_degenerate_domain_maps_to_midpoint() {
        let s = LinearScale::new((3.0, 3.0), (0.0, 100.0)).unwrap();
        assert_eq!(s.map(3.0), 50.0);
        assert!(s.map(42.0).is_finite());
    }

    #[test]
    fn test_linear_rejects_non_finite_domain() {
        assert!(matches!(
            LinearScale::new((f64::NAN, 1.0), (0.0, 1.0)),
            Err(DataFormatError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn test_extent_with_padding() {
        assert_eq!(LinearScale::extent(&[4.0, 1.0, 6.9], 0.5).unwrap(), (1.0, 7.4));
        assert_eq!(LinearScale::extent(&[], 0.0), Err(DataFormatError::EmptyDataset));
    }

    #[test]
    fn test_ticks_are_round() {
        let s = LinearScale::new((1.0, 6.9), (0.0, 410.0)).unwrap();
        let ticks = s.ticks(10);
        assert_eq!(ticks.len(), 12);
        assert_eq!(ticks[0], 1.0);
        assert_eq!(ticks[1], 1.5);
        assert_eq!(ticks[11], 6.5);

        let wide = LinearScale::new((0.0, 1000.0), (0.0, 1.0)).unwrap();
        assert_eq!(wide.ticks(5), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]);
    }

    #[test]
    fn test_band_layout() {
        let b = BandScale::new(&["setosa", "versicolor", "virginica"], (0.0, 410.0), 0.2);
        assert!((b.step() - 128.125).abs() < EPS);
        assert!((b.bandwidth() - 102.5).abs() < EPS);
        assert!((b.band_start("setosa").unwrap() - 25.625).abs() < EPS);
        assert!((b.band_start("virginica").unwrap() - 281.875).abs() < EPS);
        assert_eq!(b.band_start("hybrid"), None);
    }

    #[test]
    fn test_bands_do_not_overlap_and_fit_range() {
        for padding in [0.0, 0.1, 0.2, 0.5, 0.9] {
            let labels = ["a", "b", "c", "d"];
            let b = BandScale::new(&labels, (10.0, 610.0), padding);
            assert!(b.bandwidth() <= b.step() + EPS);

            let starts: Vec<f64> = labels.iter().map(|l| b.band_start(l).unwrap()).collect();
            for w in starts.windows(2) {
                assert!(w[0] + b.bandwidth() <= w[1] + EPS);
            }
            assert!(starts[0] >= 10.0 - EPS);
            assert!(starts[3] + b.bandwidth() <= 610.0 + EPS);
            // Outer gaps match on both sides.
            let left = starts[0] - 10.0;
            let right = 610.0 - (starts[3] + b.bandwidth());
            assert!((left - right).abs() < EPS);
        }
    }
}
