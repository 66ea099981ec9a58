//! Goodness-of-fit statistics against Benford's Law.
//!
//! Each statistic compares an empirical first-digit distribution with the
//! Benford PDF/CDF. Critical values at alpha 0.10, 0.05 and 0.01 are the
//! tabulated values from Morrow (2010).

#![allow(clippy::cast_precision_loss)]

use tracing::info;

use crate::benford::{BenfordDistribution, DigitDistribution};
use crate::types::{Alpha, SignificanceLevel, TestKind, TestResult};

/// Critical values for one test, ordered as [`Alpha::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues([f64; 3]);

impl CriticalValues {
    pub const fn at(&self, alpha: Alpha) -> f64 {
        match alpha {
            Alpha::TenPercent => self.0[0],
            Alpha::FivePercent => self.0[1],
            Alpha::OnePercent => self.0[2],
        }
    }
}

/// Tabulated critical values of `kind`.
#[must_use]
pub const fn critical_values(kind: TestKind) -> CriticalValues {
    match kind {
        TestKind::Kuiper => CriticalValues([1.191, 1.321, 1.579]),
        TestKind::KolmogorovSmirnov => CriticalValues([1.012, 1.148, 1.420]),
        TestKind::LeemisM => CriticalValues([0.851, 0.967, 1.212]),
        TestKind::ChoGainesD => CriticalValues([1.212, 1.330, 1.569]),
    }
}

/// Computes Kuiper's `V = D+ + D-`.
#[must_use]
pub fn kuiper(empirical: &DigitDistribution, benford: &BenfordDistribution) -> f64 {
    let d_plus = max_difference(benford.cdf(), &empirical.cdf).abs();
    let d_minus = max_difference(&empirical.cdf, benford.cdf()).abs();
    d_plus + d_minus
}

/// Computes the Kolmogorov-Smirnov `D`, scaled by `sqrt(9)` for nine digits.
#[must_use]
pub fn kolmogorov_smirnov(empirical: &DigitDistribution, benford: &BenfordDistribution) -> f64 {
    let max_abs = benford
        .cdf()
        .iter()
        .zip(&empirical.cdf)
        .map(|(b, e)| (b - e).abs())
        .fold(0.0, f64::max);
    3.0 * max_abs
}

/// Computes Leemis' `m` at the most frequent observed digit.
#[must_use]
pub fn leemis_m(empirical: &DigitDistribution, benford: &BenfordDistribution) -> f64 {
    let mut mode = 0;
    for (i, &p) in empirical.pdf.iter().enumerate() {
        if p > empirical.pdf[mode] {
            mode = i;
        }
    }
    (empirical.n as f64).sqrt() * (empirical.pdf[mode] - benford.pdf()[mode]).abs()
}

/// Computes Cho-Gaines' `d`, the scaled Euclidean distance between the PDFs.
#[must_use]
pub fn cho_gaines_d(empirical: &DigitDistribution, benford: &BenfordDistribution) -> f64 {
    let sum_sq: f64 = empirical
        .pdf
        .iter()
        .zip(benford.pdf())
        .map(|(e, b)| (e - b).powi(2))
        .sum();
    (empirical.n as f64 * sum_sq).sqrt()
}

/// Computes the statistic selected by `kind`.
#[must_use]
pub fn statistic(kind: TestKind, empirical: &DigitDistribution) -> f64 {
    let benford = BenfordDistribution::standard();
    match kind {
        TestKind::Kuiper => kuiper(empirical, benford),
        TestKind::KolmogorovSmirnov => kolmogorov_smirnov(empirical, benford),
        TestKind::LeemisM => leemis_m(empirical, benford),
        TestKind::ChoGainesD => cho_gaines_d(empirical, benford),
    }
}

/// Compares `value` against every critical value of `kind`.
#[must_use]
pub fn significance(kind: TestKind, value: f64) -> [SignificanceLevel; 3] {
    let table = critical_values(kind);
    Alpha::ALL.map(|alpha| {
        let critical_value = table.at(alpha);
        SignificanceLevel {
            alpha,
            critical_value,
            significant: value > critical_value,
        }
    })
}

/// Runs `kind` on an empirical distribution.
#[must_use]
pub fn evaluate(kind: TestKind, empirical: &DigitDistribution) -> TestResult {
    let value = statistic(kind, empirical);
    info!(test = %kind, symbol = kind.symbol(), value, n = empirical.n, "computed statistic");
    TestResult {
        test: kind,
        statistic: kind.display_name(),
        value,
        sample_size: empirical.n,
        significance: significance(kind, value),
    }
}

fn max_difference(a: &[f64; 9], b: &[f64; 9]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| x - y)
        .fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benford::DIGITS;

    const SAMPLE: [u8; 30] = [
        1, 1, 1, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 6, 6, 6, 6, 7, 7, 7, 8, 8, 9,
    ];

    fn sample() -> DigitDistribution {
        DigitDistribution::from_digits(&SAMPLE).unwrap()
    }

    /// Digits with counts rounded from `n * p(d)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn benford_like(n: usize) -> DigitDistribution {
        let mut digits = Vec::new();
        for d in DIGITS {
            let count = (n as f64 * BenfordDistribution::probability(d)).round() as usize;
            digits.extend(std::iter::repeat(d).take(count));
        }
        DigitDistribution::from_digits(&digits).unwrap()
    }

    #[test]
    fn kuiper_reference_value() {
        let v = statistic(TestKind::Kuiper, &sample());
        assert!((v - 0.21).abs() < 0.01, "V = {v}");
    }

    #[test]
    fn ks_is_scaled_max_cdf_gap() {
        // Largest gap is at digit 1: 0.30103 - 0.1.
        let d = statistic(TestKind::KolmogorovSmirnov, &sample());
        let expected = 3.0 * (BenfordDistribution::probability(1) - 0.1);
        assert!((d - expected).abs() < 1e-12, "D = {d}");
    }

    #[test]
    fn leemis_uses_first_modal_digit() {
        // Digit 2 is the mode (6 of 30).
        let m = statistic(TestKind::LeemisM, &sample());
        let expected = 30f64.sqrt() * (0.2 - BenfordDistribution::probability(2)).abs();
        assert!((m - expected).abs() < 1e-12, "m = {m}");

        // Tie between 3 and 5: digit 3 wins.
        let tied = DigitDistribution::from_digits(&[3, 5]).unwrap();
        let m = statistic(TestKind::LeemisM, &tied);
        let expected = 2f64.sqrt() * (0.5 - BenfordDistribution::probability(3)).abs();
        assert!((m - expected).abs() < 1e-12, "m = {m}");
    }

    #[test]
    fn cho_gaines_matches_definition() {
        let dist = sample();
        let benford = BenfordDistribution::standard();
        let sum: f64 = (0..9)
            .map(|i| (dist.pdf[i] - benford.pdf()[i]).powi(2))
            .sum();
        let d = statistic(TestKind::ChoGainesD, &dist);
        assert!((d - (30.0 * sum).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn statistics_are_nonnegative() {
        for digits in [&SAMPLE[..], &[9, 9, 9][..], &[1][..]] {
            let dist = DigitDistribution::from_digits(digits).unwrap();
            for kind in TestKind::ALL {
                assert!(statistic(kind, &dist) >= 0.0, "{kind} on {digits:?}");
            }
        }
    }

    #[test]
    fn benford_sample_is_not_significant() {
        let small = benford_like(1_000);
        let large = benford_like(100_000);
        for kind in TestKind::ALL {
            let result = evaluate(kind, &large);
            assert!(!result.rejects_benford(), "{kind}: {}", result.value);
            assert!(result.value < 0.1, "{kind}: {}", result.value);
            assert!(
                statistic(kind, &large) <= statistic(kind, &small) + 1e-9,
                "{kind} should shrink with n"
            );
        }
    }

    #[test]
    fn skewed_sample_is_significant() {
        let digits = vec![9u8; 200];
        let dist = DigitDistribution::from_digits(&digits).unwrap();
        for kind in [
            TestKind::KolmogorovSmirnov,
            TestKind::LeemisM,
            TestKind::ChoGainesD,
        ] {
            let result = evaluate(kind, &dist);
            assert!(result.is_significant_at(Alpha::OnePercent), "{kind}");
        }
    }

    #[test]
    fn kuiper_is_not_scaled_by_sample_size() {
        let digits = vec![9u8; 200];
        let dist = DigitDistribution::from_digits(&digits).unwrap();
        let v = statistic(TestKind::Kuiper, &dist);
        let expected = BenfordDistribution::standard().cdf()[7];
        assert!((v - expected).abs() < 1e-9, "V = {v}");
    }

    #[test]
    fn significance_is_strictly_greater() {
        let levels = significance(TestKind::Kuiper, 1.321);
        assert!(levels[0].significant);
        assert!(!levels[1].significant);
        assert!(!levels[2].significant);
        assert_eq!(levels[2].alpha, Alpha::OnePercent);
        assert!((levels[2].critical_value - 1.579).abs() < f64::EPSILON);
    }

    #[test]
    fn critical_value_tables() {
        assert!((critical_values(TestKind::KolmogorovSmirnov).at(Alpha::OnePercent) - 1.420).abs() < f64::EPSILON);
        assert!((critical_values(TestKind::LeemisM).at(Alpha::TenPercent) - 0.851).abs() < f64::EPSILON);
        assert!((critical_values(TestKind::ChoGainesD).at(Alpha::FivePercent) - 1.330).abs() < f64::EPSILON);
    }
}
