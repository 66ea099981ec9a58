//! Significant-digit extraction.
//!
//! Digits are found with exponent arithmetic on `|x|`, never by formatting the
//! number. Integral magnitudes use exact integer division. Otherwise `|x|` is
//! scaled by a power of ten; when the scaled value lands within rounding
//! distance of an integer `k`, the side of the boundary is settled by comparing
//! `|x|` with the correctly rounded `k * 10^place`. Values that equal that
//! boundary take digit `k`, so `0.29` has second digit 9 while
//! `2.9999999999999996` keeps leading digit 2. A boundary that cannot be
//! rounded correctly is reported as [`BenfordError::InvalidInputShape`].

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::collections::BTreeMap;

use crate::error::{BenfordError, Result};

/// Largest power of ten representable as a finite `f64`.
const MAX_EXPONENT: i32 = 308;

/// Largest power of ten that is exact as an `f64`.
const MAX_EXACT_EXPONENT: u32 = 22;

/// Relative error bound, in units of `f64::EPSILON`, of scaling by an exact power of ten.
const SCALE_TOLERANCE: f64 = 4.0;

/// Same bound when `10^|place|` itself carries rounding error from `powi`.
const WIDE_SCALE_TOLERANCE: f64 = 64.0;

/// Integral magnitudes below this fit in a `u128`.
const U128_LIMIT: f64 = 3.4e38;

/// Largest power of ten that fits in a `u128`.
const MAX_U128_EXPONENT: i32 = 38;

/// Scaled values from here on have no exact units digit.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Returns the `n`-th most significant decimal digit of `|value|`.
///
/// `n = 1` is the leading digit. Zero maps to the sentinel digit `0`. Values
/// that are not finite, too small to be scaled reliably (subnormals), or whose
/// digit cannot be told apart from its neighbour in `f64` arithmetic are
/// rejected rather than answered with a wrong digit.
///
/// ```
/// use benfords::digits::leading_digit;
///
/// assert_eq!(leading_digit(1, 34823.0).unwrap(), 3);
/// assert_eq!(leading_digit(4, 34823.0).unwrap(), 2);
/// assert_eq!(leading_digit(2, 0.23).unwrap(), 3);
/// ```
pub fn leading_digit(n: u32, value: f64) -> Result<u8> {
    if n == 0 {
        return Err(BenfordError::InvalidDigitPosition(n));
    }
    if !value.is_finite() {
        return Err(BenfordError::InvalidInputShape(format!(
            "cannot take digits of non-finite value {value}"
        )));
    }
    if value == 0.0 {
        return Ok(0);
    }

    let magnitude = value.abs();
    if !magnitude.is_normal() {
        return Err(BenfordError::InvalidInputShape(format!(
            "value {value:e} is too small for reliable digit extraction"
        )));
    }

    let place = most_significant_place(magnitude)?;
    let offset = i32::try_from(n - 1).map_err(|_| BenfordError::InvalidDigitPosition(n))?;
    let target = place
        .checked_sub(offset)
        .ok_or(BenfordError::InvalidDigitPosition(n))?;

    // Integers have no nonzero fractional digits.
    if target < 0 && is_integral(magnitude) {
        return Ok(0);
    }
    Ok((floor_scaled(magnitude, target)? % 10) as u8)
}

/// Leading digits of every value, in input order.
pub fn first_digits(values: &[f64]) -> Result<Vec<u8>> {
    values.iter().map(|&v| leading_digit(1, v)).collect()
}

/// Power of ten of the most significant digit of a positive normal number.
fn most_significant_place(magnitude: f64) -> Result<i32> {
    let mut place = magnitude.log10().floor() as i32;
    // log10 can land one below or above at exact powers of ten.
    let lead = floor_scaled(magnitude, place)?;
    if lead >= 10 {
        place += 1;
    } else if lead < 1 {
        place -= 1;
    }
    Ok(place)
}

fn is_integral(magnitude: f64) -> bool {
    magnitude < U128_LIMIT && magnitude.fract() == 0.0
}

/// `floor(magnitude / 10^place)`, decided exactly or not at all.
fn floor_scaled(magnitude: f64, place: i32) -> Result<u128> {
    if place >= 0 && is_integral(magnitude) {
        if place > MAX_U128_EXPONENT {
            return Ok(0);
        }
        return Ok(magnitude as u128 / 10u128.pow(place.unsigned_abs()));
    }

    let scaled = scale(magnitude, place)?;
    if scaled >= MAX_EXACT_INTEGER {
        return Err(BenfordError::InvalidInputShape(format!(
            "digit at 10^{place} of {magnitude:e} is beyond f64 precision"
        )));
    }

    let nearest = scaled.round();
    let tolerance = match place.unsigned_abs() {
        0 => 0.0,
        e if e <= MAX_EXACT_EXPONENT => SCALE_TOLERANCE,
        _ => WIDE_SCALE_TOLERANCE,
    };
    let window = scaled * tolerance * f64::EPSILON;
    if (scaled - nearest).abs() > window {
        return Ok(scaled.floor() as u128);
    }

    let edge = boundary(nearest, place).ok_or_else(|| {
        BenfordError::InvalidInputShape(format!(
            "{magnitude:e} is too close to {nearest}e{place} to pick a digit"
        ))
    })?;
    let quotient = nearest as u128;
    if magnitude >= edge {
        Ok(quotient)
    } else {
        Ok(quotient.saturating_sub(1))
    }
}

/// Correctly rounded `k * 10^place`, available while `10^|place|` is exact.
fn boundary(k: f64, place: i32) -> Option<f64> {
    if place.unsigned_abs() > MAX_EXACT_EXPONENT {
        return None;
    }
    let power = 10f64.powi(place.abs());
    Some(if place >= 0 { k * power } else { k / power })
}

/// Computes `magnitude / 10^place`; negative places multiply so `10^-k` is never rounded.
fn scale(magnitude: f64, place: i32) -> Result<f64> {
    if place.abs() > MAX_EXPONENT {
        return Err(BenfordError::InvalidInputShape(format!(
            "digit place 10^{place} is outside the representable range"
        )));
    }
    let scaled = if place >= 0 {
        magnitude / 10f64.powi(place)
    } else {
        magnitude * 10f64.powi(-place)
    };
    if scaled.is_finite() {
        Ok(scaled)
    } else {
        Err(BenfordError::InvalidInputShape(format!(
            "scaling {magnitude:e} by 10^{place} overflowed"
        )))
    }
}

/// Counts values per order of magnitude, `round(log10(|x|))`.
///
/// Zero is counted as magnitude 0. The map is dense from the smallest to the
/// largest magnitude seen, with zero counts for the gaps.
pub fn magnitude_bins(values: &[f64]) -> BTreeMap<i32, usize> {
    let mut bins = BTreeMap::new();
    for &v in values.iter().filter(|v| v.is_finite()) {
        let magnitude = if v == 0.0 {
            0
        } else {
            v.abs().log10().round() as i32
        };
        *bins.entry(magnitude).or_insert(0) += 1;
    }

    if let (Some(&lo), Some(&hi)) = (bins.keys().next(), bins.keys().next_back()) {
        for m in lo..=hi {
            bins.entry(m).or_insert(0);
        }
    }
    bins
}
