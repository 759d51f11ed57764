//! # Progress calculator
//!
//! Funding and equity percentages computed on the integers themselves.
//!
//! A ratio `numerator / denominator` is evaluated as
//! `numerator * 10^(precision + 2) / denominator` with a 512-bit
//! intermediate, rounded half up, then clamped to `[0, 100]`. The result is a
//! [`Percentage`] holding that scaled integer; it only becomes an `f64` at
//! the presentation edge.
//!
//! Campaign goals of 10-30 ETH are already 10^19-10^20 wei, far beyond the
//! 2^53 range where `f64` stops representing integers exactly.

use std::fmt;
use std::ops::Add;

use primitive_types::{U256, U512};
use serde::{Serialize, Serializer};

use crate::amount::Amount;

/// Fractional digits used when the caller has no preference.
pub const DEFAULT_PRECISION: u32 = 2;

/// Largest supported precision. `100 * 10^12` still converts to `f64`
/// without loss.
pub const MAX_PRECISION: u32 = 12;

/// A fixed-point percentage: `scaled / 10^precision`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Percentage {
    scaled: u64,
    precision: u32,
}

impl Percentage {
    pub fn zero(precision: u32) -> Self {
        Self {
            scaled: 0,
            precision: precision.min(MAX_PRECISION),
        }
    }

    /// `scaled / 10^precision`. A precision above [`MAX_PRECISION`] is
    /// rounded half up to `MAX_PRECISION` digits.
    pub fn from_scaled(scaled: u64, precision: u32) -> Self {
        if precision <= MAX_PRECISION {
            return Self { scaled, precision };
        }
        let scaled = match 10u64.checked_pow(precision - MAX_PRECISION) {
            Some(divisor) => scaled / divisor + u64::from(scaled % divisor >= divisor / 2),
            None => 0,
        };
        Self {
            scaled,
            precision: MAX_PRECISION,
        }
    }

    pub fn scaled(&self) -> u64 {
        self.scaled
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn is_zero(&self) -> bool {
        self.scaled == 0
    }

    pub fn as_f64(&self) -> f64 {
        self.scaled as f64 / 10f64.powi(self.precision as i32)
    }

    fn rescale(self, precision: u32) -> Self {
        if precision <= self.precision {
            return self;
        }
        let factor = 10u64.pow(precision - self.precision);
        Self {
            scaled: self.scaled.saturating_mul(factor),
            precision,
        }
    }
}

/// Sums at the finer of the two precisions. Not bounded by 100: a portfolio
/// can hold equity in several campaigns.
impl Add for Percentage {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let precision = self.precision.max(rhs.precision);
        let (a, b) = (self.rescale(precision), rhs.rescale(precision));
        Self {
            scaled: a.scaled.saturating_add(b.scaled),
            precision,
        }
    }
}

/// Exactly `precision` fractional digits, e.g. `42.50`.
impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precision == 0 {
            return write!(f, "{}", self.scaled);
        }
        let unit = 10u64.pow(self.precision);
        write!(
            f,
            "{}.{:0>width$}",
            self.scaled / unit,
            self.scaled % unit,
            width = self.precision as usize
        )
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Share of the goal already raised, in `[0, 100]`.
///
/// A zero goal reports 0. Overfunded campaigns report 100.
pub fn funding_percent(raised: Amount, goal: Amount, precision: u32) -> Percentage {
    bounded_ratio(raised, goal, precision)
}

/// Share of the goal a single contribution represents, in `[0, 100]`.
///
/// Clamped like [`funding_percent`] so a contribution larger than the goal
/// reports 100.
pub fn equity_percent(contribution: Amount, goal: Amount, precision: u32) -> Percentage {
    bounded_ratio(contribution, goal, precision)
}

fn bounded_ratio(numerator: Amount, denominator: Amount, precision: u32) -> Percentage {
    let precision = precision.min(MAX_PRECISION);
    if denominator.is_zero() {
        return Percentage::zero(precision);
    }

    let scale = U256::exp10((precision + 2) as usize);
    let numerator = numerator.wei().full_mul(scale);
    let denominator = U512::from(denominator.wei());
    let rounded = (numerator + denominator / U512::from(2u64)) / denominator;

    let hundred = U512::from(100u64) * U512::exp10(precision as usize);
    let bounded = rounded.min(hundred);

    Percentage {
        scaled: bounded.low_u64(),
        precision,
    }
}
