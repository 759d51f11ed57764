//! # Amount codec
//!
//! Lossless conversion between decimal ether strings (as typed by a user)
//! and integer wei [`Amount`]s. Both directions work on digit strings and
//! integers only; no binary floating-point value is ever involved.
//!
//! ```text
//! "1.5"  --decimal_to_unit(18)-->  1500000000000000000
//! 1500000000000000000  --unit_to_decimal(18)-->  "1.5"
//! ```

use std::fmt;

use primitive_types::{U256, U512};
use serde::Serialize;

use crate::amount::{Amount, ETHER_DECIMALS};
use crate::error::{LedgerError, Result};

/// Human-readable decimal rendering of an [`Amount`].
///
/// Only meant for presentation. The way back to an [`Amount`] is
/// [`DisplayAmount::parse`], which goes through the canonical parser.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DisplayAmount(String);

impl DisplayAmount {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn parse(&self, decimals: u32) -> Result<Amount> {
        decimal_to_unit(&self.0, decimals)
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a sign-less decimal numeral into its integer unit amount.
///
/// Accepts ASCII digits with at most one `.` and at most `decimals`
/// fractional digits; `".5"` and `"5."` are allowed, an input without any
/// digit is not. Extra fractional digits are an error rather than being
/// truncated.
pub fn decimal_to_unit(input: &str, decimals: u32) -> Result<Amount> {
    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(LedgerError::format(input, "no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(LedgerError::format(input, "not a non-negative decimal number"));
    }

    let decimals = decimals as usize;
    if fraction.len() > decimals {
        return Err(LedgerError::format(input, "too many fractional digits"));
    }

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(Amount::ZERO);
    }
    U256::from_dec_str(significant)
        .map(Amount::new)
        .map_err(|_| LedgerError::format(input, "value out of range"))
}

/// Render `amount / 10^decimals` as the shortest exact decimal string.
///
/// Trailing fractional zeros are trimmed and the point is dropped when
/// nothing remains after it. The integer part is never empty.
pub fn unit_to_decimal(amount: Amount, decimals: u32) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Render `amount / 10^decimals` with exactly `places` fractional digits,
/// rounding half up.
pub fn unit_to_fixed(amount: Amount, decimals: u32, places: u32) -> DisplayAmount {
    let digits = if places >= decimals {
        // Widening only appends zeros.
        let mut digits = amount.to_string();
        digits.extend(std::iter::repeat('0').take((places - decimals) as usize));
        digits
    } else {
        round_off_digits(amount, decimals - places).to_string()
    };

    let places = places as usize;
    if places == 0 {
        return DisplayAmount(digits);
    }
    let padded = format!("{digits:0>width$}", width = places + 1);
    let (whole, fraction) = padded.split_at(padded.len() - places);
    DisplayAmount(format!("{whole}.{fraction}"))
}

/// Decimal digits in `U256::MAX`.
const U256_DIGITS: u32 = 78;

/// `amount / 10^shift`, rounded half up.
fn round_off_digits(amount: Amount, shift: u32) -> U512 {
    // Every U256 is below 10^78 / 2, so it rounds to zero at that shift.
    if shift >= U256_DIGITS {
        return U512::zero();
    }
    let divisor = U512::exp10(shift as usize);
    (U512::from(amount.wei()) + divisor / U512::from(2u64)) / divisor
}

/// [`decimal_to_unit`] with ether's 18 decimals.
pub fn parse_ether(input: &str) -> Result<Amount> {
    decimal_to_unit(input, ETHER_DECIMALS)
}

/// [`unit_to_decimal`] with ether's 18 decimals.
pub fn format_ether(amount: Amount) -> DisplayAmount {
    DisplayAmount(unit_to_decimal(amount, ETHER_DECIMALS))
}

/// Ether rendered with a fixed number of fractional digits, e.g. `"8.50"`.
pub fn format_ether_fixed(amount: Amount, places: u32) -> DisplayAmount {
    unit_to_fixed(amount, ETHER_DECIMALS, places)
}
