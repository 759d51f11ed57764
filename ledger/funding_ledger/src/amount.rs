//! Wei-denominated amounts.
//!
//! Amounts are exact unsigned 256-bit integers counted in wei
//! (1 ether = 10^18 wei). The canonical textual form, used for storage and
//! serialization, is the decimal wei string. Human-facing ether strings go
//! through [`crate::codec`].

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LedgerError;

/// Number of fractional digits of one ether.
pub const ETHER_DECIMALS: u32 = 18;

/// 10^18.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// An exact, non-negative quantity of wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Self = Self(U256([0; 4]));

    pub fn new(wei: U256) -> Self {
        Self(wei)
    }

    pub fn from_wei(wei: u128) -> Self {
        Self(U256::from(wei))
    }

    /// Whole ether, scaled to wei.
    pub fn from_ether(ether: u64) -> Self {
        Self(U256::from(ether) * U256::from(WEI_PER_ETHER))
    }

    pub fn wei(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<u128> for Amount {
    fn from(wei: u128) -> Self {
        Self::from_wei(wei)
    }
}

impl From<U256> for Amount {
    fn from(wei: U256) -> Self {
        Self(wei)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0 + rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Decimal wei, e.g. `1500000000000000000`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses the canonical decimal wei form. Only ASCII digits are accepted.
impl FromStr for Amount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(LedgerError::format(s, "empty wei string"));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::format(s, "wei must be a plain integer"));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| LedgerError::format(s, "value out of range"))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
