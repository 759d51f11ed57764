//! Ledger error types.

use thiserror::Error;

use crate::types::ContributionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The input is not a non-negative decimal numeral within the supported
    /// fractional precision, or does not fit the amount type.
    #[error("invalid amount format {input:?}: {reason}")]
    InvalidAmountFormat { input: String, reason: &'static str },

    #[error("invalid contribution transition from {from} to {to}")]
    InvalidTransition {
        from: ContributionStatus,
        to: ContributionStatus,
    },

    #[error("amount overflow: total exceeds 256 bits")]
    AmountOverflow,
}

impl LedgerError {
    pub(crate) fn format(input: &str, reason: &'static str) -> Self {
        Self::InvalidAmountFormat {
            input: input.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
