//! # Funding Ledger
//!
//! Exact arithmetic for equity-crowdfunding campaigns denominated in ether.
//! Every amount is an integer number of wei; percentages are fixed-point
//! integers. Nothing here touches floating point until a [`Percentage`] is
//! converted for display.
//!
//! | Concern            | Entry Point(s)                                           |
//! |--------------------|----------------------------------------------------------|
//! | Parsing / display  | [`decimal_to_unit`], [`unit_to_decimal`], [`parse_ether`], [`format_ether`], [`format_ether_fixed`] |
//! | Accumulation       | [`apply_confirmed_contribution`], [`fold_confirmed`]     |
//! | Progress           | [`funding_percent`], [`equity_percent`]                  |
//! | Lifecycle          | [`Contribution::confirm`], [`Contribution::fail`]        |
//! | Aggregates         | [`FundingSummary`], [`InvestorPortfolio`]                |
//!
//! All functions are pure and synchronous. Callers that share a campaign's
//! raised total between tasks must serialize confirmations themselves; this
//! crate provides the fold step only.

mod amount;
mod codec;
mod error;
mod ledger;
mod progress;
mod summary;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_codec;
#[cfg(test)]
mod test_ledger;

pub use amount::{Amount, ETHER_DECIMALS, WEI_PER_ETHER};
pub use codec::{
    decimal_to_unit, format_ether, format_ether_fixed, parse_ether, unit_to_decimal,
    unit_to_fixed, DisplayAmount,
};
pub use error::{LedgerError, Result};
pub use ledger::{apply_confirmed_contribution, checked_apply_confirmed_contribution, fold_confirmed};
pub use progress::{equity_percent, funding_percent, Percentage, DEFAULT_PRECISION, MAX_PRECISION};
pub use summary::{FundingSummary, InvestorPortfolio};
pub use types::{CampaignFunding, Contribution, ContributionStatus};

pub use primitive_types::U256;
