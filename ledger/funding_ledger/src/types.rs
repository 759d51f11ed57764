//! # Types
//!
//! Campaign funding state and the contribution lifecycle.
//!
//! ## Campaign funding
//!
//! [`CampaignFunding`] pairs a fixed `goal` with a `raised` total that only
//! grows, and only through [`Contribution::confirm`].
//!
//! ## Contribution status
//!
//! [`ContributionStatus`] is forward-only:
//!
//! ```text
//! Pending ──► Confirmed
//!     └─────► Failed
//! ```
//!
//! Both branches are terminal. A retried payment is a new contribution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::ledger::checked_apply_confirmed_contribution;
use crate::progress::{funding_percent, Percentage};

/// Lifecycle status of a contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    /// Accepted and submitted; not yet settled.
    Pending,
    /// Settled; counted in the campaign's raised total.
    Confirmed,
    /// Settled unsuccessfully; never counted.
    Failed,
}

impl ContributionStatus {
    /// Short identifier suitable for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only `Pending -> Confirmed` and `Pending -> Failed` are allowed.
    pub fn can_transition_to(&self, next: ContributionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed) | (Self::Pending, Self::Failed)
        )
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown contribution status: {other}")),
        }
    }
}

/// Goal and raised total of one campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFunding {
    /// Target amount, fixed at creation.
    pub goal: Amount,
    /// Sum of all confirmed contributions.
    pub raised: Amount,
}

impl CampaignFunding {
    pub fn new(goal: Amount) -> Self {
        Self {
            goal,
            raised: Amount::ZERO,
        }
    }

    /// Rebuild from persisted values.
    pub fn with_raised(goal: Amount, raised: Amount) -> Self {
        Self { goal, raised }
    }

    /// What is still missing to reach the goal; zero once funded.
    pub fn remaining(&self) -> Amount {
        self.goal.saturating_sub(self.raised)
    }

    pub fn is_fully_funded(&self) -> bool {
        !self.goal.is_zero() && self.raised >= self.goal
    }

    pub fn funding_percent(&self, precision: u32) -> Percentage {
        funding_percent(self.raised, self.goal, precision)
    }
}

/// A single contribution and where it is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub amount: Amount,
    pub status: ContributionStatus,
}

impl Contribution {
    pub fn pending(amount: Amount) -> Self {
        Self {
            amount,
            status: ContributionStatus::Pending,
        }
    }

    /// Settle successfully and fold the amount into `funding`.
    ///
    /// Returns the new raised total. Fails without touching `funding` when
    /// the contribution is not pending, so a contribution is counted at
    /// most once.
    pub fn confirm(&mut self, funding: &mut CampaignFunding) -> Result<Amount> {
        self.check_transition(ContributionStatus::Confirmed)?;
        let raised = checked_apply_confirmed_contribution(funding.raised, self.amount)
            .ok_or(LedgerError::AmountOverflow)?;
        funding.raised = raised;
        self.status = ContributionStatus::Confirmed;
        Ok(raised)
    }

    /// Settle unsuccessfully. The campaign is not touched.
    pub fn fail(&mut self) -> Result<()> {
        self.check_transition(ContributionStatus::Failed)?;
        self.status = ContributionStatus::Failed;
        Ok(())
    }

    fn check_transition(&self, to: ContributionStatus) -> Result<()> {
        if self.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(LedgerError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }
}
