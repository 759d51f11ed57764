//! Aggregates across campaigns and across one investor's contributions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::ledger::checked_apply_confirmed_contribution;
use crate::progress::{equity_percent, funding_percent, Percentage};
use crate::types::{CampaignFunding, Contribution, ContributionStatus};

/// Totals over a set of campaigns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FundingSummary {
    pub campaigns: usize,
    pub fully_funded: usize,
    pub total_goal: Amount,
    pub total_raised: Amount,
    /// `total_raised / total_goal`, not an average of per-campaign ratios.
    pub funding_percent: Percentage,
}

impl FundingSummary {
    /// Fails with [`LedgerError::AmountOverflow`] when the goals or raised
    /// totals of all campaigns together exceed 256 bits.
    pub fn from_campaigns<'a, I>(campaigns: I, precision: u32) -> Result<Self>
    where
        I: IntoIterator<Item = &'a CampaignFunding>,
    {
        let mut summary = Self {
            campaigns: 0,
            fully_funded: 0,
            total_goal: Amount::ZERO,
            total_raised: Amount::ZERO,
            funding_percent: Percentage::zero(precision),
        };
        for campaign in campaigns {
            summary.campaigns += 1;
            if campaign.is_fully_funded() {
                summary.fully_funded += 1;
            }
            summary.total_goal = summary
                .total_goal
                .checked_add(campaign.goal)
                .ok_or(LedgerError::AmountOverflow)?;
            summary.total_raised = summary
                .total_raised
                .checked_add(campaign.raised)
                .ok_or(LedgerError::AmountOverflow)?;
        }
        summary.funding_percent =
            funding_percent(summary.total_raised, summary.total_goal, precision);
        Ok(summary)
    }
}

/// One investor's position across the campaigns they contributed to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvestorPortfolio {
    pub confirmed: usize,
    pub pending: usize,
    pub failed: usize,
    /// Campaigns holding at least one confirmed contribution.
    pub campaigns: usize,
    pub total_invested: Amount,
    /// Sum over campaigns of the equity the investor's confirmed total buys.
    pub total_equity: Percentage,
}

impl InvestorPortfolio {
    /// Build from `(campaign key, campaign goal, contribution)` triples.
    ///
    /// Equity is computed per campaign on the summed confirmed amount, so
    /// several small contributions round once rather than once each.
    /// Fails with [`LedgerError::AmountOverflow`] when the confirmed total
    /// exceeds 256 bits.
    pub fn build<K, I>(entries: I, precision: u32) -> Result<Self>
    where
        K: Ord,
        I: IntoIterator<Item = (K, Amount, Contribution)>,
    {
        let mut portfolio = Self {
            confirmed: 0,
            pending: 0,
            failed: 0,
            campaigns: 0,
            total_invested: Amount::ZERO,
            total_equity: Percentage::zero(precision),
        };
        let mut holdings: BTreeMap<K, (Amount, Amount)> = BTreeMap::new();

        for (campaign, goal, contribution) in entries {
            match contribution.status {
                ContributionStatus::Pending => portfolio.pending += 1,
                ContributionStatus::Failed => portfolio.failed += 1,
                ContributionStatus::Confirmed => {
                    portfolio.confirmed += 1;
                    portfolio.total_invested = checked_apply_confirmed_contribution(
                        portfolio.total_invested,
                        contribution.amount,
                    )
                    .ok_or(LedgerError::AmountOverflow)?;
                    let held = holdings.entry(campaign).or_insert((goal, Amount::ZERO));
                    held.1 = checked_apply_confirmed_contribution(held.1, contribution.amount)
                        .ok_or(LedgerError::AmountOverflow)?;
                }
            }
        }

        portfolio.campaigns = holdings.len();
        for (goal, held) in holdings.into_values() {
            portfolio.total_equity =
                portfolio.total_equity + equity_percent(held, goal, precision);
        }
        Ok(portfolio)
    }
}
