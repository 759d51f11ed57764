//! Stored records and the shapes the API exchanges.
//!
//! Records hold amounts exactly as stored (decimal wei strings). Views add
//! the derived display strings and percentages computed by `funding_ledger`.

use funding_ledger::{
    equity_percent, format_ether, Amount, CampaignFunding, Contribution, ContributionStatus,
    DisplayAmount, Percentage,
};
use serde::{Deserialize, Serialize};

use crate::address::short_address;
use crate::errors::{Result, ServiceError};

pub const SHORT_ADDRESS_CHARS: usize = 4;

// ─────────────────────────────────────────────────────────
// Database rows
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRecord {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub goal: String,
    pub raised: String,
    pub created_at: i64,
    /// Distinct investors with a confirmed contribution.
    pub investors: i64,
}

impl CampaignRecord {
    pub fn funding(&self) -> Result<CampaignFunding> {
        Ok(CampaignFunding::with_raised(
            parse_stored(&self.goal, "campaign goal", self.id)?,
            parse_stored(&self.raised, "campaign raised", self.id)?,
        ))
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContributionRecord {
    pub id: i64,
    pub campaign_id: i64,
    pub investor: String,
    pub amount: String,
    pub status: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
    pub settled_at: Option<i64>,
}

impl ContributionRecord {
    pub fn amount(&self) -> Result<Amount> {
        parse_stored(&self.amount, "contribution amount", self.id)
    }

    pub fn status(&self) -> Result<ContributionStatus> {
        self.status
            .parse()
            .map_err(|e| ServiceError::Corrupt(format!("contribution {}: {e}", self.id)))
    }

    pub fn contribution(&self) -> Result<Contribution> {
        Ok(Contribution {
            amount: self.amount()?,
            status: self.status()?,
        })
    }
}

/// One of an investor's contributions joined with its campaign's goal.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HoldingRecord {
    pub id: i64,
    pub campaign_id: i64,
    pub goal: String,
    pub amount: String,
    pub status: String,
}

impl HoldingRecord {
    pub fn entry(&self) -> Result<(i64, Amount, Contribution)> {
        let goal = parse_stored(&self.goal, "campaign goal", self.campaign_id)?;
        let amount = parse_stored(&self.amount, "contribution amount", self.id)?;
        let status = self
            .status
            .parse()
            .map_err(|e| ServiceError::Corrupt(format!("contribution {}: {e}", self.id)))?;
        Ok((self.campaign_id, goal, Contribution { amount, status }))
    }
}

fn parse_stored(raw: &str, what: &str, id: i64) -> Result<Amount> {
    raw.parse()
        .map_err(|e| ServiceError::Corrupt(format!("{what} of {id}: {e}")))
}

// ─────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NewCampaign {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Decimal ether, e.g. `"15"` or `"2.5"`.
    pub goal: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContribution {
    pub investor: String,
    /// Decimal ether.
    pub amount: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmRequest {
    pub tx_hash: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Views
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CampaignView {
    pub id: i64,
    pub owner: String,
    pub owner_short: String,
    pub name: String,
    pub description: String,
    pub goal: Amount,
    pub raised: Amount,
    pub goal_eth: DisplayAmount,
    pub raised_eth: DisplayAmount,
    pub remaining_eth: DisplayAmount,
    pub funding_percent: Percentage,
    pub fully_funded: bool,
    pub investors: i64,
    pub created_at: i64,
}

impl CampaignView {
    pub fn from_record(record: CampaignRecord, precision: u32) -> Result<Self> {
        let funding = record.funding()?;
        Ok(Self {
            id: record.id,
            owner_short: short_address(&record.owner, SHORT_ADDRESS_CHARS),
            owner: record.owner,
            name: record.name,
            description: record.description,
            goal: funding.goal,
            raised: funding.raised,
            goal_eth: format_ether(funding.goal),
            raised_eth: format_ether(funding.raised),
            remaining_eth: format_ether(funding.remaining()),
            funding_percent: funding.funding_percent(precision),
            fully_funded: funding.is_fully_funded(),
            investors: record.investors,
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionView {
    pub id: i64,
    pub campaign_id: i64,
    pub investor: String,
    pub investor_short: String,
    pub amount: Amount,
    pub amount_eth: DisplayAmount,
    /// Share of the campaign goal this contribution represents.
    pub equity_percent: Percentage,
    pub status: ContributionStatus,
    pub tx_hash: Option<String>,
    pub created_at: i64,
    pub settled_at: Option<i64>,
}

impl ContributionView {
    pub fn from_record(record: ContributionRecord, goal: Amount, precision: u32) -> Result<Self> {
        let contribution = record.contribution()?;
        Ok(Self {
            id: record.id,
            campaign_id: record.campaign_id,
            investor_short: short_address(&record.investor, SHORT_ADDRESS_CHARS),
            investor: record.investor,
            amount: contribution.amount,
            amount_eth: format_ether(contribution.amount),
            equity_percent: equity_percent(contribution.amount, goal, precision),
            status: contribution.status,
            tx_hash: record.tx_hash,
            created_at: record.created_at,
            settled_at: record.settled_at,
        })
    }
}
