//! Database layer: migrations, campaign and contribution queries, and
//! serialized settlement.
//!
//! Confirmation is the only write that touches a campaign's raised total.
//! It runs in one transaction whose first statement claims the contribution
//! (`status = 'pending'` guard), which also takes SQLite's write lock. The
//! raised total is read and rewritten after that point, so two confirmations
//! for the same campaign can never both read the same stale total.

use funding_ledger::{Amount, CampaignFunding, Contribution, ContributionStatus, LedgerError};
use sqlx::{sqlite::SqlitePoolOptions, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::errors::{Result, ServiceError};
use crate::models::{CampaignRecord, ContributionRecord, HoldingRecord};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    // Every connection to `:memory:` opens its own empty database.
    let in_memory = url.contains(":memory:");
    let create = if in_memory || url.contains('?') {
        url
    } else {
        format!("{url}?mode=rwc")
    };

    let mut options = SqlitePoolOptions::new().max_connections(5);
    if in_memory {
        options = options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = options.connect(&create).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

const CAMPAIGN_COLUMNS: &str = r#"
    c.id, c.owner, c.name, c.description, c.goal, c.raised, c.created_at,
    (SELECT COUNT(DISTINCT k.investor)
       FROM contributions k
      WHERE k.campaign_id = c.id AND k.status = 'confirmed') AS investors
"#;

const CONTRIBUTION_COLUMNS: &str =
    "id, campaign_id, investor, amount, status, tx_hash, created_at, settled_at";

// ─────────────────────────────────────────────────────────
// Campaigns
// ─────────────────────────────────────────────────────────

pub async fn insert_campaign(
    pool: &SqlitePool,
    owner: &str,
    name: &str,
    description: &str,
    goal: Amount,
) -> Result<CampaignRecord> {
    let id = sqlx::query(
        r#"
        INSERT INTO campaigns (owner, name, description, goal, raised, created_at)
        VALUES (?1, ?2, ?3, ?4, '0', ?5)
        "#,
    )
    .bind(owner)
    .bind(name)
    .bind(description)
    .bind(goal.to_string())
    .bind(now())
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_campaign(pool, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("campaign {id}")))
}

pub async fn count_campaigns(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM campaigns")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn get_campaign(pool: &SqlitePool, id: i64) -> Result<Option<CampaignRecord>> {
    let sql = format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns c WHERE c.id = ?1");
    let row = sqlx::query_as::<_, CampaignRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All campaigns, oldest first.
pub async fn list_campaigns(pool: &SqlitePool) -> Result<Vec<CampaignRecord>> {
    let sql = format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns c ORDER BY c.id ASC");
    let rows = sqlx::query_as::<_, CampaignRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Contributions
// ─────────────────────────────────────────────────────────

/// Record a new pending contribution.
pub async fn insert_contribution(
    pool: &SqlitePool,
    campaign_id: i64,
    investor: &str,
    amount: Amount,
) -> Result<ContributionRecord> {
    let id = sqlx::query(
        r#"
        INSERT INTO contributions (campaign_id, investor, amount, status, created_at)
        VALUES (?1, ?2, ?3, 'pending', ?4)
        "#,
    )
    .bind(campaign_id)
    .bind(investor)
    .bind(amount.to_string())
    .bind(now())
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_contribution(pool, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("contribution {id}")))
}

pub async fn get_contribution(pool: &SqlitePool, id: i64) -> Result<Option<ContributionRecord>> {
    let sql = format!("SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE id = ?1");
    let row = sqlx::query_as::<_, ContributionRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// A campaign's contributions, oldest first.
pub async fn contributions_for_campaign(
    pool: &SqlitePool,
    campaign_id: i64,
) -> Result<Vec<ContributionRecord>> {
    let sql = format!(
        "SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE campaign_id = ?1 ORDER BY id ASC"
    );
    let rows = sqlx::query_as::<_, ContributionRecord>(&sql)
        .bind(campaign_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Every contribution made by `investor`, with its campaign's goal.
pub async fn holdings_for_investor(
    pool: &SqlitePool,
    investor: &str,
) -> Result<Vec<HoldingRecord>> {
    let rows = sqlx::query_as::<_, HoldingRecord>(
        r#"
        SELECT k.id, k.campaign_id, c.goal, k.amount, k.status
        FROM   contributions k
        JOIN   campaigns c ON c.id = k.campaign_id
        WHERE  k.investor = ?1
        ORDER  BY k.id ASC
        "#,
    )
    .bind(investor)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// IDs of pending contributions created at or before `cutoff`.
pub async fn pending_before(pool: &SqlitePool, cutoff: i64) -> Result<Vec<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT id FROM contributions WHERE status = 'pending' AND created_at <= ?1 ORDER BY id ASC",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

// ─────────────────────────────────────────────────────────
// Settlement
// ─────────────────────────────────────────────────────────

/// Confirm a pending contribution and fold it into its campaign's raised
/// total, atomically and at most once.
pub async fn confirm_contribution(
    pool: &SqlitePool,
    id: i64,
    tx_hash: Option<&str>,
) -> Result<(ContributionRecord, CampaignRecord)> {
    let mut tx = pool.begin().await?;

    let claimed = sqlx::query(
        r#"
        UPDATE contributions
        SET    status = 'confirmed', tx_hash = COALESCE(?2, tx_hash), settled_at = ?3
        WHERE  id = ?1 AND status = 'pending'
        "#,
    )
    .bind(id)
    .bind(tx_hash)
    .bind(now())
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed == 0 {
        return Err(rejected_transition(&mut tx, id, ContributionStatus::Confirmed).await);
    }

    let record = fetch_contribution_in(&mut tx, id).await?;
    let (goal, raised_before): (String, String) =
        sqlx::query_as("SELECT goal, raised FROM campaigns WHERE id = ?1")
            .bind(record.campaign_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("campaign {}", record.campaign_id)))?;

    let mut funding = CampaignFunding::with_raised(
        parse_amount(&goal, record.campaign_id)?,
        parse_amount(&raised_before, record.campaign_id)?,
    );
    let raised = Contribution::pending(record.amount()?).confirm(&mut funding)?;

    sqlx::query("UPDATE campaigns SET raised = ?2 WHERE id = ?1")
        .bind(record.campaign_id)
        .bind(raised.to_string())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    debug!(
        contribution = id,
        campaign = record.campaign_id,
        raised = %raised,
        "contribution confirmed"
    );

    let campaign = get_campaign(pool, record.campaign_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("campaign {}", record.campaign_id)))?;
    Ok((record, campaign))
}

/// Mark a pending contribution failed. The campaign is not touched.
pub async fn fail_contribution(pool: &SqlitePool, id: i64) -> Result<ContributionRecord> {
    let mut tx = pool.begin().await?;

    let claimed = sqlx::query(
        "UPDATE contributions SET status = 'failed', settled_at = ?2 WHERE id = ?1 AND status = 'pending'",
    )
    .bind(id)
    .bind(now())
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed == 0 {
        return Err(rejected_transition(&mut tx, id, ContributionStatus::Failed).await);
    }

    let record = fetch_contribution_in(&mut tx, id).await?;
    tx.commit().await?;
    debug!(contribution = id, "contribution failed");
    Ok(record)
}

async fn fetch_contribution_in(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> Result<ContributionRecord> {
    let sql = format!("SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE id = ?1");
    sqlx::query_as::<_, ContributionRecord>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("contribution {id}")))
}

/// Explain why a guarded status update matched no row.
async fn rejected_transition(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    to: ContributionStatus,
) -> ServiceError {
    let record = match fetch_contribution_in(tx, id).await {
        Ok(record) => record,
        Err(e) => return e,
    };
    let from = match record.status() {
        Ok(status) => status,
        Err(e) => return e,
    };
    LedgerError::InvalidTransition { from, to }.into()
}

fn parse_amount(raw: &str, campaign_id: i64) -> Result<Amount> {
    raw.parse()
        .map_err(|e| ServiceError::Corrupt(format!("campaign {campaign_id}: {e}")))
}
