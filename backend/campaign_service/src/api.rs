//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use funding_ledger::{
    format_ether, parse_ether, Amount, FundingSummary, InvestorPortfolio, LedgerError,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::address::{normalize_address, normalize_tx_hash, short_address};
use crate::db;
use crate::errors::{Result, ServiceError};
use crate::models::{
    CampaignView, ConfirmRequest, ContributionView, NewCampaign, NewContribution,
    SHORT_ADDRESS_CHARS,
};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub percent_precision: u32,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/summary", get(funding_summary))
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/:id", get(get_campaign))
        .route(
            "/campaigns/:id/contributions",
            get(campaign_contributions).post(submit_contribution),
        )
        .route("/contributions/:id/confirm", post(confirm_contribution))
        .route("/contributions/:id/fail", post(fail_contribution))
        .route("/investors/:address/portfolio", get(investor_portfolio))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CampaignsResponse {
    pub count: usize,
    pub campaigns: Vec<CampaignView>,
}

#[derive(Serialize)]
pub struct ContributionsResponse {
    pub campaign_id: i64,
    pub count: usize,
    pub contributions: Vec<ContributionView>,
}

#[derive(Serialize)]
pub struct SettlementResponse {
    pub contribution: ContributionView,
    pub campaign: CampaignView,
}

#[derive(Serialize)]
pub struct PortfolioResponse {
    pub investor: String,
    pub investor_short: String,
    #[serde(flatten)]
    pub portfolio: InvestorPortfolio,
    pub total_invested_eth: String,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: FundingSummary,
    pub total_goal_eth: String,
    pub total_raised_eth: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Ledger(LedgerError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            ServiceError::Ledger(_) | ServiceError::InvalidInput(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Database(_)
            | ServiceError::Migrate(_)
            | ServiceError::Config(_)
            | ServiceError::Corrupt(_) => {
                error!("Request failed: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /campaigns`
pub async fn list_campaigns(State(state): State<Arc<ApiState>>) -> Result<Json<CampaignsResponse>> {
    let campaigns = db::list_campaigns(&state.pool)
        .await?
        .into_iter()
        .map(|record| CampaignView::from_record(record, state.percent_precision))
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(CampaignsResponse {
        count: campaigns.len(),
        campaigns,
    }))
}

/// `POST /campaigns`
///
/// The goal is decimal ether and must be positive.
pub async fn create_campaign(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<NewCampaign>,
) -> Result<(StatusCode, Json<CampaignView>)> {
    let owner = normalize_address(&body.owner)?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput("campaign name is required".into()));
    }
    let goal = parse_positive(&body.goal, "goal")?;

    let record =
        db::insert_campaign(&state.pool, &owner, name, body.description.trim(), goal).await?;
    info!(campaign = record.id, goal = %format_ether(goal), "campaign created");
    Ok((
        StatusCode::CREATED,
        Json(CampaignView::from_record(record, state.percent_precision)?),
    ))
}

/// `GET /campaigns/:id`
pub async fn get_campaign(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<CampaignView>> {
    let record = find_campaign(&state.pool, id).await?;
    Ok(Json(CampaignView::from_record(record, state.percent_precision)?))
}

/// `GET /campaigns/:id/contributions`
pub async fn campaign_contributions(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<ContributionsResponse>> {
    let campaign = find_campaign(&state.pool, id).await?;
    let goal = campaign.funding()?.goal;
    let contributions = db::contributions_for_campaign(&state.pool, id)
        .await?
        .into_iter()
        .map(|record| ContributionView::from_record(record, goal, state.percent_precision))
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(ContributionsResponse {
        campaign_id: id,
        count: contributions.len(),
        contributions,
    }))
}

/// `POST /campaigns/:id/contributions`
///
/// Records a pending contribution; the raised total only moves on confirm.
pub async fn submit_contribution(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(body): Json<NewContribution>,
) -> Result<(StatusCode, Json<ContributionView>)> {
    let campaign = find_campaign(&state.pool, id).await?;
    let investor = normalize_address(&body.investor)?;
    let amount = parse_positive(&body.amount, "amount")?;

    let record = db::insert_contribution(&state.pool, id, &investor, amount).await?;
    info!(
        contribution = record.id,
        campaign = id,
        amount = %format_ether(amount),
        "contribution submitted"
    );
    let goal = campaign.funding()?.goal;
    Ok((
        StatusCode::CREATED,
        Json(ContributionView::from_record(
            record,
            goal,
            state.percent_precision,
        )?),
    ))
}

/// `POST /contributions/:id/confirm`
pub async fn confirm_contribution(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    body: Option<Json<ConfirmRequest>>,
) -> Result<Json<SettlementResponse>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let tx_hash = request
        .tx_hash
        .as_deref()
        .map(normalize_tx_hash)
        .transpose()?;

    let (record, campaign) = db::confirm_contribution(&state.pool, id, tx_hash.as_deref()).await?;
    info!(contribution = id, campaign = campaign.id, "contribution confirmed");
    settlement(record, campaign, state.percent_precision).map(Json)
}

/// `POST /contributions/:id/fail`
pub async fn fail_contribution(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<SettlementResponse>> {
    let record = db::fail_contribution(&state.pool, id).await?;
    let campaign = find_campaign(&state.pool, record.campaign_id).await?;
    info!(contribution = id, campaign = campaign.id, "contribution failed");
    settlement(record, campaign, state.percent_precision).map(Json)
}

/// `GET /investors/:address/portfolio`
pub async fn investor_portfolio(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<PortfolioResponse>> {
    let investor = normalize_address(&address)?;
    let entries = db::holdings_for_investor(&state.pool, &investor)
        .await?
        .iter()
        .map(|h| h.entry())
        .collect::<Result<Vec<_>>>()?;
    let portfolio = InvestorPortfolio::build(entries, state.percent_precision)?;

    Ok(Json(PortfolioResponse {
        investor_short: short_address(&investor, SHORT_ADDRESS_CHARS),
        investor,
        total_invested_eth: format_ether(portfolio.total_invested).into_string(),
        portfolio,
    }))
}

/// `GET /summary`
pub async fn funding_summary(State(state): State<Arc<ApiState>>) -> Result<Json<SummaryResponse>> {
    let fundings = db::list_campaigns(&state.pool)
        .await?
        .iter()
        .map(|c| c.funding())
        .collect::<Result<Vec<_>>>()?;
    let summary = FundingSummary::from_campaigns(&fundings, state.percent_precision)?;

    Ok(Json(SummaryResponse {
        total_goal_eth: format_ether(summary.total_goal).into_string(),
        total_raised_eth: format_ether(summary.total_raised).into_string(),
        summary,
    }))
}

// ─────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────

async fn find_campaign(pool: &SqlitePool, id: i64) -> Result<crate::models::CampaignRecord> {
    db::get_campaign(pool, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("campaign {id}")))
}

/// Parse decimal ether typed by a user; surrounding whitespace is ignored.
fn parse_positive(raw: &str, field: &str) -> Result<Amount> {
    let amount = parse_ether(raw.trim())?;
    if amount.is_zero() {
        return Err(ServiceError::InvalidInput(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(amount)
}

fn settlement(
    record: crate::models::ContributionRecord,
    campaign: crate::models::CampaignRecord,
    precision: u32,
) -> Result<SettlementResponse> {
    let goal = campaign.funding()?.goal;
    Ok(SettlementResponse {
        contribution: ContributionView::from_record(record, goal, precision)?,
        campaign: CampaignView::from_record(campaign, precision)?,
    })
}
