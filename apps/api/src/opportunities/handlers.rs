use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accounts::handlers::EmailQuery;
use crate::accounts::repository::update_user;
use crate::accounts::session::{normalize_email, require_account};
use crate::audit::scoring::ReadinessBand;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::models::opportunity::CareerOpportunity;
use crate::opportunities::matching::{build_deck, DeckCard};
use crate::opportunities::tracker::{
    applications_for, apply, pending_saved, remove_saved, require_audit, require_opportunity,
    swipe, ApplicationsTab, SwipeDirection,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub email: String,
    pub direction: SwipeDirection,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationsQuery {
    pub email: String,
    #[serde(default)]
    pub tab: ApplicationsTab,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub id: i64,
    pub saved: bool,
    pub saved_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub id: i64,
    /// Listing the client should open next.
    pub source_url: String,
    pub applied_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub email: String,
    pub target_role: String,
    pub readiness: ReadinessBand,
    pub salary_display: String,
    pub analysis: AnalysisResult,
    pub saved_count: usize,
    pub applied_count: usize,
    pub pending_saved: Vec<CareerOpportunity>,
}

fn account_missing(email: &str) -> AppError {
    AppError::NotFound(format!("Account {email} not found"))
}

/// GET /api/v1/dashboard?email=
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let email = normalize_email(&query.email)?;
    let account = require_account(&state.db, &email).await?;
    let (profile, analysis) = require_audit(&account)?;

    Ok(Json(DashboardResponse {
        email: account.email.clone(),
        target_role: profile.target_role.clone(),
        readiness: ReadinessBand::for_total(analysis.score.total),
        salary_display: analysis.formatted_salary(),
        analysis: analysis.clone(),
        saved_count: account.saved_opportunities.len(),
        applied_count: account.applied_opportunities.len(),
        pending_saved: pending_saved(&account.saved_opportunities, &account.applied_opportunities),
    }))
}

/// GET /api/v1/opportunities?email=
pub async fn handle_get_deck(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<DeckCard>>, AppError> {
    let email = normalize_email(&query.email)?;
    let account = require_account(&state.db, &email).await?;
    let (profile, analysis) = require_audit(&account)?;

    Ok(Json(build_deck(
        &analysis.generated_opportunities,
        &profile.skills,
        analysis.score.total,
        &account.saved_opportunities,
        &account.applied_opportunities,
    )))
}

/// POST /api/v1/opportunities/:id/swipe
pub async fn handle_swipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, AppError> {
    let email = normalize_email(&req.email)?;
    let account = require_account(&state.db, &email).await?;
    require_audit(&account)?;
    let opportunity = require_opportunity(&account, id)?;

    let mut changed = false;
    let account = update_user(&state.db, &email, |current| {
        changed = swipe(current, &opportunity, req.direction);
        changed
    })
    .await?
    .ok_or_else(|| account_missing(&email))?;
    if changed {
        info!("{email} saved opportunity {id} ({})", opportunity.company);
    }

    Ok(Json(SwipeResponse {
        id,
        saved: account.saved_opportunities.iter().any(|o| o.id == id),
        saved_count: account.saved_opportunities.len(),
    }))
}

/// POST /api/v1/opportunities/:id/apply
///
/// Records the application and hands back the listing URL to open.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(query): Json<EmailQuery>,
) -> Result<Json<ApplyResponse>, AppError> {
    let email = normalize_email(&query.email)?;
    let account = require_account(&state.db, &email).await?;
    require_audit(&account)?;
    let opportunity = require_opportunity(&account, id)?;

    let mut changed = false;
    let account = update_user(&state.db, &email, |current| {
        changed = apply(&mut current.applied_opportunities, &opportunity);
        changed
    })
    .await?
    .ok_or_else(|| account_missing(&email))?;
    if changed {
        info!("{email} applied to opportunity {id} ({})", opportunity.company);
    }

    Ok(Json(ApplyResponse {
        id,
        source_url: opportunity.source_url,
        applied_count: account.applied_opportunities.len(),
    }))
}

/// DELETE /api/v1/opportunities/:id/saved?email=
pub async fn handle_remove_saved(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<EmailQuery>,
) -> Result<StatusCode, AppError> {
    let email = normalize_email(&query.email)?;
    let account = require_account(&state.db, &email).await?;
    require_audit(&account)?;

    update_user(&state.db, &email, |current| {
        remove_saved(&mut current.saved_opportunities, id)
    })
    .await?
    .ok_or_else(|| account_missing(&email))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/applications?email=&tab=saved|applied
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationsQuery>,
) -> Result<Json<Vec<CareerOpportunity>>, AppError> {
    let email = normalize_email(&query.email)?;
    let account = require_account(&state.db, &email).await?;
    require_audit(&account)?;
    Ok(Json(applications_for(&account, query.tab)))
}
