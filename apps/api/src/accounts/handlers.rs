use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::accounts::repository::get_all_users;
use crate::accounts::session::{login, normalize_email, require_account, signup, SessionResponse};
use crate::errors::AppError;
use crate::models::account::{AccountSummary, UserAccount};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
}

/// `?email=` query shared by the per-user read endpoints.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = normalize_email(&req.email)?;
    Ok(Json(login(&state.db, &email).await?))
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = normalize_email(&req.email)?;
    Ok(Json(signup(&state.db, &email).await?))
}

/// GET /api/v1/accounts/:email
pub async fn handle_get_account(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserAccount>, AppError> {
    let email = normalize_email(&email)?;
    Ok(Json(require_account(&state.db, &email).await?))
}

/// GET /api/v1/accounts
pub async fn handle_list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountSummary>>, AppError> {
    let accounts = get_all_users(&state.db).await?;
    Ok(Json(accounts.iter().map(AccountSummary::from).collect()))
}
