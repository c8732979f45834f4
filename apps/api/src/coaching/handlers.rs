use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::accounts::handlers::EmailQuery;
use crate::accounts::session::{normalize_email, require_account};
use crate::coaching::chat::{send_message, validate_message, welcome_turn, ChatReply, ChatStore, ChatTurn};
use crate::coaching::pitch::{generate_interview_prep, generate_pitch};
use crate::coaching::voice::synthesize_verdict;
use crate::errors::AppError;
use crate::opportunities::tracker::{require_audit, require_opportunity};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingText {
    pub opportunity_id: i64,
    pub text: String,
}

fn chat_store(state: &AppState) -> ChatStore {
    ChatStore::new(state.redis.clone(), state.config.chat_history_ttl_secs)
}

/// POST /api/v1/opportunities/:id/pitch
pub async fn handle_pitch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EmailQuery>,
) -> Result<Json<CoachingText>, AppError> {
    let email = normalize_email(&req.email)?;
    let account = require_account(&state.db, &email).await?;
    let (profile, analysis) = require_audit(&account)?;
    let opportunity = require_opportunity(&account, id)?;

    let text = generate_pitch(&state.llm, &opportunity, profile, analysis.score.total).await;
    Ok(Json(CoachingText {
        opportunity_id: id,
        text,
    }))
}

/// POST /api/v1/opportunities/:id/prep
pub async fn handle_interview_prep(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EmailQuery>,
) -> Result<Json<CoachingText>, AppError> {
    let email = normalize_email(&req.email)?;
    let account = require_account(&state.db, &email).await?;
    let (profile, _) = require_audit(&account)?;
    let opportunity = require_opportunity(&account, id)?;

    let text = generate_interview_prep(&state.llm, &opportunity, profile).await;
    Ok(Json(CoachingText {
        opportunity_id: id,
        text,
    }))
}

/// POST /api/v1/chat
pub async fn handle_send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let email = normalize_email(&req.email)?;
    let message = validate_message(&req.message)?;
    require_account(&state.db, &email).await?;

    let reply = send_message(&chat_store(&state), &state.llm, &email, &message).await?;
    Ok(Json(reply))
}

/// GET /api/v1/chat?email=
///
/// A session with no stored turns opens with the mentor's welcome.
pub async fn handle_get_chat(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<ChatTurn>>, AppError> {
    let email = normalize_email(&query.email)?;
    let history = chat_store(&state).history(&email).await?;
    if history.is_empty() {
        return Ok(Json(vec![welcome_turn()]));
    }
    Ok(Json(history))
}

/// DELETE /api/v1/chat?email=
pub async fn handle_reset_chat(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<StatusCode, AppError> {
    let email = normalize_email(&query.email)?;
    chat_store(&state).clear(&email).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/dashboard/verdict-audio?email=
pub async fn handle_verdict_audio(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&query.email)?;
    let account = require_account(&state.db, &email).await?;
    let (_, analysis) = require_audit(&account)?;

    let wav = synthesize_verdict(&state.llm, &analysis.verdict).await?;
    Ok(([(header::CONTENT_TYPE, "audio/wav")], Bytes::from(wav)))
}
