use axum::{extract::State, Json};

use crate::audit::pipeline::{submit_audit, AuditRequest};
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;

/// POST /api/v1/audit
///
/// Scores the submitted profile, runs the AI audit and stores the merged
/// analysis on the account. Saved and applied opportunities are preserved.
pub async fn handle_submit_audit(
    State(state): State<AppState>,
    Json(request): Json<AuditRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let analysis = submit_audit(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        state.auditor.as_ref(),
        request,
    )
    .await?;
    Ok(Json(analysis))
}
