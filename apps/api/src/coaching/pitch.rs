//! Per-opportunity coaching text. Both generators always produce something
//! displayable: vendor failures and empty answers map to fixed fallbacks.

use tracing::warn;

use crate::coaching::prompts::{
    build_pitch_prompt, build_prep_prompt, PITCH_EMPTY_FALLBACK, PITCH_ERROR_FALLBACK,
    PREP_EMPTY_FALLBACK, PREP_ERROR_FALLBACK,
};
use crate::llm_client::{CallOptions, LlmClient, LlmError};
use crate::models::opportunity::CareerOpportunity;
use crate::models::profile::UserData;

/// Picks the text to show for a generation attempt.
pub fn resolve_generated(
    result: Result<String, LlmError>,
    empty_fallback: &str,
    error_fallback: &str,
) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) | Err(LlmError::EmptyContent) => empty_fallback.to_string(),
        Err(e) => {
            warn!("Coaching generation failed: {e}");
            error_fallback.to_string()
        }
    }
}

pub async fn generate_pitch(
    llm: &LlmClient,
    opportunity: &CareerOpportunity,
    profile: &UserData,
    total: u32,
) -> String {
    let prompt = build_pitch_prompt(opportunity, profile, total);
    let result = llm.call_text(&prompt, CallOptions::default()).await;
    resolve_generated(result, PITCH_EMPTY_FALLBACK, PITCH_ERROR_FALLBACK)
}

pub async fn generate_interview_prep(
    llm: &LlmClient,
    opportunity: &CareerOpportunity,
    profile: &UserData,
) -> String {
    let prompt = build_prep_prompt(opportunity, profile);
    let result = llm.call_text(&prompt, CallOptions::default()).await;
    resolve_generated(result, PREP_EMPTY_FALLBACK, PREP_ERROR_FALLBACK)
}
