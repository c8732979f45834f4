//! Audit submission: orchestrates one profile audit end to end.
//!
//! Flow: normalise + validate profile → load account → store resume →
//!       AI audit (with fallback) → score → persist → return analysis.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::accounts::repository::update_user;
use crate::accounts::session::{normalize_email, require_account};
use crate::audit::engine::{build_analysis, run_audit, ProfileAuditor};
use crate::catalog::apply_milestones;
use crate::errors::AppError;
use crate::models::account::UserAccount;
use crate::models::analysis::AnalysisResult;
use crate::models::profile::UserData;
use crate::profile::storage::store_resume;
use crate::profile::validation::{decode_resume, normalize_profile, validate_profile};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    pub email: String,
    pub profile: UserData,
    /// Milestone board selections, merged into the profile's role lists.
    #[serde(default)]
    pub milestone_ids: Vec<String>,
}

/// Merges milestone selections, normalises and validates the submitted profile.
pub fn prepare_profile(profile: UserData, milestone_ids: &[String]) -> Result<UserData, AppError> {
    let mut profile = profile;
    if !milestone_ids.is_empty() {
        let selection = apply_milestones(milestone_ids)?;
        profile.experience_roles.extend(selection.experience_roles);
        profile.leadership_types.extend(selection.leadership_types);
    }

    let profile = normalize_profile(profile);
    validate_profile(&profile)?;
    Ok(profile)
}

/// A resubmitted profile that still claims an uploaded resume, but carries
/// no new file, keeps the previously stored object.
fn carry_over_resume(profile: &mut UserData, previous: Option<&UserData>) {
    if profile.resume_uploaded && profile.resume_storage_key.is_none() {
        if let Some(prev) = previous {
            profile.resume_storage_key = prev.resume_storage_key.clone();
            if profile.resume_mime_type.is_none() {
                profile.resume_mime_type = prev.resume_mime_type.clone();
            }
        }
    }
}

/// Records a finished audit on the current version of the account. Only the
/// profile and analysis change; saved and applied lists are left as found.
pub fn apply_audit(account: &mut UserAccount, profile: &UserData, analysis: &AnalysisResult) {
    account.profile = Some(profile.without_inline_resume());
    account.analysis = Some(analysis.clone());
}

pub async fn submit_audit(
    pool: &PgPool,
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    auditor: &dyn ProfileAuditor,
    request: AuditRequest,
) -> Result<AnalysisResult, AppError> {
    let email = normalize_email(&request.email)?;
    let mut profile = prepare_profile(request.profile, &request.milestone_ids)?;
    let account = require_account(pool, &email).await?;

    match decode_resume(&profile)? {
        Some(upload) => {
            profile.resume_storage_key = Some(store_resume(s3, s3_bucket, &email, upload).await?);
        }
        None => carry_over_resume(&mut profile, account.profile.as_ref()),
    }

    info!("Auditing profile for {email} (target: {})", profile.target_role);
    let audit = run_audit(auditor, &profile).await;
    let analysis = build_analysis(&profile, audit);
    info!("Readiness score for {email}: {}/100", analysis.score.total);

    // The audit can take minutes; merge into whatever is stored now.
    update_user(pool, &email, |current| {
        apply_audit(current, &profile, &analysis);
        true
    })
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Account {email} not found")))?;

    Ok(analysis)
}
