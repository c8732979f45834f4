use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::analysis::AnalysisResult;
use crate::models::opportunity::CareerOpportunity;
use crate::models::profile::UserData;

/// One stored record per user, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub email: String,
    pub profile: Option<UserData>,
    pub analysis: Option<AnalysisResult>,
    #[serde(default)]
    pub saved_opportunities: Vec<CareerOpportunity>,
    #[serde(default)]
    pub applied_opportunities: Vec<CareerOpportunity>,
}

impl UserAccount {
    #[cfg(test)]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            profile: None,
            analysis: None,
            saved_opportunities: vec![],
            applied_opportunities: vec![],
        }
    }

    /// An account is audited once both a profile and its analysis are stored.
    pub fn is_audited(&self) -> bool {
        self.profile.is_some() && self.analysis.is_some()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserAccountRow {
    pub email: String,
    pub profile: Option<Json<UserData>>,
    pub analysis: Option<Json<AnalysisResult>>,
    pub saved_opportunities: Json<Vec<CareerOpportunity>>,
    pub applied_opportunities: Json<Vec<CareerOpportunity>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserAccountRow> for UserAccount {
    fn from(row: UserAccountRow) -> Self {
        Self {
            email: row.email,
            profile: row.profile.map(|p| p.0),
            analysis: row.analysis.map(|a| a.0),
            saved_opportunities: row.saved_opportunities.0,
            applied_opportunities: row.applied_opportunities.0,
        }
    }
}

/// Listing view used by the account index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub email: String,
    pub target_role: Option<String>,
    pub total_score: Option<u32>,
    pub saved_count: usize,
    pub applied_count: usize,
}

impl From<&UserAccount> for AccountSummary {
    fn from(account: &UserAccount) -> Self {
        Self {
            email: account.email.clone(),
            target_role: account.profile.as_ref().map(|p| p.target_role.clone()),
            total_score: account.analysis.as_ref().map(|a| a.score.total),
            saved_count: account.saved_opportunities.len(),
            applied_count: account.applied_opportunities.len(),
        }
    }
}
