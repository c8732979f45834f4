use serde::Deserialize;

use crate::errors::AppError;
use crate::models::account::UserAccount;
use crate::models::analysis::AnalysisResult;
use crate::models::opportunity::CareerOpportunity;
use crate::models::profile::UserData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Pass; the card is dismissed without a trace.
    Left,
    /// Keep; the card lands in the saved list.
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationsTab {
    #[default]
    Saved,
    Applied,
}

fn track(list: &mut Vec<CareerOpportunity>, opportunity: &CareerOpportunity) -> bool {
    if list.iter().any(|o| o.id == opportunity.id) {
        return false;
    }
    list.push(opportunity.clone());
    true
}

/// Adds to the saved list unless already there. Returns whether the list changed.
pub fn save(saved: &mut Vec<CareerOpportunity>, opportunity: &CareerOpportunity) -> bool {
    track(saved, opportunity)
}

/// Records an application, idempotent by id.
pub fn apply(applied: &mut Vec<CareerOpportunity>, opportunity: &CareerOpportunity) -> bool {
    track(applied, opportunity)
}

/// Drops the opportunity with `id`. Returns whether anything was removed.
pub fn remove_saved(list: &mut Vec<CareerOpportunity>, id: i64) -> bool {
    let before = list.len();
    list.retain(|o| o.id != id);
    list.len() != before
}

/// Saved entries the user has not applied to yet.
pub fn pending_saved(saved: &[CareerOpportunity], applied: &[CareerOpportunity]) -> Vec<CareerOpportunity> {
    saved
        .iter()
        .filter(|s| !applied.iter().any(|a| a.id == s.id))
        .cloned()
        .collect()
}

pub fn applications_for(account: &UserAccount, tab: ApplicationsTab) -> Vec<CareerOpportunity> {
    match tab {
        ApplicationsTab::Saved => {
            pending_saved(&account.saved_opportunities, &account.applied_opportunities)
        }
        ApplicationsTab::Applied => account.applied_opportunities.clone(),
    }
}

/// Opportunity views stay locked until the account has been audited.
pub fn require_audit(account: &UserAccount) -> Result<(&UserData, &AnalysisResult), AppError> {
    match (&account.profile, &account.analysis) {
        (Some(profile), Some(analysis)) => Ok((profile, analysis)),
        _ => Err(AppError::AuditRequired(account.email.clone())),
    }
}

/// Looks an opportunity up in the current deck, then in the tracked lists
/// (a re-audit may have replaced the deck since it was saved).
pub fn find_opportunity(account: &UserAccount, id: i64) -> Option<CareerOpportunity> {
    account
        .analysis
        .as_ref()
        .and_then(|a| a.find_opportunity(id))
        .or_else(|| account.saved_opportunities.iter().find(|o| o.id == id))
        .or_else(|| account.applied_opportunities.iter().find(|o| o.id == id))
        .cloned()
}

pub fn require_opportunity(account: &UserAccount, id: i64) -> Result<CareerOpportunity, AppError> {
    find_opportunity(account, id)
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))
}

/// Applies a swipe. Returns whether the saved list changed.
pub fn swipe(account: &mut UserAccount, opportunity: &CareerOpportunity, direction: SwipeDirection) -> bool {
    match direction {
        SwipeDirection::Right => save(&mut account.saved_opportunities, opportunity),
        SwipeDirection::Left => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::engine::{build_analysis, fallback_audit};
    use crate::models::opportunity::OpportunityType;

    fn opportunity(id: i64) -> CareerOpportunity {
        CareerOpportunity {
            id,
            role: format!("Role {id}"),
            company: "Globex".into(),
            opportunity_type: OpportunityType::Internship,
            min_score_req: 0.0,
            skills_req: vec![],
            description: String::new(),
            source_url: format!("https://globex.example/{id}"),
            location_info: None,
        }
    }

    fn audited_account() -> UserAccount {
        let profile = UserData::default();
        let analysis = build_analysis(&profile, fallback_audit(&profile));
        UserAccount {
            profile: Some(profile),
            analysis: Some(analysis),
            ..UserAccount::new("dev@example.com")
        }
    }

    #[test]
    fn test_save_and_apply_are_idempotent() {
        let mut saved = vec![];
        assert!(save(&mut saved, &opportunity(1)));
        assert!(!save(&mut saved, &opportunity(1)));
        assert!(save(&mut saved, &opportunity(2)));
        assert_eq!(saved.len(), 2);

        let mut applied = vec![];
        assert!(apply(&mut applied, &opportunity(2)));
        assert!(!apply(&mut applied, &opportunity(2)));
        assert_eq!(applied.len(), 1);
    }

    #[test]
    fn test_remove_saved_missing_is_noop() {
        let mut list = vec![opportunity(1)];
        assert!(!remove_saved(&mut list, 5));
        assert!(remove_saved(&mut list, 1));
        assert!(list.is_empty());
    }

    #[test]
    fn test_pending_saved_excludes_applied() {
        let saved = vec![opportunity(1), opportunity(2), opportunity(3)];
        let applied = vec![opportunity(2)];
        let pending: Vec<i64> = pending_saved(&saved, &applied).iter().map(|o| o.id).collect();
        assert_eq!(pending, vec![1, 3]);
    }

    #[test]
    fn test_applications_tabs() {
        let mut account = UserAccount::new("dev@example.com");
        account.saved_opportunities = vec![opportunity(1), opportunity(2)];
        account.applied_opportunities = vec![opportunity(2), opportunity(7)];
        assert_eq!(applications_for(&account, ApplicationsTab::Saved).len(), 1);
        assert_eq!(applications_for(&account, ApplicationsTab::Applied).len(), 2);
    }

    #[test]
    fn test_require_audit_locks_fresh_account() {
        let account = UserAccount::new("dev@example.com");
        assert!(matches!(require_audit(&account), Err(AppError::AuditRequired(_))));
        assert!(require_audit(&audited_account()).is_ok());
    }

    #[test]
    fn test_find_opportunity_searches_deck_then_lists() {
        let mut account = audited_account();
        assert_eq!(find_opportunity(&account, 1).map(|o| o.company), Some("TechNova".to_string()));

        account.saved_opportunities.push(opportunity(42));
        assert_eq!(find_opportunity(&account, 42).map(|o| o.id), Some(42));
        assert!(matches!(require_opportunity(&account, 99), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_swipe_right_saves_left_skips() {
        let mut account = audited_account();
        let opp = opportunity(3);
        assert!(!swipe(&mut account, &opp, SwipeDirection::Left));
        assert!(account.saved_opportunities.is_empty());
        assert!(swipe(&mut account, &opp, SwipeDirection::Right));
        assert!(!swipe(&mut account, &opp, SwipeDirection::Right));
        assert_eq!(account.saved_opportunities.len(), 1);
    }

    #[test]
    fn test_swipe_on_current_record_keeps_concurrent_changes() {
        let snapshot = audited_account();
        let opp = require_opportunity(&snapshot, 1).unwrap();

        let mut current = snapshot.clone();
        current.applied_opportunities.push(opportunity(9));
        current.saved_opportunities.push(opportunity(8));

        assert!(swipe(&mut current, &opp, SwipeDirection::Right));
        let saved: Vec<i64> = current.saved_opportunities.iter().map(|o| o.id).collect();
        assert_eq!(saved, vec![8, 1]);
        assert_eq!(current.applied_opportunities.len(), 1);
    }

    #[test]
    fn test_direction_deserializes_snake_case() {
        let direction: SwipeDirection = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(direction, SwipeDirection::Right);
    }
}
