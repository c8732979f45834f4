use std::collections::HashSet;

use serde::Serialize;

use crate::models::opportunity::CareerOpportunity;

/// Half of the match comes from skill overlap, half from overall readiness.
const SKILL_WEIGHT: f64 = 50.0;
const READINESS_WEIGHT: f64 = 50.0;

/// Match percentage (0–100) between a candidate and one listing.
///
/// Skill comparison is case-insensitive. A listing with no required skills
/// contributes nothing from the skill half.
pub fn match_score(opportunity: &CareerOpportunity, user_skills: &[String], readiness_total: u32) -> u32 {
    let owned: HashSet<String> = user_skills.iter().map(|s| s.to_lowercase()).collect();

    let skill_bonus = if opportunity.skills_req.is_empty() {
        0.0
    } else {
        let matching = opportunity
            .skills_req
            .iter()
            .filter(|s| owned.contains(&s.to_lowercase()))
            .count();
        matching as f64 / opportunity.skills_req.len() as f64 * SKILL_WEIGHT
    };
    let readiness_bonus = (readiness_total.min(100) as f64 / 100.0) * READINESS_WEIGHT;

    (skill_bonus + readiness_bonus).round() as u32
}

/// One card in the swipe deck.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCard {
    #[serde(flatten)]
    pub opportunity: CareerOpportunity,
    pub match_score: u32,
    pub meets_min_score: bool,
    pub saved: bool,
    pub applied: bool,
}

/// Builds the deck in generation order, annotated for the current user.
pub fn build_deck(
    opportunities: &[CareerOpportunity],
    user_skills: &[String],
    readiness_total: u32,
    saved: &[CareerOpportunity],
    applied: &[CareerOpportunity],
) -> Vec<DeckCard> {
    opportunities
        .iter()
        .map(|opp| DeckCard {
            match_score: match_score(opp, user_skills, readiness_total),
            meets_min_score: readiness_total as f64 >= opp.min_score_req,
            saved: saved.iter().any(|s| s.id == opp.id),
            applied: applied.iter().any(|a| a.id == opp.id),
            opportunity: opp.clone(),
        })
        .collect()
}
