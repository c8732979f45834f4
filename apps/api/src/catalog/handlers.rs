use axum::{extract::Query, Json};
use serde::Deserialize;

use crate::catalog::{milestones_in, Milestone, MilestoneCategory, CAREER_ROLES};

#[derive(Debug, Deserialize)]
pub struct MilestoneQuery {
    pub category: Option<MilestoneCategory>,
}

/// GET /api/v1/catalog/roles
pub async fn handle_list_roles() -> Json<Vec<&'static str>> {
    Json(CAREER_ROLES.to_vec())
}

/// GET /api/v1/catalog/milestones
pub async fn handle_list_milestones(Query(query): Query<MilestoneQuery>) -> Json<Vec<Milestone>> {
    Json(milestones_in(query.category))
}
