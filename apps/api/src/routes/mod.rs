pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::audit::handlers as audit;
use crate::catalog::handlers as catalog;
use crate::coaching::handlers as coaching;
use crate::opportunities::handlers as opportunities;
use crate::profile::validation::MAX_AUDIT_BODY_BYTES;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Onboarding catalog
        .route("/api/v1/catalog/roles", get(catalog::handle_list_roles))
        .route("/api/v1/catalog/milestones", get(catalog::handle_list_milestones))
        // Accounts
        .route("/api/v1/auth/login", post(accounts::handle_login))
        .route("/api/v1/auth/signup", post(accounts::handle_signup))
        .route("/api/v1/accounts", get(accounts::handle_list_accounts))
        .route("/api/v1/accounts/:email", get(accounts::handle_get_account))
        // Audit and dashboard
        .route(
            "/api/v1/audit",
            post(audit::handle_submit_audit).layer(DefaultBodyLimit::max(MAX_AUDIT_BODY_BYTES)),
        )
        .route("/api/v1/dashboard", get(opportunities::handle_get_dashboard))
        .route(
            "/api/v1/dashboard/verdict-audio",
            get(coaching::handle_verdict_audio),
        )
        // Opportunities
        .route("/api/v1/opportunities", get(opportunities::handle_get_deck))
        .route(
            "/api/v1/opportunities/:id/swipe",
            post(opportunities::handle_swipe),
        )
        .route(
            "/api/v1/opportunities/:id/apply",
            post(opportunities::handle_apply),
        )
        .route(
            "/api/v1/opportunities/:id/saved",
            delete(opportunities::handle_remove_saved),
        )
        .route("/api/v1/opportunities/:id/pitch", post(coaching::handle_pitch))
        .route(
            "/api/v1/opportunities/:id/prep",
            post(coaching::handle_interview_prep),
        )
        .route(
            "/api/v1/applications",
            get(opportunities::handle_list_applications),
        )
        // Mentor chat
        .route(
            "/api/v1/chat",
            get(coaching::handle_get_chat)
                .post(coaching::handle_send_chat)
                .delete(coaching::handle_reset_chat),
        )
        .with_state(state)
}
