use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::accounts::repository::{create_if_absent, get_user};
use crate::errors::AppError;
use crate::models::account::UserAccount;

/// Where the client should land after authenticating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionView {
    Onboarding,
    Dashboard,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub email: String,
    pub next_view: SessionView,
    pub created: bool,
    pub account: UserAccount,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9\-]+(\.[a-z0-9\-]+)*\.[a-z]{2,}$")
            .expect("email pattern is a valid regex")
    })
}

/// Trims and lower-cases an email address, rejecting malformed input.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Validation("email cannot be empty".to_string()));
    }
    if !email_pattern().is_match(&email) {
        return Err(AppError::Validation(format!("'{email}' is not a valid email address")));
    }
    Ok(email)
}

pub fn next_view(account: &UserAccount) -> SessionView {
    if account.is_audited() {
        SessionView::Dashboard
    } else {
        SessionView::Onboarding
    }
}

/// Creates an empty record when the email is new. A fresh account always
/// lands on onboarding.
pub async fn signup(pool: &PgPool, email: &str) -> Result<SessionResponse, AppError> {
    let existing = get_user(pool, email).await?;
    let created = existing.is_none();
    let account = match existing {
        Some(account) => account,
        None => create_if_absent(pool, email).await?,
    };

    info!("Signup for {email} (new record: {created})");
    Ok(SessionResponse {
        email: email.to_string(),
        next_view: SessionView::Onboarding,
        created,
        account,
    })
}

/// Unknown emails fall through to signup.
pub async fn login(pool: &PgPool, email: &str) -> Result<SessionResponse, AppError> {
    match get_user(pool, email).await? {
        Some(account) => {
            let view = next_view(&account);
            info!("Login for {email}, routing to {view:?}");
            Ok(SessionResponse {
                email: email.to_string(),
                next_view: view,
                created: false,
                account,
            })
        }
        None => signup(pool, email).await,
    }
}

/// Loads an account or fails with `NotFound`.
pub async fn require_account(pool: &PgPool, email: &str) -> Result<UserAccount, AppError> {
    get_user(pool, email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {email} not found")))
}
