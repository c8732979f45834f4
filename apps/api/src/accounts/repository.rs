use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use tracing::info;

use crate::models::account::{UserAccount, UserAccountRow};

/// Returns the stored record for `email`, if any.
pub async fn get_user(pool: &PgPool, email: &str) -> Result<Option<UserAccount>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserAccountRow>("SELECT * FROM user_accounts WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(UserAccount::from))
}

/// Writes the whole record, replacing any previous version for the same email.
///
/// Writing back a record read earlier overwrites concurrent changes; use
/// `update_user` for read-modify-write.
pub async fn save_user<'e, E>(executor: E, account: &UserAccount) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO user_accounts
            (email, profile, analysis, saved_opportunities, applied_opportunities)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET
            profile = EXCLUDED.profile,
            analysis = EXCLUDED.analysis,
            saved_opportunities = EXCLUDED.saved_opportunities,
            applied_opportunities = EXCLUDED.applied_opportunities,
            updated_at = NOW()
        "#,
    )
    .bind(&account.email)
    .bind(account.profile.as_ref().map(Json))
    .bind(account.analysis.as_ref().map(Json))
    .bind(Json(&account.saved_opportunities))
    .bind(Json(&account.applied_opportunities))
    .execute(executor)
    .await?;

    info!("Saved account record for {}", account.email);
    Ok(())
}

/// Locks the record, applies `mutate` to the current version and writes it
/// back when `mutate` reports a change. Returns the resulting record, or
/// `None` when no record exists for `email`.
pub async fn update_user<F>(
    pool: &PgPool,
    email: &str,
    mutate: F,
) -> Result<Option<UserAccount>, sqlx::Error>
where
    F: FnOnce(&mut UserAccount) -> bool,
{
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, UserAccountRow>(
        "SELECT * FROM user_accounts WHERE email = $1 FOR UPDATE",
    )
    .bind(email)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Ok(None);
    };

    let mut account = UserAccount::from(row);
    if mutate(&mut account) {
        save_user(&mut *tx, &account).await?;
    }
    tx.commit().await?;

    Ok(Some(account))
}

/// Every stored record, oldest first.
pub async fn get_all_users(pool: &PgPool) -> Result<Vec<UserAccount>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserAccountRow>(
        "SELECT * FROM user_accounts ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(UserAccount::from).collect())
}

/// Inserts an empty record unless one exists, then returns the stored record.
pub async fn create_if_absent(pool: &PgPool, email: &str) -> Result<UserAccount, sqlx::Error> {
    let inserted = sqlx::query(
        "INSERT INTO user_accounts (email) VALUES ($1) ON CONFLICT (email) DO NOTHING",
    )
    .bind(email)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        info!("Created account record for {email}");
    }

    get_user(pool, email)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}
