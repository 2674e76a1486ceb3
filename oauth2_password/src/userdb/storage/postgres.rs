use sqlx::{Pool, Postgres};

use crate::userdb::{
    errors::AccountError,
    types::{Account, AccountRow, AccountSearchField, OAuthBinding, Profile},
};

pub(super) async fn create_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), AccountError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT,
            oauth_provider_id TEXT UNIQUE,
            oauth_access_token TEXT,
            profile_name TEXT,
            profile_picture TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn find_one_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    field: &AccountSearchField,
) -> Result<Option<Account>, AccountError> {
    let (column, value) = match field {
        AccountSearchField::Id(id) => ("id", id),
        AccountSearchField::Email(email) => ("email", email),
        AccountSearchField::OAuthProviderId(id) => ("oauth_provider_id", id),
    };

    let row = sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE {column} = $1
        "#
    ))
    .bind(value)
    .fetch_optional(pool)
    .await?;

    row.map(Account::try_from).transpose()
}

pub(super) async fn insert_one_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    account: &Account,
) -> Result<(), AccountError> {
    let (provider_user_id, access_token) = match &account.oauth {
        Some(b) => (Some(&b.provider_user_id), Some(&b.access_token)),
        None => (None, None),
    };
    let (profile_name, profile_picture) = match &account.profile {
        Some(p) => (Some(&p.name), p.picture.as_ref()),
        None => (None, None),
    };

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name}
            (id, email, password_hash, oauth_provider_id, oauth_access_token,
             profile_name, profile_picture, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#
    ))
    .bind(&account.id)
    .bind(&account.email)
    .bind(&account.password_hash)
    .bind(provider_user_id)
    .bind(access_token)
    .bind(profile_name)
    .bind(profile_picture)
    .bind(account.created_at)
    .bind(account.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn update_password_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
    password_hash: &str,
) -> Result<bool, AccountError> {
    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET password_hash = $1, updated_at = $2 WHERE id = $3
        "#
    ))
    .bind(password_hash)
    .bind(chrono::Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn set_oauth_binding_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
    binding: &OAuthBinding,
    profile: &Profile,
) -> Result<bool, AccountError> {
    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name}
        SET oauth_provider_id = $1, oauth_access_token = $2,
            profile_name = $3, profile_picture = $4, updated_at = $5
        WHERE id = $6
        "#
    ))
    .bind(&binding.provider_user_id)
    .bind(&binding.access_token)
    .bind(&profile.name)
    .bind(&profile.picture)
    .bind(chrono::Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn clear_oauth_binding_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
) -> Result<bool, AccountError> {
    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name}
        SET oauth_provider_id = NULL, oauth_access_token = NULL, updated_at = $1
        WHERE id = $2 AND password_hash IS NOT NULL
        "#
    ))
    .bind(chrono::Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
