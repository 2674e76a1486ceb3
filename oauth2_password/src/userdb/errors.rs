use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountError {
    #[error("Account not found")]
    NotFound,

    /// A unique column already holds this value. Carries the column name.
    #[error("Duplicate value for unique field: {0}")]
    Duplicate(String),

    #[error("Invalid account data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = if db_err.message().contains("email") {
                    "email"
                } else {
                    "oauth_provider_id"
                };
                return Self::Duplicate(field.to_string());
            }
        }
        Self::Storage(err.to_string())
    }
}
