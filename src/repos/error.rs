/**
 * Responsibility
 * - What the store layer reports upwards
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict on {0}")]
    Conflict(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    // 23505 = unique_violation; the only unique column is users.username
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return StoreError::Conflict("username");
        }
        StoreError::Db(e)
    }
}
