#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("schema version `{0}` already recorded")]
    Conflict(String),

    #[error("ledger storage unavailable: {0}")]
    Unavailable(anyhow::Error),
}

impl StoreError {
    pub fn unavailable(msg: impl std::fmt::Display) -> Self {
        Self::Unavailable(anyhow::anyhow!("{msg}"))
    }
}

#[cfg(any(feature = "sqlite", feature = "pg"))]
impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        Self::Unavailable(value.into())
    }
}

#[cfg(any(feature = "sqlite", feature = "pg"))]
pub(crate) fn map_insert_error(version: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            StoreError::Conflict(version.to_owned())
        }
        err => err.into(),
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
