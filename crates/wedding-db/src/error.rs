use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid database url '{0}'")]
    Config(String),

    #[error("failed to open database: {0}")]
    Connection(#[source] rusqlite::Error),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error(transparent)]
    Query(rusqlite::Error),

    #[error("database connection unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt {column} '{value}' in row {id}")]
    CorruptRow {
        column: &'static str,
        id: i64,
        value: String,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
                StoreError::Constraint(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            _ => StoreError::Query(err),
        }
    }
}
