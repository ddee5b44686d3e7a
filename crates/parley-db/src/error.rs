use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to open message store: {0}")]
    Connection(String),

    #[error("invalid date format for '{field}': {value}. Please use ISO-8601 format")]
    InvalidDate { field: &'static str, value: String },

    #[error("message with ID {0} not found")]
    MessageNotFound(String),

    #[error("error parsing timestamp: {0}")]
    Timestamp(String),

    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;
