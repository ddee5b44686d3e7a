use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Database error: {0}")]
    Db(#[from] parley_db::DbError),

    /// Message listing and context failures carry a shorter prefix.
    #[error("Error: {0}")]
    Messages(parley_db::DbError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] parley_bridge::BridgeError),

    #[error("{0}")]
    InvalidArguments(#[from] parley_core::ToolCallError),

    #[error("Invalid request: {0}")]
    MalformedRequest(serde_json::Error),

    #[error("{0} parameter is required")]
    MissingArgument(&'static str),

    #[error("JSON marshal error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;
