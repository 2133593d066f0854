#[derive(thiserror::Error, Debug)]
pub enum StatsError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("malformed query file {file}: no terminal SELECT ... FROM <table> after the CTE block")]
    MalformedQuery { file: String },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("connection to database '{database}' failed: {reason}")]
    Connection { database: String, reason: String },
    #[error("query execution failed: {reason}")]
    Execution { query: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StatsError {
    /// Caller mistakes, as opposed to server or backend faults.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StatsError::NotFound(_) | StatsError::InvalidParameter(_))
    }
}
