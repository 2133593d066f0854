//! Backend-agnostic execution seam.
//!
//! Implementations open one connection per call, run the statement, fetch
//! every row and close the connection before returning, whether the
//! statement succeeded or not. No pooling, no retries.

use crate::errors::StatsError;
use crate::models::{DatabaseType, Partition, ResultRow};

#[async_trait::async_trait]
pub trait DatabaseExecutor: Send + Sync {
    fn database_type(&self) -> DatabaseType;

    /// Name of the database/schema backing a partition, for error messages.
    fn database_name(&self, partition: Partition) -> String;

    /// Execute a read statement against the partition's database.
    ///
    /// `bindings` fill the statement's `?` placeholders in order.
    async fn fetch_all(
        &self,
        partition: Partition,
        sql: &str,
        bindings: &[String],
    ) -> Result<Vec<ResultRow>, StatsError>;

    /// Table names present in the partition's database.
    async fn list_tables(&self, partition: Partition) -> Result<Vec<String>, StatsError>;

    /// Only reads go through this layer.
    fn validate_query(&self, sql: &str) -> Result<(), StatsError> {
        let head = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        match head.as_str() {
            "WITH" | "SELECT" | "SHOW" => Ok(()),
            _ => Err(StatsError::InvalidParameter(format!(
                "only read statements can be executed, got '{}'",
                head
            ))),
        }
    }
}

/// First column of each row as text; nulls are skipped.
pub(crate) fn first_column_strings(rows: &[ResultRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.values().next())
        .filter_map(|value| match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect()
}
