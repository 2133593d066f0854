//! SQLite database executor (local development and tests)

use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Row, TypeInfo, ValueRef};

use crate::errors::StatsError;
use crate::models::{DatabaseType, Partition, ResultRow};
use crate::query_ast::executor::{DatabaseExecutor, first_column_strings};

const LIST_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

/// One database file per partition, opened read-only on each call.
pub struct SqliteExecutor {
    mens: PathBuf,
    womens: PathBuf,
}

impl SqliteExecutor {
    pub fn new(mens: impl Into<PathBuf>, womens: impl Into<PathBuf>) -> Self {
        Self {
            mens: mens.into(),
            womens: womens.into(),
        }
    }

    fn path_for(&self, partition: Partition) -> &PathBuf {
        match partition {
            Partition::Mens => &self.mens,
            Partition::Womens => &self.womens,
        }
    }

    async fn connect(&self, partition: Partition) -> Result<SqliteConnection, StatsError> {
        let options = SqliteConnectOptions::new()
            .filename(self.path_for(partition))
            .read_only(true);
        SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| StatsError::Connection {
                database: self.database_name(partition),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl DatabaseExecutor for SqliteExecutor {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    fn database_name(&self, partition: Partition) -> String {
        self.path_for(partition).display().to_string()
    }

    async fn fetch_all(
        &self,
        partition: Partition,
        sql: &str,
        bindings: &[String],
    ) -> Result<Vec<ResultRow>, StatsError> {
        let mut conn = self.connect(partition).await?;

        let mut query = sqlx::query(sql);
        for value in bindings {
            query = query.bind(value.as_str());
        }
        let fetched = query.fetch_all(&mut conn).await;

        if let Err(e) = conn.close().await {
            warn!(
                "SqliteExecutor: closing {} failed: {}",
                self.database_name(partition),
                e
            );
        }

        let rows = fetched.map_err(|e| StatsError::Execution {
            query: sql.to_string(),
            reason: e.to_string(),
        })?;
        debug!("SqliteExecutor: {} rows from {}", rows.len(), self.database_name(partition));
        Ok(rows.iter().map(convert_sqlite_row).collect())
    }

    async fn list_tables(&self, partition: Partition) -> Result<Vec<String>, StatsError> {
        let rows = self.fetch_all(partition, LIST_TABLES_SQL, &[]).await?;
        Ok(first_column_strings(&rows))
    }
}

fn convert_sqlite_row(row: &SqliteRow) -> ResultRow {
    let mut out = ResultRow::new();
    for (idx, column) in row.columns().iter().enumerate() {
        out.insert(column.name().to_string(), sqlite_value(row, idx));
    }
    out
}

// Dispatch on the stored value's class: expression columns have no declared type.
fn sqlite_value(row: &SqliteRow, idx: usize) -> Value {
    let storage_class = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_ascii_uppercase(),
        Err(e) => {
            debug!("SqliteExecutor: column {} unreadable: {}", idx, e);
            return Value::Null;
        }
    };

    let decoded = match storage_class.as_str() {
        "INTEGER" => row.try_get::<i64, _>(idx).ok().map(Value::from),
        "REAL" => row.try_get::<f64, _>(idx).ok().map(Value::from),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(idx)
            .ok()
            .map(|bytes| Value::from(String::from_utf8_lossy(&bytes).into_owned())),
        _ => row.try_get::<String, _>(idx).ok().map(Value::from),
    };

    decoded.unwrap_or(Value::Null)
}
