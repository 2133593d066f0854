//! MySQL database executor

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row, TypeInfo, ValueRef};

use crate::config::DatabaseConfig;
use crate::errors::StatsError;
use crate::models::{DatabaseType, Partition, ResultRow};
use crate::query_ast::executor::{DatabaseExecutor, first_column_strings};

pub struct MySqlExecutor {
    config: DatabaseConfig,
}

impl MySqlExecutor {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    fn connect_options(&self, partition: Partition) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.username)
            .password(&self.config.password)
            .database(self.config.database_for(partition))
    }

    async fn connect(&self, partition: Partition) -> Result<MySqlConnection, StatsError> {
        MySqlConnection::connect_with(&self.connect_options(partition))
            .await
            .map_err(|e| StatsError::Connection {
                database: self.database_name(partition),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl DatabaseExecutor for MySqlExecutor {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    fn database_name(&self, partition: Partition) -> String {
        self.config.database_for(partition).to_string()
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

        // Released before the outcome is inspected, so failures close it too.
        if let Err(e) = conn.close().await {
            warn!(
                "MySqlExecutor: closing connection to {} failed: {}",
                self.database_name(partition),
                e
            );
        }

        let rows = fetched.map_err(|e| StatsError::Execution {
            query: sql.to_string(),
            reason: e.to_string(),
        })?;
        debug!("MySqlExecutor: {} rows from {}", rows.len(), self.database_name(partition));
        Ok(rows.iter().map(convert_mysql_row).collect())
    }

    async fn list_tables(&self, partition: Partition) -> Result<Vec<String>, StatsError> {
        let rows = self.fetch_all(partition, "SHOW TABLES", &[]).await?;
        Ok(first_column_strings(&rows))
    }
}

pub(crate) fn convert_mysql_row(row: &MySqlRow) -> ResultRow {
    let mut out = ResultRow::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name().to_ascii_uppercase();
        out.insert(column.name().to_string(), mysql_value(row, idx, &type_name));
    }
    out
}

fn mysql_value(row: &MySqlRow, idx: usize, type_name: &str) -> Value {
    match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(_) => {}
        Err(e) => {
            debug!("MySqlExecutor: column {} unreadable: {}", idx, e);
            return Value::Null;
        }
    }

    let decoded = match type_name {
        "BOOLEAN" => row.try_get::<bool, _>(idx).ok().map(Value::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" => {
            row.try_get::<i64, _>(idx).ok().map(Value::from)
        }
        t if t.ends_with("UNSIGNED") => row.try_get::<u64, _>(idx).ok().map(Value::from),
        "FLOAT" => row
            .try_get::<f32, _>(idx)
            .ok()
            .map(|v| Value::from(f64::from(v))),
        "DOUBLE" | "REAL" => row.try_get::<f64, _>(idx).ok().map(Value::from),
        "DECIMAL" | "NUMERIC" => row
            .try_get::<rust_decimal::Decimal, _>(idx)
            .ok()
            .map(decimal_value),
        "DATE" => row
            .try_get::<chrono::NaiveDate, _>(idx)
            .ok()
            .map(|v| Value::from(v.to_string())),
        "TIME" => row
            .try_get::<chrono::NaiveTime, _>(idx)
            .ok()
            .map(|v| Value::from(v.to_string())),
        "DATETIME" => row
            .try_get::<chrono::NaiveDateTime, _>(idx)
            .ok()
            .map(|v| Value::from(v.to_string())),
        "TIMESTAMP" => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(idx)
            .ok()
            .map(|v| Value::from(v.to_rfc3339())),
        _ => None,
    };

    decoded.unwrap_or_else(|| text_fallback(row, idx, type_name))
}

/// Whole decimals (SUM, COUNT over DECIMAL) become integers, the rest floats.
fn decimal_value(d: rust_decimal::Decimal) -> Value {
    if d.fract().is_zero()
        && let Some(n) = d.to_i64()
    {
        return Value::from(n);
    }
    d.to_f64()
        .map(Value::from)
        .unwrap_or_else(|| Value::from(d.to_string()))
}

fn text_fallback(row: &MySqlRow, idx: usize, type_name: &str) -> Value {
    if let Ok(s) = row.try_get::<String, _>(idx) {
        return Value::from(s);
    }
    if let Ok(mut bytes) = row.try_get::<Vec<u8>, _>(idx) {
        // Trim trailing NULs often present in BINARY padding
        while bytes.last() == Some(&0) {
            bytes.pop();
        }
        return Value::from(String::from_utf8_lossy(&bytes).into_owned());
    }
    debug!("MySqlExecutor: no conversion for column {} of type {}", idx, type_name);
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            host: "db.internal".into(),
            port: 25060,
            username: "stats".into(),
            password: "secret".into(),
            mens_database: "RITMensBasketball".into(),
            womens_database: "RITWomensBasketball".into(),
        }
    }

    #[test]
    fn test_executor_creation() {
        let executor = MySqlExecutor::new(config());
        assert_eq!(executor.database_type(), DatabaseType::MySQL);
        assert_eq!(executor.database_name(Partition::Mens), "RITMensBasketball");
        assert_eq!(executor.database_name(Partition::Womens), "RITWomensBasketball");
    }

    #[test]
    fn test_decimal_conversion() {
        let whole = rust_decimal::Decimal::from_str("42.000").unwrap();
        assert_eq!(decimal_value(whole), Value::from(42));
        let frac = rust_decimal::Decimal::from_str("0.875").unwrap();
        assert_eq!(decimal_value(frac), Value::from(0.875));
    }

    #[test]
    fn test_query_validation() {
        let executor = MySqlExecutor::new(config());
        assert!(executor.validate_query("WITH t AS (SELECT 1) SELECT * FROM t").is_ok());
        assert!(executor.validate_query("DROP TABLE plays").is_err());
    }
}
