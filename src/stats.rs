//! Query orchestration: load a static query file, keep its CTE block, swap
//! its terminal SELECT and run the result against the partition's database.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, error, info};
use serde_json::Value;

use crate::datasets::{Dataset, Terminal};
use crate::directory::SqlFileStore;
use crate::errors::StatsError;
use crate::models::{Partition, QueryFragment, QuerySpec, ResultRow};
use crate::query_ast::{self, DatabaseExecutor, SelectStatement};

const PLAY_TYPES_SQL: &str = "SELECT DISTINCT
    CASE
        WHEN secondary_play IS NULL THEN primary_play
        ELSE secondary_play
    END AS play_type
FROM plays_table_denorm_extra
WHERE conference = 'Liberty League'
ORDER BY play_type";

const TEAMS_SQL: &str = "SELECT DISTINCT primary_team AS team
FROM plays_table_denorm_extra
WHERE conference = 'Liberty League'
ORDER BY team";

/// A dataset statement ready to execute.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub dataset: Dataset,
    pub partition: Partition,
    pub fragment: QueryFragment,
    pub terminal: SelectStatement,
    /// Preamble and terminal joined, with `?` placeholders.
    pub sql: String,
}

impl CompiledQuery {
    pub fn bindings(&self) -> &[String] {
        self.terminal.bindings()
    }

    /// Combined statement with literals inlined, for diagnostics.
    pub fn inline_sql(&self) -> String {
        query_ast::combine(&self.fragment.preamble, self.terminal.inline())
    }
}

#[derive(Clone)]
pub struct StatsQueries {
    store: SqlFileStore,
    executor: Arc<dyn DatabaseExecutor>,
}

impl StatsQueries {
    pub fn new(store: SqlFileStore, executor: Arc<dyn DatabaseExecutor>) -> Self {
        Self { store, executor }
    }

    /// Builds the hybrid statement for a dataset. `spec` is ignored by
    /// fixed datasets; dynamic datasets fall back to the default spec.
    pub fn compile(
        &self,
        partition: Partition,
        dataset: Dataset,
        spec: Option<&QuerySpec>,
    ) -> Result<CompiledQuery, StatsError> {
        let raw = self
            .store
            .load(partition, dataset.category(), dataset.file_name())?;
        let fragment = query_ast::extract(&raw);

        let terminal = match dataset.terminal() {
            Terminal::Dynamic { reduced_columns } => {
                let table = fragment.require_table(&dataset.source())?;
                let mut spec = spec.cloned().unwrap_or_default();
                spec.validate()?;
                if !spec.include_derived_columns && spec.projected_columns.is_empty() {
                    spec.projected_columns = reduced_columns.iter().map(|c| c.to_string()).collect();
                }
                query_ast::synthesize(table, &spec)
            }
            Terminal::Fixed { table, order_by } => {
                let table = fragment.result_table_name.as_deref().unwrap_or(table);
                SelectStatement::fixed(table, order_by)
            }
        };

        let sql = query_ast::combine(&fragment.preamble, terminal.sql());
        debug!(
            "{} [{}]: result table {:?}, bindings {:?}\n{}",
            dataset,
            partition,
            fragment.result_table_name,
            terminal.bindings(),
            sql
        );

        Ok(CompiledQuery {
            dataset,
            partition,
            fragment,
            terminal,
            sql,
        })
    }

    pub async fn run(
        &self,
        partition: Partition,
        dataset: Dataset,
        spec: Option<&QuerySpec>,
    ) -> Result<Vec<ResultRow>, StatsError> {
        let compiled = self.compile(partition, dataset, spec)?;
        self.execute(&compiled).await
    }

    pub async fn execute(&self, compiled: &CompiledQuery) -> Result<Vec<ResultRow>, StatsError> {
        self.executor.validate_query(&compiled.sql)?;
        match self
            .executor
            .fetch_all(compiled.partition, &compiled.sql, compiled.bindings())
            .await
        {
            Ok(rows) => {
                info!(
                    "{} [{}]: {} rows",
                    compiled.dataset,
                    compiled.partition,
                    rows.len()
                );
                Ok(rows)
            }
            Err(e) => {
                error!("{} [{}] failed: {}", compiled.dataset, compiled.partition, e);
                Err(e)
            }
        }
    }

    pub async fn team_offensive_efficiency(
        &self,
        partition: Partition,
        spec: &QuerySpec,
    ) -> Result<Vec<ResultRow>, StatsError> {
        self.run(partition, Dataset::TeamOffensiveEfficiency, Some(spec))
            .await
    }

    pub async fn player_offensive_efficiency(
        &self,
        partition: Partition,
        spec: &QuerySpec,
    ) -> Result<Vec<ResultRow>, StatsError> {
        self.run(partition, Dataset::PlayerOffensiveEfficiency, Some(spec))
            .await
    }

    pub async fn team_shot_location_frequency(
        &self,
        partition: Partition,
    ) -> Result<Vec<ResultRow>, StatsError> {
        self.run(partition, Dataset::TeamShotLocationFrequency, None)
            .await
    }

    pub async fn team_playtype_shot_frequency(
        &self,
        partition: Partition,
    ) -> Result<Vec<ResultRow>, StatsError> {
        self.run(partition, Dataset::TeamPlayTypeShotFrequency, None)
            .await
    }

    pub async fn player_shot_location_efficiency(
        &self,
        partition: Partition,
    ) -> Result<Vec<ResultRow>, StatsError> {
        self.run(partition, Dataset::PlayerShotLocationEfficiency, None)
            .await
    }

    pub async fn player_shot_location_frequency(
        &self,
        partition: Partition,
    ) -> Result<Vec<ResultRow>, StatsError> {
        self.run(partition, Dataset::PlayerShotLocationFrequency, None)
            .await
    }

    pub async fn player_playtype_shot_frequency(
        &self,
        partition: Partition,
    ) -> Result<Vec<ResultRow>, StatsError> {
        self.run(partition, Dataset::PlayerPlayTypeShotFrequency, None)
            .await
    }

    /// Distinct play types seen in Liberty League games, sorted.
    pub async fn available_play_types(&self, partition: Partition) -> Result<Vec<String>, StatsError> {
        self.distinct_values(partition, "play_type", PLAY_TYPES_SQL).await
    }

    /// Distinct Liberty League teams, sorted.
    pub async fn available_teams(&self, partition: Partition) -> Result<Vec<String>, StatsError> {
        self.distinct_values(partition, "team", TEAMS_SQL).await
    }

    pub async fn available_tables(&self, partition: Partition) -> Result<Vec<String>, StatsError> {
        self.executor.list_tables(partition).await.inspect_err(|e| {
            error!("table listing [{}] failed: {}", partition, e);
        })
    }

    async fn distinct_values(
        &self,
        partition: Partition,
        column: &str,
        sql: &str,
    ) -> Result<Vec<String>, StatsError> {
        let rows = self
            .executor
            .fetch_all(partition, sql, &[])
            .await
            .inspect_err(|e| error!("{} lookup [{}] failed: {}", column, partition, e))?;
        let values = scalar_column(&rows, column);
        info!("{} lookup [{}]: {} values", column, partition, values.len());
        Ok(values)
    }
}

/// Non-empty values of one column, deduplicated and sorted.
fn scalar_column(rows: &[ResultRow], column: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| match row.get(column) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Null) | Some(Value::String(_)) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
