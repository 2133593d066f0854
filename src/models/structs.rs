use serde::{Deserialize, Serialize};

use crate::errors::StatsError;
use crate::models::enums::SortDirection;

/// One backend row: column name to scalar JSON value, in SELECT order.
pub type ResultRow = serde_json::Map<String, serde_json::Value>;

pub const DEFAULT_ORDER_BY: &str = "PLAY_COUNT";

/// Output of the extractor for one static SQL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFragment {
    /// CTE block, up to and including the closing parenthesis of the last CTE.
    pub preamble: String,
    /// Table the author's terminal SELECT read from, if one was found.
    pub result_table_name: Option<String>,
}

impl QueryFragment {
    /// Table name required for synthesizing a new terminal SELECT.
    pub fn require_table(&self, source: &str) -> Result<&str, StatsError> {
        self.result_table_name
            .as_deref()
            .ok_or_else(|| StatsError::MalformedQuery {
                file: source.to_string(),
            })
    }
}

/// Caller-supplied shape of the synthesized terminal SELECT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Explicit column list, joined verbatim. Empty means "not given".
    pub projected_columns: Vec<String>,
    /// When false and no explicit columns are given, the reduced column set is used.
    pub include_derived_columns: bool,
    pub play_type_filter: Option<Vec<String>>,
    pub team_filter: Option<String>,
    /// Substring match against PLAYER.
    pub player_filter: Option<String>,
    pub order_by_column: String,
    pub order_direction: SortDirection,
    pub row_limit: Option<u32>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            projected_columns: Vec::new(),
            include_derived_columns: true,
            play_type_filter: None,
            team_filter: None,
            player_filter: None,
            order_by_column: DEFAULT_ORDER_BY.to_string(),
            order_direction: SortDirection::Desc,
            row_limit: None,
        }
    }
}

impl QuerySpec {
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projected_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_derived(mut self, include: bool) -> Self {
        self.include_derived_columns = include;
        self
    }

    pub fn play_types<I, S>(mut self, play_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.play_type_filter = Some(play_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team_filter = Some(team.into());
        self
    }

    pub fn player(mut self, player: impl Into<String>) -> Self {
        self.player_filter = Some(player.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by_column = column.into();
        self.order_direction = direction;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.row_limit = Some(limit);
        self
    }

    /// Play types that actually constrain the result (blank entries dropped).
    pub fn active_play_types(&self) -> Vec<&str> {
        self.play_type_filter
            .iter()
            .flatten()
            .map(|pt| pt.trim())
            .filter(|pt| !pt.is_empty())
            .collect()
    }

    pub fn active_team(&self) -> Option<&str> {
        non_blank(self.team_filter.as_deref())
    }

    pub fn active_player(&self) -> Option<&str> {
        non_blank(self.player_filter.as_deref())
    }

    pub fn active_limit(&self) -> Option<u32> {
        self.row_limit.filter(|n| *n > 0)
    }

    /// Checks the parts of the spec that are interpolated as identifiers
    /// rather than bound as values.
    pub fn validate(&self) -> Result<(), StatsError> {
        if !is_valid_order_column(&self.order_by_column) {
            return Err(StatsError::InvalidParameter(format!(
                "order_by '{}' is not a column name",
                self.order_by_column
            )));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Column names such as `PLAY_COUNT`, `2P%` or an already backticked `` `3PA` ``.
pub fn is_valid_order_column(column: &str) -> bool {
    let bare = column
        .strip_prefix('`')
        .and_then(|c| c.strip_suffix('`'))
        .unwrap_or(column);
    !bare.is_empty()
        && bare
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '%')
}
