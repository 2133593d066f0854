use serde::{Deserialize, Serialize};

use crate::errors::StatsError;
use crate::models::{Category, QuerySpec, ResultRow, SortDirection, structs::DEFAULT_ORDER_BY};

pub const MAX_LIMIT: u32 = 500;

/// Query string of the offensive-efficiency endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct EfficiencyParams {
    #[serde(default = "default_true")]
    pub include_percentiles: bool,
    /// Comma-separated, e.g. `Transition,PickAndRoll`.
    pub play_types: Option<String>,
    pub team: Option<String>,
    /// Only honoured by the player endpoint.
    pub player: Option<String>,
    #[serde(default = "default_order_by")]
    pub order_by: String,
    #[serde(default = "default_order_direction")]
    pub order_direction: String,
    pub limit: Option<u32>,
}

fn default_true() -> bool {
    true
}

fn default_order_by() -> String {
    DEFAULT_ORDER_BY.to_string()
}

fn default_order_direction() -> String {
    SortDirection::Desc.to_string()
}

impl Default for EfficiencyParams {
    fn default() -> Self {
        Self {
            include_percentiles: true,
            play_types: None,
            team: None,
            player: None,
            order_by: default_order_by(),
            order_direction: default_order_direction(),
            limit: None,
        }
    }
}

impl EfficiencyParams {
    /// Validates the parameters and builds the matching spec plus the
    /// filters echoed back in the response.
    pub fn to_spec(&self, category: Category) -> Result<(QuerySpec, AppliedFilters), StatsError> {
        let direction: SortDirection = self.order_direction.parse()?;

        if let Some(limit) = self.limit
            && !(1..=MAX_LIMIT).contains(&limit)
        {
            return Err(StatsError::InvalidParameter(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }

        let play_types = self.play_types.as_deref().map(split_list);
        let team = self.team.clone();
        let player = match category {
            Category::Player => self.player.clone(),
            Category::Team => None,
        };

        let mut spec = QuerySpec::default()
            .include_derived(self.include_percentiles)
            .order_by(self.order_by.trim(), direction);
        spec.play_type_filter = play_types.clone();
        spec.team_filter = team.clone();
        spec.player_filter = player.clone();
        spec.row_limit = self.limit;
        spec.validate()?;

        let filters = AppliedFilters {
            include_percentiles: self.include_percentiles,
            play_types,
            team,
            player,
            order_by: spec.order_by_column.clone(),
            order_direction: direction,
            limit: self.limit,
        };
        Ok((spec, filters))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFilters {
    pub include_percentiles: bool,
    pub play_types: Option<Vec<String>>,
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    pub order_by: String,
    pub order_direction: SortDirection,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub success: bool,
    pub gender: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<AppliedFilters>,
    pub row_count: usize,
    pub data: Vec<ResultRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_default_spec() {
        let (spec, filters) = EfficiencyParams::default().to_spec(Category::Team).unwrap();
        assert_eq!(spec, QuerySpec::default());
        assert!(filters.include_percentiles);
        assert_eq!(filters.order_direction, SortDirection::Desc);
    }

    #[test]
    fn play_types_are_split_and_trimmed() {
        let params = EfficiencyParams {
            play_types: Some(" Transition, ,PickAndRoll ".into()),
            ..Default::default()
        };
        let (spec, _) = params.to_spec(Category::Team).unwrap();
        assert_eq!(
            spec.play_type_filter,
            Some(vec!["Transition".to_string(), "PickAndRoll".to_string()])
        );
    }

    #[test]
    fn direction_is_case_insensitive() {
        let params = EfficiencyParams {
            order_direction: "asc".into(),
            ..Default::default()
        };
        let (spec, _) = params.to_spec(Category::Team).unwrap();
        assert_eq!(spec.order_direction, SortDirection::Asc);
    }

    #[test]
    fn bad_direction_and_limit_are_rejected() {
        let sideways = EfficiencyParams {
            order_direction: "SIDEWAYS".into(),
            ..Default::default()
        };
        assert!(matches!(
            sideways.to_spec(Category::Team),
            Err(StatsError::InvalidParameter(_))
        ));

        for limit in [0, 501] {
            let params = EfficiencyParams {
                limit: Some(limit),
                ..Default::default()
            };
            assert!(params.to_spec(Category::Team).is_err(), "limit {}", limit);
        }
    }

    #[test]
    fn injected_order_column_is_rejected() {
        let params = EfficiencyParams {
            order_by: "PPP; DROP TABLE plays".into(),
            ..Default::default()
        };
        assert!(params.to_spec(Category::Team).is_err());
    }

    #[test]
    fn team_endpoints_drop_the_player_filter() {
        let params = EfficiencyParams {
            player: Some("Smith".into()),
            ..Default::default()
        };
        let (team_spec, team_filters) = params.to_spec(Category::Team).unwrap();
        assert_eq!(team_spec.player_filter, None);
        assert_eq!(team_filters.player, None);

        let (player_spec, _) = params.to_spec(Category::Player).unwrap();
        assert_eq!(player_spec.player_filter.as_deref(), Some("Smith"));
    }
}
