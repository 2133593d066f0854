use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::StatsError;

/// Gender-scoped namespace. Each partition owns its own SQL files and its
/// own backend database; queries never cross partitions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Mens,
    Womens,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Partition::Mens, Partition::Womens];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Mens => "mens",
            Partition::Womens => "womens",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = StatsError;

    // Path segments are matched exactly; "Mens" is not a partition.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mens" => Ok(Partition::Mens),
            "womens" => Ok(Partition::Womens),
            other => Err(StatsError::NotFound(format!(
                "unknown gender partition '{}': expected 'mens' or 'womens'",
                other
            ))),
        }
    }
}

/// Second level of the static SQL store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    Team,
    Player,
}

impl Category {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Team => "team",
            Category::Player => "player",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[default]
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDirection {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(StatsError::InvalidParameter(
                "order_direction must be 'ASC' or 'DESC'".to_string(),
            )),
        }
    }
}

/// Relational backends an executor can speak to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DatabaseType {
    MySQL,
    SQLite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_round_trips_through_path_segment() {
        for p in Partition::ALL {
            assert_eq!(p.as_str().parse::<Partition>().unwrap(), p);
        }
    }

    #[test]
    fn unknown_partition_is_not_found() {
        let err = "coed".parse::<Partition>().unwrap_err();
        assert!(matches!(err, StatsError::NotFound(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn sort_direction_is_case_insensitive() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!(" DESC ".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }
}
