//! Catalog of the statistical reports served per partition.

use std::fmt;

use crate::models::Category;
use crate::query_ast::synthesizer::{PLAYER_REDUCED_COLUMNS, TEAM_REDUCED_COLUMNS};

/// How a dataset's terminal SELECT is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// Synthesized from a `QuerySpec`. `reduced_columns` replaces the
    /// projection when derived columns are switched off.
    Dynamic {
        reduced_columns: &'static [&'static str],
    },
    /// `SELECT * FROM <table> ORDER BY <order_by>`; filters are not supported.
    Fixed {
        table: &'static str,
        order_by: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    TeamOffensiveEfficiency,
    TeamShotLocationFrequency,
    TeamPlayTypeShotFrequency,
    PlayerOffensiveEfficiency,
    PlayerShotLocationEfficiency,
    PlayerShotLocationFrequency,
    PlayerPlayTypeShotFrequency,
}

impl Dataset {
    pub const ALL: [Dataset; 7] = [
        Dataset::TeamOffensiveEfficiency,
        Dataset::TeamShotLocationFrequency,
        Dataset::TeamPlayTypeShotFrequency,
        Dataset::PlayerOffensiveEfficiency,
        Dataset::PlayerShotLocationEfficiency,
        Dataset::PlayerShotLocationFrequency,
        Dataset::PlayerPlayTypeShotFrequency,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Dataset::TeamOffensiveEfficiency => "team-offensive-efficiency",
            Dataset::TeamShotLocationFrequency => "team-shot-location-frequency",
            Dataset::TeamPlayTypeShotFrequency => "team-playtype-shot-frequency",
            Dataset::PlayerOffensiveEfficiency => "player-offensive-efficiency",
            Dataset::PlayerShotLocationEfficiency => "player-shot-location-efficiency",
            Dataset::PlayerShotLocationFrequency => "player-shot-location-frequency",
            Dataset::PlayerPlayTypeShotFrequency => "player-playtype-shot-frequency",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Dataset::TeamOffensiveEfficiency
            | Dataset::TeamShotLocationFrequency
            | Dataset::TeamPlayTypeShotFrequency => Category::Team,
            Dataset::PlayerOffensiveEfficiency
            | Dataset::PlayerShotLocationEfficiency
            | Dataset::PlayerShotLocationFrequency
            | Dataset::PlayerPlayTypeShotFrequency => Category::Player,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::TeamOffensiveEfficiency => "Team-OffensiveEfficiency.sql",
            Dataset::TeamShotLocationFrequency => "Team-ShotLocation-FreqDist.sql",
            Dataset::TeamPlayTypeShotFrequency => "Team-PlayType-ShotLocation-FreqDist.sql",
            Dataset::PlayerOffensiveEfficiency => "Player-OffensiveEfficiency.sql",
            Dataset::PlayerShotLocationEfficiency => "Player-ShotLocation-EffDist.sql",
            Dataset::PlayerShotLocationFrequency => "Player-ShotLocation-FreqDist.sql",
            Dataset::PlayerPlayTypeShotFrequency => "Player-PlayType-ShotLocation-FreqDist.sql",
        }
    }

    pub fn terminal(&self) -> Terminal {
        match self {
            Dataset::TeamOffensiveEfficiency => Terminal::Dynamic {
                reduced_columns: &TEAM_REDUCED_COLUMNS,
            },
            Dataset::PlayerOffensiveEfficiency => Terminal::Dynamic {
                reduced_columns: &PLAYER_REDUCED_COLUMNS,
            },
            Dataset::TeamShotLocationFrequency => Terminal::Fixed {
                table: "team_shot_frequency",
                order_by: "TOTAL_SHOTS DESC",
            },
            Dataset::TeamPlayTypeShotFrequency => Terminal::Fixed {
                table: "team_playtype_shot_frequency",
                order_by: "TEAM, TOTAL_SHOTS DESC",
            },
            Dataset::PlayerShotLocationEfficiency => Terminal::Fixed {
                table: "shot_percentiles",
                order_by: "(LAYUP_PLAYS + CLOSE_PLAYS + MID_PLAYS + THREE_PLAYS) DESC",
            },
            Dataset::PlayerShotLocationFrequency => Terminal::Fixed {
                table: "shot_frequency",
                order_by: "TOTAL_SHOTS DESC",
            },
            Dataset::PlayerPlayTypeShotFrequency => Terminal::Fixed {
                table: "player_playtype_shot_frequency",
                order_by: "PLAYER, TOTAL_SHOTS DESC",
            },
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.terminal(), Terminal::Dynamic { .. })
    }

    pub fn description(&self) -> &'static str {
        match self {
            Dataset::TeamOffensiveEfficiency => {
                "Team offensive efficiency by play type with shooting percentages, PPP, and percentile rankings"
            }
            Dataset::TeamShotLocationFrequency => {
                "Team shot distribution showing percentage of shots from each court zone"
            }
            Dataset::TeamPlayTypeShotFrequency => {
                "Team shot distribution by play type, showing where teams shoot from on different offensive actions"
            }
            Dataset::PlayerOffensiveEfficiency => {
                "Player offensive efficiency by play type with shooting percentages, PPP, and percentile rankings"
            }
            Dataset::PlayerShotLocationEfficiency => {
                "Player shooting efficiency from different court areas (Layup, Close, Mid-Range, 3P) with percentile rankings"
            }
            Dataset::PlayerShotLocationFrequency => {
                "Player shot distribution showing percentage of shots from each court zone"
            }
            Dataset::PlayerPlayTypeShotFrequency => {
                "Shot distribution by play type, showing where players shoot from on different offensive actions"
            }
        }
    }

    /// `<category>/<file>` relative to a partition root.
    pub fn source(&self) -> String {
        format!("{}/{}", self.category().dir_name(), self.file_name())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
