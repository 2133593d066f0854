//! Builds the terminal SELECT that replaces the one a static query file
//! shipped with.
//!
//! Filter values never enter the statement text: each one becomes a `?`
//! placeholder with a matching entry in [`SelectStatement::bindings`]. The
//! WHERE conjuncts keep a fixed order (play type, team, player).

use crate::models::QuerySpec;

/// Columns returned when derived (percentile) columns are switched off.
pub const TEAM_REDUCED_COLUMNS: [&str; 10] = [
    "PLAY_TYPE",
    "TEAM",
    "PPP",
    "`2PA`",
    "`2PM`",
    "`2P%`",
    "`3PA`",
    "`3PM`",
    "`3P%`",
    "PLAY_COUNT",
];

pub const PLAYER_REDUCED_COLUMNS: [&str; 11] = [
    "PLAY_TYPE",
    "PLAYER",
    "TEAM",
    "PPP",
    "`2PA`",
    "`2PM`",
    "`2P%`",
    "`3PA`",
    "`3PM`",
    "`3P%`",
    "PLAY_COUNT",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    sql: String,
    bindings: Vec<String>,
    inline_sql: String,
}

impl SelectStatement {
    /// A terminal SELECT with no caller input in it.
    pub fn fixed(table_name: &str, order_by: &str) -> Self {
        let sql = format!("SELECT * FROM {} ORDER BY {}", table_name, order_by);
        Self {
            inline_sql: sql.clone(),
            sql,
            bindings: Vec::new(),
        }
    }

    /// Statement text with `?` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Placeholder values, in placeholder order.
    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    /// The same statement with quoted literals in place of placeholders.
    /// Meant for logs and debugging output, not for execution.
    pub fn inline(&self) -> &str {
        &self.inline_sql
    }
}

struct Predicate {
    sql: String,
    inline: String,
    values: Vec<String>,
}

pub fn synthesize(table_name: &str, spec: &QuerySpec) -> SelectStatement {
    let columns = if !spec.projected_columns.is_empty() {
        spec.projected_columns.join(", ")
    } else if !spec.include_derived_columns {
        TEAM_REDUCED_COLUMNS.join(", ")
    } else {
        "*".to_string()
    };

    let mut predicates = Vec::new();

    let play_types = spec.active_play_types();
    if !play_types.is_empty() {
        let placeholders = vec!["?"; play_types.len()].join(", ");
        let literals = play_types
            .iter()
            .map(|pt| quote_string(pt))
            .collect::<Vec<_>>()
            .join(", ");
        predicates.push(Predicate {
            sql: format!("PLAY_TYPE IN ({})", placeholders),
            inline: format!("PLAY_TYPE IN ({})", literals),
            values: play_types.iter().map(|pt| pt.to_string()).collect(),
        });
    }

    if let Some(team) = spec.active_team() {
        predicates.push(Predicate {
            sql: "TEAM = ?".to_string(),
            inline: format!("TEAM = {}", quote_string(team)),
            values: vec![team.to_string()],
        });
    }

    if let Some(player) = spec.active_player() {
        let pattern = format!("%{}%", player);
        predicates.push(Predicate {
            sql: "PLAYER LIKE ?".to_string(),
            inline: format!("PLAYER LIKE {}", quote_string(&pattern)),
            values: vec![pattern],
        });
    }

    let (where_sql, where_inline) = if predicates.is_empty() {
        (String::new(), String::new())
    } else {
        (
            format!("WHERE {}", join_predicates(&predicates, |p| p.sql.as_str())),
            format!("WHERE {}", join_predicates(&predicates, |p| p.inline.as_str())),
        )
    };

    let order_clause = format!(
        "ORDER BY {} {}",
        quote_column(&spec.order_by_column),
        spec.order_direction.as_sql()
    );
    let limit_clause = spec
        .active_limit()
        .map(|n| format!("LIMIT {}", n))
        .unwrap_or_default();

    let select_clause = format!("SELECT {}", columns);
    let from_clause = format!("FROM {}", table_name);
    let assemble = |where_clause: &str| {
        [
            select_clause.as_str(),
            from_clause.as_str(),
            where_clause,
            order_clause.as_str(),
            limit_clause.as_str(),
        ]
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
    };

    SelectStatement {
        sql: assemble(&where_sql),
        inline_sql: assemble(&where_inline),
        bindings: predicates.into_iter().flat_map(|p| p.values).collect(),
    }
}

fn join_predicates<'a>(predicates: &'a [Predicate], part: impl Fn(&'a Predicate) -> &'a str) -> String {
    predicates.iter().map(part).collect::<Vec<_>>().join(" AND ")
}

fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Plain identifiers pass through; `2P%`-style names get backticks.
fn quote_column(column: &str) -> String {
    let already_quoted = column.len() >= 2 && column.starts_with('`') && column.ends_with('`');
    let plain = column
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if already_quoted || plain {
        column.to_string()
    } else {
        format!("`{}`", column.replace('`', "``"))
    }
}
