//! Splits a static CTE query file into its CTE block and the name of the
//! table its terminal SELECT reads from.
//!
//! The split is heuristic: the CTE block is taken to end at the rightmost
//! closing parenthesis that is directly followed by a `SELECT ... FROM <table>`
//! running to the end of the text. Parenthesis depth is not tracked.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::QueryFragment;

static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)--.*$").expect("line comment pattern"));

// A `USE <db>` alone on its line, or `USE <db>;` anywhere. `USE INDEX (...)`
// hints are followed by `(`, so they survive.
static USE_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*USE[ \t]+`?\w+`?[ \t]*;?[ \t]*$|\bUSE\s+`?\w+`?\s*;")
        .expect("use statement pattern")
});

// Anchored at a candidate `)`; the terminal clause must reach end of text.
static TERMINAL_SELECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\A\)\s*SELECT\s+.*?FROM\s+`?(\w+)`?.*\z").expect("terminal select pattern")
});

/// Removes `--` line comments and `USE <db>;` statements, then trims.
pub fn clean(raw_sql: &str) -> String {
    let without_comments = LINE_COMMENT.replace_all(raw_sql, "");
    USE_STATEMENT
        .replace_all(&without_comments, "")
        .trim()
        .to_string()
}

pub fn extract(raw_sql: &str) -> QueryFragment {
    let cleaned = clean(raw_sql);

    for (idx, _) in cleaned.rmatch_indices(')') {
        let tail = &cleaned[idx..];
        if !starts_select(&tail[1..]) {
            continue;
        }
        if let Some(caps) = TERMINAL_SELECT.captures(tail) {
            let preamble = format!("{})", cleaned[..idx].trim_end());
            return QueryFragment {
                preamble,
                result_table_name: Some(caps[1].to_string()),
            };
        }
    }

    QueryFragment {
        preamble: cleaned,
        result_table_name: None,
    }
}

fn starts_select(text: &str) -> bool {
    let rest = text.trim_start();
    rest.len() >= 6 && rest.as_bytes()[..6].eq_ignore_ascii_case(b"SELECT")
}
