#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tempfile::TempDir;

use krebstats::directory::SqlFileStore;
use krebstats::query_ast::executors::SqliteExecutor;
use krebstats::stats::StatsQueries;

const CREATE_PLAYS: &str = "CREATE TABLE plays_table_denorm_extra (
    primary_team TEXT,
    conference TEXT,
    primary_play TEXT,
    secondary_play TEXT,
    player TEXT,
    shot_value INTEGER,
    made INTEGER,
    points INTEGER
)";

type Play = (
    Option<&'static str>,
    &'static str,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
    Option<i64>,
    Option<i64>,
    i64,
);

// Per (play type, team): Isolation/Vassar 4 plays, Transition/RIT 3,
// Cut/RIT 2, Transition/Vassar 1. Outsider plays outside the league.
const MENS_PLAYS: &[Play] = &[
    (Some("RIT"), "Liberty League", Some("Transition"), None, Some("Alex Smith"), Some(2), Some(1), 2),
    (Some("RIT"), "Liberty League", Some("Transition"), None, Some("Alex Smith"), Some(3), Some(0), 0),
    (Some("RIT"), "Liberty League", Some("Transition"), None, Some("Alex Smith"), Some(2), Some(0), 0),
    (Some("RIT"), "Liberty League", Some("PickAndRoll"), Some("Cut"), Some("Jordan Lee"), Some(2), Some(1), 2),
    (Some("RIT"), "Liberty League", Some("PickAndRoll"), Some("Cut"), Some("Jordan Lee"), Some(3), Some(1), 3),
    (Some("Vassar"), "Liberty League", Some("Transition"), None, Some("Sam O'Neil"), Some(3), Some(1), 3),
    (Some("Vassar"), "Liberty League", Some("Isolation"), None, Some("Sam O'Neil"), Some(2), Some(0), 0),
    (Some("Vassar"), "Liberty League", Some("Isolation"), None, Some("Chris Park"), Some(2), Some(1), 2),
    (Some("Vassar"), "Liberty League", Some("Isolation"), None, Some("Chris Park"), Some(2), Some(1), 2),
    (Some("Vassar"), "Liberty League", Some("Isolation"), None, Some("Sam O'Neil"), Some(3), Some(0), 0),
    (Some("Outsider"), "Other", Some("PostUp"), None, Some("Pat Doe"), Some(2), Some(1), 2),
    (None, "Liberty League", None, None, None, None, None, 0),
];

const WOMENS_PLAYS: &[Play] = &[
    (Some("Ithaca"), "Liberty League", Some("Spotup"), None, Some("Kim Ray"), Some(3), Some(1), 3),
    (Some("Ithaca"), "Liberty League", Some("Transition"), None, Some("Kim Ray"), Some(2), Some(0), 0),
];

pub struct Fixture {
    // Owns the scratch databases for the lifetime of the test.
    pub dir: TempDir,
    pub mens_db: PathBuf,
    pub womens_db: PathBuf,
    pub stats: StatsQueries,
}

pub fn queries_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("queries")
}

pub async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let mens_db = dir.path().join("mens.db");
    let womens_db = dir.path().join("womens.db");
    seed(&mens_db, MENS_PLAYS).await;
    seed(&womens_db, WOMENS_PLAYS).await;

    let stats = stats_for(&mens_db, &womens_db);
    Fixture {
        dir,
        mens_db,
        womens_db,
        stats,
    }
}

pub fn stats_for(mens_db: &Path, womens_db: &Path) -> StatsQueries {
    StatsQueries::new(
        SqlFileStore::new(queries_dir()),
        Arc::new(SqliteExecutor::new(mens_db, womens_db)),
    )
}

async fn seed(path: &Path, plays: &[Play]) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
    sqlx::query(CREATE_PLAYS).execute(&mut conn).await.unwrap();

    for (team, conference, primary, secondary, player, shot_value, made, points) in plays {
        sqlx::query(
            "INSERT INTO plays_table_denorm_extra
             (primary_team, conference, primary_play, secondary_play, player, shot_value, made, points)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(*team)
        .bind(*conference)
        .bind(*primary)
        .bind(*secondary)
        .bind(*player)
        .bind(*shot_value)
        .bind(*made)
        .bind(*points)
        .execute(&mut conn)
        .await
        .unwrap();
    }

    conn.close().await.unwrap();
}
