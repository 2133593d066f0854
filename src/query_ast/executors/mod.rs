pub mod mysql;
pub mod sqlite;

pub use mysql::MySqlExecutor;
pub use sqlite::SqliteExecutor;
