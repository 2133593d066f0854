//! Query composition layer.
//!
//! A static query file is split into its CTE block and result-table name
//! ([`extractor`]), a new terminal SELECT is built for that table
//! ([`synthesizer`]), and the two are joined into one hybrid statement that an
//! [`executor::DatabaseExecutor`] runs.

pub mod executor;
pub mod executors;
pub mod extractor;
pub mod synthesizer;

pub use executor::DatabaseExecutor;
pub use extractor::extract;
pub use synthesizer::{SelectStatement, synthesize};

/// CTE block followed by the terminal statement, separated by one newline.
pub fn combine(preamble: &str, terminal: &str) -> String {
    format!("{}\n{}", preamble, terminal)
}
