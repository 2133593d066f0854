pub mod enums;
pub mod structs;

pub use enums::{Category, DatabaseType, Partition, SortDirection};
pub use structs::{QueryFragment, QuerySpec, ResultRow};
