use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::StatsError;
use crate::models::{Category, Partition};

/// Read-only store of static query files laid out as
/// `<root>/<partition>/<category>/<file>`. Files are read fresh on every load.
#[derive(Debug, Clone)]
pub struct SqlFileStore {
    root: PathBuf,
}

impl SqlFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, partition: Partition, category: Category, file_name: &str) -> PathBuf {
        self.root
            .join(partition.as_str())
            .join(category.dir_name())
            .join(file_name)
    }

    pub fn load(
        &self,
        partition: Partition,
        category: Category,
        file_name: &str,
    ) -> Result<String, StatsError> {
        let path = self.path_for(partition, category, file_name);
        debug!("Loading query file {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                StatsError::NotFound(format!("query file not found: {}", path.display()))
            }
            _ => StatsError::Io(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_layout_is_partition_category_file() {
        let store = SqlFileStore::new("/srv/queries");
        assert_eq!(
            store.path_for(Partition::Womens, Category::Player, "Player-OffensiveEfficiency.sql"),
            PathBuf::from("/srv/queries/womens/player/Player-OffensiveEfficiency.sql")
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqlFileStore::new(dir.path());
        let err = store
            .load(Partition::Mens, Category::Team, "Nope.sql")
            .unwrap_err();
        assert!(matches!(err, StatsError::NotFound(_)));
    }

    #[test]
    fn loads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let team_dir = dir.path().join("mens").join("team");
        std::fs::create_dir_all(&team_dir).unwrap();
        std::fs::write(team_dir.join("q.sql"), "WITH t AS (SELECT 1) SELECT * FROM t").unwrap();

        let store = SqlFileStore::new(dir.path());
        let sql = store.load(Partition::Mens, Category::Team, "q.sql").unwrap();
        assert!(sql.starts_with("WITH t"));
    }
}
