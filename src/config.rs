use std::fmt;
use std::path::PathBuf;

use log::info;

use crate::errors::StatsError;
use crate::models::Partition;

const DEFAULT_DB_PORT: u16 = 25060;
const DEFAULT_API_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:5173,http://localhost:3000,https://krebstats.com,*";

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub mens_database: String,
    pub womens_database: String,
}

impl DatabaseConfig {
    pub fn database_for(&self, partition: Partition) -> &str {
        match partition {
            Partition::Mens => &self.mens_database,
            Partition::Womens => &self.womens_database,
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("mens_database", &self.mens_database)
            .field("womens_database", &self.womens_database)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    /// Root of the static SQL store: `<queries_dir>/<partition>/<category>/<file>.sql`.
    pub queries_dir: PathBuf,
    /// Root the batch exporter writes `<partition>/<dataset>.json` under.
    pub cache_output_dir: PathBuf,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, StatsError> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!(
            "Configuration loaded: db={}:{} ({} / {}), api={}:{}",
            config.database.host,
            config.database.port,
            config.database.mens_database,
            config.database.womens_database,
            config.server.host,
            config.server.port
        );
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, StatsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            host: get("DB_HOST", "localhost"),
            port: parse_port(lookup("PORT"), "PORT", DEFAULT_DB_PORT)?,
            username: get("DB_USERNAME", "root"),
            password: get("DB_PASSWORD", ""),
            mens_database: get("MENS", "RITMensBasketball"),
            womens_database: get("WOMENS", "RITWomensBasketball"),
        };

        let server = ServerConfig {
            host: get("API_HOST", "0.0.0.0"),
            port: parse_port(lookup("API_PORT"), "API_PORT", DEFAULT_API_PORT)?,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGINS)
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        };

        Ok(Self {
            database,
            server,
            queries_dir: PathBuf::from(get("QUERIES_DIR", "queries")),
            cache_output_dir: PathBuf::from(get("CACHE_OUTPUT_DIR", "public/data/stats")),
        })
    }
}

fn parse_port(raw: Option<String>, key: &str, default: u16) -> Result<u16, StatsError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            StatsError::InvalidParameter(format!("{} must be a port number, got '{}'", key, value))
        }),
    }
}
