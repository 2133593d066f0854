pub mod api;
pub mod config;
pub mod datasets;
pub mod directory;
pub mod errors;
pub mod export;
pub mod models;
pub mod query_ast;
pub mod stats;

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};

use crate::config::AppConfig;
use crate::directory::SqlFileStore;
use crate::query_ast::DatabaseExecutor;
use crate::query_ast::executors::MySqlExecutor;
use crate::stats::StatsQueries;

/// Installs the process logger. When `RUST_LOG` is set it is used as-is;
/// otherwise the crate logs at `level`.
pub fn init_logging(level: log::LevelFilter) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = crate_level(std::env::var_os("RUST_LOG").is_some(), level) {
        builder.filter_module("krebstats", level);
    }
    let _ = builder.is_test(false).try_init();
}

fn crate_level(rust_log_set: bool, level: log::LevelFilter) -> Option<log::LevelFilter> {
    (!rust_log_set).then_some(level)
}

/// Orchestrator over the configured MySQL backend and query directory.
pub fn stats_from_config(config: &AppConfig) -> StatsQueries {
    let executor = MySqlExecutor::new(config.database.clone());
    log::info!(
        "Backend {:?} at {}:{}",
        executor.database_type(),
        config.database.host,
        config.database.port
    );
    StatsQueries::new(SqlFileStore::new(&config.queries_dir), Arc::new(executor))
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let stats = web::Data::new(stats_from_config(&config));
    let origins = config.server.cors_allowed_origins.clone();

    log::info!(
        "Starting API on {}:{} (queries from {})",
        config.server.host,
        config.server.port,
        config.queries_dir.display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(stats.clone())
            .wrap(api::build_cors(&origins))
            .wrap(Logger::default())
            .configure(api::configure_routes)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
