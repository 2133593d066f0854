//! HTTP serving layer over [`crate::stats::StatsQueries`].

pub mod handlers;
pub mod models;
pub mod routes;

use actix_cors::Cors;
use log::debug;

pub use routes::configure_routes;

/// CORS policy from the configured allow-list; `*` or an empty list allows any origin.
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default();

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
        debug!("CORS: allowing any origin");
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        debug!("CORS: allowed origins {:?}", allowed_origins);
    }

    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
