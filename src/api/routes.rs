use actix_web::web;

use crate::api::handlers;

/// Registers every endpoint:
/// - GET / - health check
/// - GET /api/stats/{gender}/teams/... and /players/... - datasets
/// - GET /api/stats/{gender}/metadata/{play-types,teams,tables}
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(handlers::query_error))
        .route("/", web::get().to(handlers::health))
        .service(
            web::scope("/api/stats/{gender}")
                .service(
                    web::scope("/teams")
                        .route(
                            "/offensive-efficiency",
                            web::get().to(handlers::team_offensive_efficiency),
                        )
                        .route(
                            "/shot-location-frequency",
                            web::get().to(handlers::team_shot_location_frequency),
                        )
                        .route(
                            "/playtype-shot-frequency",
                            web::get().to(handlers::team_playtype_shot_frequency),
                        ),
                )
                .service(
                    web::scope("/players")
                        .route(
                            "/offensive-efficiency",
                            web::get().to(handlers::player_offensive_efficiency),
                        )
                        .route(
                            "/shot-location-efficiency",
                            web::get().to(handlers::player_shot_location_efficiency),
                        )
                        .route(
                            "/shot-location-frequency",
                            web::get().to(handlers::player_shot_location_frequency),
                        )
                        .route(
                            "/playtype-shot-frequency",
                            web::get().to(handlers::player_playtype_shot_frequency),
                        ),
                )
                .service(
                    web::scope("/metadata")
                        .route("/play-types", web::get().to(handlers::play_types))
                        .route("/teams", web::get().to(handlers::teams))
                        .route("/tables", web::get().to(handlers::tables)),
                ),
        );
}
