mod support;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use krebstats::api;

macro_rules! app {
    ($stats:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($stats))
                .configure(api::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn health_check() {
    let fx = support::fixture().await;
    let app = app!(fx.stats.clone());

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
}

#[actix_web::test]
async fn team_efficiency_envelope() {
    let fx = support::fixture().await;
    let app = app!(fx.stats.clone());

    let req = test::TestRequest::get()
        .uri("/api/stats/mens/teams/offensive-efficiency?play_types=Transition,%20Cut&team=RIT&order_direction=asc&limit=5")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["gender"], json!("mens"));
    assert_eq!(body["query"], json!("team-offensive-efficiency"));
    assert_eq!(body["filters"]["play_types"], json!(["Transition", "Cut"]));
    assert_eq!(body["filters"]["team"], json!("RIT"));
    assert_eq!(body["filters"]["order_direction"], json!("ASC"));
    assert_eq!(body["filters"]["limit"], json!(5));
    assert_eq!(body["row_count"], json!(2));
    assert_eq!(body["data"][0]["PLAY_COUNT"], json!(2));
}

#[actix_web::test]
async fn include_percentiles_false_uses_reduced_columns() {
    let fx = support::fixture().await;
    let app = app!(fx.stats.clone());

    let req = test::TestRequest::get()
        .uri("/api/stats/mens/teams/offensive-efficiency?include_percentiles=false")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["filters"]["include_percentiles"], json!(false));
    let first = body["data"][0].as_object().unwrap();
    assert_eq!(first.len(), 10);
    assert!(!first.contains_key("PPP_PERCENTILE"));
}

#[actix_web::test]
async fn player_efficiency_honours_player_filter() {
    let fx = support::fixture().await;
    let app = app!(fx.stats.clone());

    let req = test::TestRequest::get()
        .uri("/api/stats/mens/players/offensive-efficiency?player=Park")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["row_count"], json!(1));
    assert_eq!(body["filters"]["player"], json!("Park"));
    assert_eq!(body["data"][0]["PLAYER"], json!("Chris Park"));
}

#[actix_web::test]
async fn fixed_dataset_envelope_has_no_filters() {
    let fx = support::fixture().await;
    let app = app!(fx.stats.clone());

    let req = test::TestRequest::get()
        .uri("/api/stats/mens/teams/shot-location-frequency")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["query"], json!("team-shot-location-frequency"));
    assert_eq!(body["row_count"], json!(2));
    assert!(body.get("filters").is_none());
}

#[actix_web::test]
async fn metadata_endpoints() {
    let fx = support::fixture().await;
    let app = app!(fx.stats.clone());

    let req = test::TestRequest::get()
        .uri("/api/stats/mens/metadata/teams")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["teams"], json!(["RIT", "Vassar"]));

    let req = test::TestRequest::get()
        .uri("/api/stats/womens/metadata/play-types")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["play_types"], json!(["Spotup", "Transition"]));

    let req = test::TestRequest::get()
        .uri("/api/stats/mens/metadata/tables")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["tables"], json!(["plays_table_denorm_extra"]));
}

#[actix_web::test]
async fn error_statuses() {
    let fx = support::fixture().await;
    let app = app!(fx.stats.clone());

    let cases = [
        ("/api/stats/coed/teams/offensive-efficiency", StatusCode::NOT_FOUND, "not_found"),
        (
            "/api/stats/mens/teams/offensive-efficiency?order_direction=UP",
            StatusCode::BAD_REQUEST,
            "invalid_parameter",
        ),
        (
            "/api/stats/mens/teams/offensive-efficiency?limit=501",
            StatusCode::BAD_REQUEST,
            "invalid_parameter",
        ),
        (
            "/api/stats/mens/teams/offensive-efficiency?limit=abc",
            StatusCode::BAD_REQUEST,
            "invalid_parameter",
        ),
        (
            "/api/stats/mens/teams/offensive-efficiency?limit=-1",
            StatusCode::BAD_REQUEST,
            "invalid_parameter",
        ),
        (
            "/api/stats/mens/players/offensive-efficiency?include_percentiles=maybe",
            StatusCode::BAD_REQUEST,
            "invalid_parameter",
        ),
        (
            "/api/stats/mens/players/shot-location-frequency",
            StatusCode::NOT_FOUND,
            "not_found",
        ),
        (
            "/api/stats/womens/teams/offensive-efficiency",
            StatusCode::INTERNAL_SERVER_ERROR,
            "malformed_query",
        ),
    ];

    for (uri, status, kind) in cases {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), status, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false), "{}", uri);
        assert_eq!(body["error"], json!(kind), "{}", uri);
        assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));
    }
}
