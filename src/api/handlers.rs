use actix_web::error::QueryPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde_json::json;

use crate::api::models::{DatasetResponse, EfficiencyParams, ErrorResponse};
use crate::datasets::Dataset;
use crate::errors::StatsError;
use crate::models::Partition;
use crate::stats::StatsQueries;

pub const SERVICE_NAME: &str = "RIT Basketball Statistics API";

type HandlerResult = Result<HttpResponse, StatsError>;

impl ResponseError for StatsError {
    fn status_code(&self) -> StatusCode {
        match self {
            StatsError::NotFound(_) => StatusCode::NOT_FOUND,
            StatsError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            StatsError::NotFound(_) => "not_found",
            StatsError::InvalidParameter(_) => "invalid_parameter",
            StatsError::MalformedQuery { .. } => "malformed_query",
            StatsError::Connection { .. } => "connection_failure",
            StatsError::Execution { .. } => "query_execution_failure",
            StatsError::Io(_) | StatsError::Serialization(_) => "internal_error",
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            error: error.to_string(),
            detail: self.to_string(),
        })
    }
}

/// Undecodable query strings (`limit=abc`) get the same error envelope as
/// out-of-range values.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    StatsError::InvalidParameter(err.to_string()).into()
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn offensive_efficiency(
    stats: &StatsQueries,
    gender: &str,
    dataset: Dataset,
    params: &EfficiencyParams,
) -> HandlerResult {
    let partition: Partition = gender.parse()?;
    let (spec, filters) = params.to_spec(dataset.category())?;
    let data = stats.run(partition, dataset, Some(&spec)).await?;
    Ok(HttpResponse::Ok().json(DatasetResponse {
        success: true,
        gender: partition.to_string(),
        query: dataset.key().to_string(),
        filters: Some(filters),
        row_count: data.len(),
        data,
    }))
}

async fn fixed_dataset(stats: &StatsQueries, gender: &str, dataset: Dataset) -> HandlerResult {
    let partition: Partition = gender.parse()?;
    let data = stats.run(partition, dataset, None).await?;
    Ok(HttpResponse::Ok().json(DatasetResponse {
        success: true,
        gender: partition.to_string(),
        query: dataset.key().to_string(),
        filters: None,
        row_count: data.len(),
        data,
    }))
}

pub async fn team_offensive_efficiency(
    stats: web::Data<StatsQueries>,
    gender: web::Path<String>,
    params: web::Query<EfficiencyParams>,
) -> HandlerResult {
    offensive_efficiency(&stats, &gender, Dataset::TeamOffensiveEfficiency, &params).await
}

pub async fn player_offensive_efficiency(
    stats: web::Data<StatsQueries>,
    gender: web::Path<String>,
    params: web::Query<EfficiencyParams>,
) -> HandlerResult {
    offensive_efficiency(&stats, &gender, Dataset::PlayerOffensiveEfficiency, &params).await
}

pub async fn team_shot_location_frequency(
    stats: web::Data<StatsQueries>,
    gender: web::Path<String>,
) -> HandlerResult {
    fixed_dataset(&stats, &gender, Dataset::TeamShotLocationFrequency).await
}

pub async fn team_playtype_shot_frequency(
    stats: web::Data<StatsQueries>,
    gender: web::Path<String>,
) -> HandlerResult {
    fixed_dataset(&stats, &gender, Dataset::TeamPlayTypeShotFrequency).await
}

pub async fn player_shot_location_efficiency(
    stats: web::Data<StatsQueries>,
    gender: web::Path<String>,
) -> HandlerResult {
    fixed_dataset(&stats, &gender, Dataset::PlayerShotLocationEfficiency).await
}

pub async fn player_shot_location_frequency(
    stats: web::Data<StatsQueries>,
    gender: web::Path<String>,
) -> HandlerResult {
    fixed_dataset(&stats, &gender, Dataset::PlayerShotLocationFrequency).await
}

pub async fn player_playtype_shot_frequency(
    stats: web::Data<StatsQueries>,
    gender: web::Path<String>,
) -> HandlerResult {
    fixed_dataset(&stats, &gender, Dataset::PlayerPlayTypeShotFrequency).await
}

pub async fn play_types(stats: web::Data<StatsQueries>, gender: web::Path<String>) -> HandlerResult {
    let partition: Partition = gender.parse()?;
    let play_types = stats.available_play_types(partition).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "gender": partition.to_string(),
        "play_types": play_types,
    })))
}

pub async fn teams(stats: web::Data<StatsQueries>, gender: web::Path<String>) -> HandlerResult {
    let partition: Partition = gender.parse()?;
    let teams = stats.available_teams(partition).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "gender": partition.to_string(),
        "teams": teams,
    })))
}

pub async fn tables(stats: web::Data<StatsQueries>, gender: web::Path<String>) -> HandlerResult {
    let partition: Partition = gender.parse()?;
    let tables = stats.available_tables(partition).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "gender": partition.to_string(),
        "tables": tables,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            StatsError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            StatsError::InvalidParameter("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StatsError::MalformedQuery { file: "f".into() }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StatsError::Connection {
                database: "db".into(),
                reason: "refused".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
