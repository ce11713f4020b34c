use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::api::AppState;
use crate::error::PipelineError;
use crate::query::{
    query_observations, query_stats, ObservationFilter, ObservationView, Page, Paginated,
    StatsFilter, StatsView,
};

/// Query string of `GET /weather`. Values stay raw so that bad input can be
/// reported with a specific message.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub station_id: Option<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Query string of `GET /weather/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub station_id: Option<String>,
    pub year: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Handler error: client mistakes become 400, everything else 500.
#[derive(Debug)]
pub struct ApiError(pub PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(PipelineError::invalid_query("query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_client_error() {
            debug!(error = %self.0, "Rejected query");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": self.0.to_string() }))).into_response()
        } else {
            error!(error = %self.0, "Query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

/// GET /weather
pub async fn weather_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Json<Paginated<ObservationView>>, ApiError> {
    let Query(params) = params?;
    let filter = ObservationFilter::from_params(
        params.station_id.as_deref(),
        params.date.as_deref(),
        params.start_date.as_deref(),
        params.end_date.as_deref(),
    )?;
    let page = Page::from_params(params.limit.as_deref(), params.offset.as_deref());

    let result = query_observations(&state.db, &filter, page).await?;
    Ok(Json(result))
}

/// GET /weather/stats
pub async fn stats_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> Result<Json<Paginated<StatsView>>, ApiError> {
    let Query(params) = params?;
    let filter = StatsFilter::from_params(
        params.station_id.as_deref(),
        params.year.as_deref(),
        params.start_year.as_deref(),
        params.end_year.as_deref(),
    )?;
    let page = Page::from_params(params.limit.as_deref(), params.offset.as_deref());

    let result = query_stats(&state.db, &filter, page).await?;
    Ok(Json(result))
}

/// GET /health
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_maps_to_400() {
        let err = ApiError(PipelineError::invalid_query("date", "Invalid date format. Use YYYY-MM-DD"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_error_maps_to_500() {
        let err = ApiError(PipelineError::Database(sqlx::Error::PoolClosed));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
