//! HTTP routes for cities and their points of interest.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{PointOfInterestError, PointsOfInterestService};
use crate::domain::model::{
    CityDto, CityId, CityWithoutPointsOfInterestDto, PointOfInterestDto,
    PointOfInterestForCreation, PointOfInterestForUpdate, PointOfInterestId,
};
use crate::domain::patch::PatchDocument;
use crate::domain::validation::ValidationErrors;
use crate::utils::error::Result;

pub const INTERNAL_ERROR_MESSAGE: &str = "A problem occurred while handling your request.";

pub struct AppState {
    pub points_of_interest: PointsOfInterestService,
}

impl AppState {
    pub fn new(points_of_interest: PointsOfInterestService) -> Self {
        Self { points_of_interest }
    }
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/cities", get(list_cities))
        .route("/api/cities/{city_id}", get(get_city))
        .route(
            "/api/cities/{city_id}/pointsofinterest",
            get(list_points_of_interest).post(create_point_of_interest),
        )
        .route(
            "/api/cities/{city_id}/pointsofinterest/{id}",
            get(get_point_of_interest)
                .put(update_point_of_interest)
                .patch(partially_update_point_of_interest)
                .delete(delete_point_of_interest),
        )
}

pub fn router(state: Arc<AppState>) -> Router {
    routes().with_state(state)
}

pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub fn point_of_interest_location(city_id: CityId, id: PointOfInterestId) -> String {
    format!("/api/cities/{}/pointsofinterest/{}", city_id, id)
}

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Validation(ValidationErrors),
    BadRequest { field: &'static str, message: String },
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::BadRequest { field, message } => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": { field: [message] } })),
            )
                .into_response(),
            ApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}

impl From<PointOfInterestError> for ApiError {
    fn from(e: PointOfInterestError) -> Self {
        match e {
            PointOfInterestError::CityNotFound { .. }
            | PointOfInterestError::PointOfInterestNotFound { .. } => ApiError::NotFound,
            PointOfInterestError::ValidationFailed(errors) => ApiError::Validation(errors),
            PointOfInterestError::PatchFailed(e) => ApiError::BadRequest {
                field: "patch",
                message: e.to_string(),
            },
            PointOfInterestError::Persistence(e) => {
                tracing::error!(error = %e, "Request failed with a persistence error");
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            field: "body",
            message: rejection.body_text(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQuery {
    #[serde(default)]
    pub include_points_of_interest: bool,
}

async fn list_cities(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<CityWithoutPointsOfInterestDto>>, ApiError> {
    let cities = state.points_of_interest.list_cities().await?;
    Ok(Json(
        cities
            .into_iter()
            .map(CityWithoutPointsOfInterestDto::from)
            .collect(),
    ))
}

async fn get_city(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<CityId>,
    Query(query): Query<CityQuery>,
) -> std::result::Result<Response, ApiError> {
    let city = state
        .points_of_interest
        .get_city(city_id, query.include_points_of_interest)
        .await?;

    if query.include_points_of_interest {
        Ok(Json(CityDto::from(city)).into_response())
    } else {
        Ok(Json(CityWithoutPointsOfInterestDto::from(city)).into_response())
    }
}

async fn list_points_of_interest(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<CityId>,
) -> std::result::Result<Json<Vec<PointOfInterestDto>>, ApiError> {
    let points = state
        .points_of_interest
        .list_points_of_interest(city_id)
        .await?;
    Ok(Json(points.into_iter().map(PointOfInterestDto::from).collect()))
}

async fn get_point_of_interest(
    State(state): State<Arc<AppState>>,
    Path((city_id, id)): Path<(CityId, PointOfInterestId)>,
) -> std::result::Result<Json<PointOfInterestDto>, ApiError> {
    let point = state
        .points_of_interest
        .get_point_of_interest(city_id, id)
        .await?;
    Ok(Json(PointOfInterestDto::from(point)))
}

async fn create_point_of_interest(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<CityId>,
    payload: std::result::Result<Json<PointOfInterestForCreation>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let created = state
        .points_of_interest
        .create_point_of_interest(city_id, payload)
        .await?;

    let location = point_of_interest_location(city_id, created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PointOfInterestDto::from(created)),
    ))
}

async fn update_point_of_interest(
    State(state): State<Arc<AppState>>,
    Path((city_id, id)): Path<(CityId, PointOfInterestId)>,
    payload: std::result::Result<Json<PointOfInterestForUpdate>, JsonRejection>,
) -> std::result::Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    state
        .points_of_interest
        .update_point_of_interest(city_id, id, payload)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn partially_update_point_of_interest(
    State(state): State<Arc<AppState>>,
    Path((city_id, id)): Path<(CityId, PointOfInterestId)>,
    document: std::result::Result<Json<PatchDocument>, JsonRejection>,
) -> std::result::Result<StatusCode, ApiError> {
    let Json(document) = document?;
    state
        .points_of_interest
        .partially_update_point_of_interest(city_id, id, &document)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_point_of_interest(
    State(state): State<Arc<AppState>>,
    Path((city_id, id)): Path<(CityId, PointOfInterestId)>,
) -> std::result::Result<StatusCode, ApiError> {
    state
        .points_of_interest
        .delete_point_of_interest(city_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CityInfoError;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (
                ApiError::from(PointOfInterestError::CityNotFound { city_id: 1 }),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(PointOfInterestError::ValidationFailed(ValidationErrors::new())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(PointOfInterestError::Persistence(CityInfoError::persistence(
                    "disk full",
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn location_points_at_the_created_resource() {
        assert_eq!(
            point_of_interest_location(3, 12),
            "/api/cities/3/pointsofinterest/12"
        );
    }
}
