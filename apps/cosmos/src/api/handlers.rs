//! # API Endpoint Handlers
//!
//! Each handler takes the catalog lock once, runs one catalog operation and
//! shapes the result. Failures go through `ApiError`.

use super::{
    AppState,
    error::ApiError,
    types::{CreateMissionRequest, CreateScientistRequest, HealthResponse, field_assignments},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use cosmos_core::{MissionView, PlanetSummary, ScientistDetail, ScientistId, ScientistSummary};
use serde_json::{Map, Value};

/// Resolve the `{id}` segment. A segment that is not an id cannot name a
/// scientist, so it is reported the same way as an unknown one.
fn scientist_id(path: Result<Path<u64>, PathRejection>) -> Result<ScientistId, ApiError> {
    match path {
        Ok(Path(id)) => Ok(ScientistId(id)),
        Err(rejection) => {
            tracing::debug!("Unparseable scientist id: {}", rejection.body_text());
            Err(ApiError::NotFound("scientist"))
        }
    }
}

// =============================================================================
// SERVICE HANDLERS
// =============================================================================

/// Service root. Empty body.
pub async fn home_handler() -> StatusCode {
    StatusCode::OK
}

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// SCIENTIST HANDLERS
// =============================================================================

/// `GET /scientists`
pub async fn list_scientists_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScientistSummary>>, ApiError> {
    let catalog = state.catalog.read().await;
    Ok(Json(catalog.list_scientists()?))
}

/// `POST /scientists`
pub async fn create_scientist_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateScientistRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ScientistSummary>), ApiError> {
    let Json(request) = body?;
    let mut catalog = state.catalog.write().await;
    let scientist = catalog.create_scientist(request.name(), request.field_of_study())?;
    tracing::info!(id = scientist.id, "Created scientist");
    Ok((StatusCode::CREATED, Json(scientist)))
}

/// `GET /scientists/{id}`
pub async fn get_scientist_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<ScientistDetail>, ApiError> {
    let id = scientist_id(path)?;
    let catalog = state.catalog.read().await;
    Ok(Json(catalog.scientist_detail(id)?))
}

/// `PATCH /scientists/{id}`
///
/// The id is resolved before the body is inspected, so an unknown id is a
/// 404 whatever the body holds.
pub async fn patch_scientist_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<ScientistSummary>), ApiError> {
    let id = scientist_id(path)?;
    let fields = match body {
        Ok(Json(fields)) => fields,
        Err(rejection) => {
            state.catalog.read().await.ensure_scientist(id)?;
            return Err(rejection.into());
        }
    };
    let scientist = state
        .catalog
        .write()
        .await
        .patch_scientist(id, &field_assignments(fields))?;
    tracing::info!(id = scientist.id, "Patched scientist");
    Ok((StatusCode::ACCEPTED, Json(scientist)))
}

/// `DELETE /scientists/{id}`
pub async fn delete_scientist_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = scientist_id(path)?;
    let mut catalog = state.catalog.write().await;
    let cascaded = catalog.delete_scientist(id)?;
    tracing::info!(id = id.0, missions = cascaded, "Deleted scientist");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// PLANET HANDLERS
// =============================================================================

/// `GET /planets`
pub async fn list_planets_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlanetSummary>>, ApiError> {
    let catalog = state.catalog.read().await;
    Ok(Json(catalog.list_planets()?))
}

// =============================================================================
// MISSION HANDLERS
// =============================================================================

/// `POST /missions`
pub async fn create_mission_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateMissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MissionView>), ApiError> {
    let Json(request) = body?;
    let mut catalog = state.catalog.write().await;
    let mission = catalog.create_mission(
        request.name(),
        request.scientist_id(),
        request.planet_id(),
    )?;
    tracing::info!(
        id = mission.id,
        scientist_id = mission.scientist_id,
        planet_id = mission.planet_id,
        "Created mission"
    );
    Ok((StatusCode::CREATED, Json(mission)))
}
