use crate::campus::{Category, Coordinates, DevicePlot, Directions, MapConfig, MapError, PointOfInterest, Viewport};
use crate::error::{api_error, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json,
    routing::{get, post, Router},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn campus_routes() -> Router {
    Router::new()
        .route("/api/campus/map", get(map_config))
        .route("/api/campus/locations", get(list_locations))
        .route("/api/campus/locations/:name/focus", get(focus_location))
        .route("/api/campus/position", post(plot_position))
        .route("/api/campus/directions", post(directions))
}

impl From<MapError> for ApiError {
    fn from(err: MapError) -> Self {
        let status = match err {
            MapError::MissingOrigin | MapError::InvalidCoordinates => StatusCode::UNPROCESSABLE_ENTITY,
            MapError::UnknownLocation(_) => StatusCode::NOT_FOUND,
            MapError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        api_error(status, err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data })
}

#[derive(Debug, Serialize)]
struct MapBody {
    map: MapConfig,
}

#[derive(Debug, Serialize)]
struct LocationsBody {
    locations: Vec<&'static PointOfInterest>,
}

#[derive(Debug, Serialize)]
struct ViewportBody {
    location: String,
    viewport: Viewport,
}

#[derive(Debug, Serialize)]
struct DirectionsBody {
    directions: Directions,
}

#[derive(Debug, Deserialize)]
pub struct LocationFilter {
    pub category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRequest {
    pub from: Option<String>,
    pub position: Option<Coordinates>,
    pub to: String,
}

async fn map_config(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Envelope<MapBody>>, ApiError> {
    let map = state.map.map_config().map_err(|e| {
        tracing::warn!("Map requested but GOOGLE_MAPS_API_KEY is not configured");
        ApiError::from(e)
    })?;
    Ok(ok(MapBody { map }))
}

async fn list_locations(
    Extension(state): Extension<Arc<AppState>>,
    Query(filter): Query<LocationFilter>,
) -> Json<Envelope<LocationsBody>> {
    let directory = state.map.directory();
    let locations = match filter.category {
        Some(category) => directory.by_category(category).collect(),
        None => directory.all().iter().collect(),
    };
    ok(LocationsBody { locations })
}

async fn focus_location(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Envelope<ViewportBody>>, ApiError> {
    let viewport = state.map.focus(&name)?;
    Ok(ok(ViewportBody {
        location: name,
        viewport,
    }))
}

async fn plot_position(
    Extension(state): Extension<Arc<AppState>>,
    Json(position): Json<Coordinates>,
) -> Result<Json<Envelope<DevicePlot>>, ApiError> {
    Ok(ok(state.map.plot_device_position(position)?))
}

async fn directions(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<DirectionsRequest>,
) -> Result<Json<Envelope<DirectionsBody>>, ApiError> {
    let from = request.from.as_deref().map(str::trim).filter(|name| !name.is_empty());
    let directions = state.map.directions(from, request.position, &request.to)?;
    tracing::debug!("Directions to {}: {}", directions.destination, directions.url);
    Ok(ok(DirectionsBody { directions }))
}
