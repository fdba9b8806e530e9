use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::geo::{self, DistanceUnit, GeoError, GeoPoint, Hit, RadiusQuery, CHARLOTTE};
use crate::places::{search_attractions, Attraction, DateFilter, Event, EventQuery};
use crate::weather::{WeatherData, WeatherError};

use super::state::AppState;

const DEFAULT_RADIUS: f64 = 25.0;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<GeoError> for ApiError {
    fn from(e: GeoError) -> Self {
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        api_error(StatusCode::BAD_REQUEST, e.body_text())
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ─── GET / and /health ───────────────────────────────────────────

pub async fn root() -> Json<serde_json::Value> {
    let start = Instant::now();
    tracing::info!(elapsed_ms = elapsed_ms(start), "GET /");
    Json(json!({ "message": "Welcome to the Charlotte Guide API" }))
}

pub async fn health() -> Json<serde_json::Value> {
    let start = Instant::now();
    tracing::info!(elapsed_ms = elapsed_ms(start), "GET /health");
    Json(json!({ "status": "ok" }))
}

// ─── GET /api/weather/current ────────────────────────────────────

#[derive(Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

async fn fetch_weather(state: &AppState, point: GeoPoint) -> Result<WeatherData, WeatherError> {
    let weather = Arc::clone(&state.weather);
    tokio::task::spawn_blocking(move || weather.current(point))
        .await
        .map_err(|e| WeatherError::Network(format!("weather task failed: {}", e)))?
}

pub async fn current_weather(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherData>, ApiError> {
    let start = Instant::now();
    let Query(params) = query?;
    let point = GeoPoint::new(
        params.lat.unwrap_or(CHARLOTTE.lat()),
        params.lon.unwrap_or(CHARLOTTE.lon()),
    )?;

    let data = fetch_weather(&state, point).await.map_err(|e| {
        tracing::error!(%point, error = %e, "weather lookup failed");
        api_error(StatusCode::BAD_GATEWAY, format!("Weather service error: {}", e))
    })?;

    tracing::info!(
        %point,
        source = %data.source,
        elapsed_ms = elapsed_ms(start),
        "GET /api/weather/current"
    );
    Ok(Json(data))
}

// ─── GET /api/weather/charlotte ──────────────────────────────────

pub async fn charlotte_weather(State(state): State<Arc<AppState>>) -> Json<WeatherData> {
    let start = Instant::now();
    let data = match fetch_weather(&state, CHARLOTTE).await {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(error = %e, "weather lookup for Charlotte failed, serving fallback");
            WeatherData::charlotte_fallback()
        }
    };
    tracing::info!(source = %data.source, elapsed_ms = elapsed_ms(start), "GET /api/weather/charlotte");
    Json(data)
}

// ─── Search helpers ──────────────────────────────────────────────

fn parse_unit(s: Option<&str>) -> Result<DistanceUnit, ApiError> {
    match s {
        None => Ok(DistanceUnit::default()),
        Some(raw) => Ok(raw.parse::<DistanceUnit>()?),
    }
}

fn radius_query(
    lat: Option<f64>,
    lon: Option<f64>,
    radius: Option<f64>,
    unit: Option<&str>,
) -> Result<RadiusQuery, ApiError> {
    let origin = GeoPoint::new(lat.unwrap_or(CHARLOTTE.lat()), lon.unwrap_or(CHARLOTTE.lon()))?;
    let unit = parse_unit(unit)?;
    Ok(RadiusQuery::new(origin, radius.unwrap_or(DEFAULT_RADIUS), unit)?)
}

#[derive(Serialize)]
pub struct SearchResponse<T: Serialize> {
    pub count: usize,
    pub radius: f64,
    pub unit: DistanceUnit,
    pub results: Vec<Hit<T>>,
}

impl<T: Serialize> SearchResponse<T> {
    fn new(area: &RadiusQuery, results: Vec<Hit<T>>) -> Self {
        Self {
            count: results.len(),
            radius: area.radius,
            unit: area.unit,
            results,
        }
    }
}

// ─── GET /api/events/search ──────────────────────────────────────

#[derive(Deserialize)]
pub struct EventSearchQuery {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
    pub unit: Option<String>,
    pub when: Option<String>,
}

pub async fn search_events(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EventSearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse<Event>>, ApiError> {
    let start = Instant::now();
    let Query(params) = query?;
    let area = radius_query(params.lat, params.lon, params.radius, params.unit.as_deref())?;
    let when: DateFilter = match params.when.as_deref() {
        Some(w) => w
            .parse::<DateFilter>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => DateFilter::All,
    };

    let query = EventQuery {
        term: params.q.clone(),
        area,
        when,
    };
    let hits = state.events.search(&query, state.today());

    tracing::info!(
        q = params.q.as_deref().unwrap_or(""),
        radius = area.radius,
        %when,
        results = hits.len(),
        elapsed_ms = elapsed_ms(start),
        "GET /api/events/search"
    );
    Ok(Json(SearchResponse::new(&area, hits)))
}

// ─── GET /api/attractions/search ─────────────────────────────────

#[derive(Deserialize)]
pub struct AttractionSearchQuery {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
    pub unit: Option<String>,
}

pub async fn search_attractions_handler(
    query: Result<Query<AttractionSearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse<Attraction>>, ApiError> {
    let start = Instant::now();
    let Query(params) = query?;
    let area = radius_query(params.lat, params.lon, params.radius, params.unit.as_deref())?;
    let hits = search_attractions(params.q.as_deref(), &area);

    tracing::info!(
        q = params.q.as_deref().unwrap_or(""),
        radius = area.radius,
        results = hits.len(),
        elapsed_ms = elapsed_ms(start),
        "GET /api/attractions/search"
    );
    Ok(Json(SearchResponse::new(&area, hits)))
}

// ─── GET /api/distance ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct DistanceQuery {
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
    pub unit: Option<String>,
}

#[derive(Serialize)]
pub struct DistanceResponse {
    pub distance: f64,
    pub unit: DistanceUnit,
}

pub async fn distance(
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let start = Instant::now();
    let Query(params) = query?;
    let unit = parse_unit(params.unit.as_deref())?;
    let distance = geo::distance_between(
        params.from_lat,
        params.from_lon,
        params.to_lat,
        params.to_lon,
        unit,
    )?;

    tracing::info!(distance, %unit, elapsed_ms = elapsed_ms(start), "GET /api/distance");
    Ok(Json(DistanceResponse { distance, unit }))
}
