// Axum API Server Module
//
// Purpose: HTTP surface over the AQI engine (validation, scoring, city ranking)
// The engine itself is synchronous; ranking passes run on the blocking pool.

#[cfg(feature = "api")]
use axum::{
    extract::{FromRequest, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Form, Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use std::collections::HashMap;

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use anyhow::Context;

#[cfg(feature = "api")]
use crate::assessment::{Assessor, PollutionResponse};

#[cfg(feature = "api")]
use crate::config::{EngineConfig, MAX_TOP_N};

#[cfg(feature = "api")]
use crate::data::{load_csv, DatasetError};

#[cfg(feature = "api")]
use crate::ranking::{CityRanker, CityReadings};

#[cfg(feature = "api")]
use crate::snapshot::{DatasetStore, RankingService};

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub assessor: Assessor,
    pub rankings: Arc<RankingService>,
    pub config: Arc<EngineConfig>,
}

#[cfg(feature = "api")]
impl AppState {
    /// Load the historical dataset and build the engine.
    ///
    /// A missing dataset is not fatal: the server starts with an empty
    /// ranking, as `mostPolluted` is optional for display.
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading historical dataset...");
        let cities = load_dataset(&config)?;
        Ok(Self::from_parts(config, cities))
    }

    /// Build state around an already loaded dataset
    pub fn from_parts(config: EngineConfig, cities: Vec<CityReadings>) -> Self {
        tracing::info!("Initializing ranking cache ({} entries)...", config.cache_capacity);
        let store = Arc::new(DatasetStore::new(cities));
        let rankings = Arc::new(RankingService::new(store, CityRanker::default(), config.cache_capacity));

        Self {
            assessor: Assessor::default(),
            rankings,
            config: Arc::new(config),
        }
    }
}

#[cfg(feature = "api")]
fn load_dataset(config: &EngineConfig) -> anyhow::Result<Vec<CityReadings>> {
    let catalog = *Assessor::default().validator().catalog();
    match load_csv(&config.data_path, &catalog) {
        Ok(loaded) => Ok(loaded.cities),
        Err(DatasetError::NotFound(path)) => {
            tracing::warn!("Dataset {:?} not found, most polluted list will be empty", path);
            Ok(Vec::new())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load dataset {:?}", config.data_path)),
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Advisory range configuration for the input form
        .route("/api/ranges", get(get_ranges))

        // Scoring
        .route("/api/pollution", post(score_pollution))

        // City ranking
        .route("/api/cities/most-polluted", get(get_most_polluted))
        .route("/api/dataset/reload", post(reload_dataset))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // Allow all origins (adjust for production)
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn get_ranges(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.assessor.validator().catalog().client_config())
}

/// Validate a submission, score it and attach the most polluted cities
///
/// POST /api/pollution
/// Body: JSON object or urlencoded form with keys pm25, pm10, co, no2, so2, o3
#[cfg(feature = "api")]
async fn score_pollution(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<PollutionResponse>), AppError> {
    let payload = read_payload(request, &state).await?;

    let assessment = match state.assessor.assess(&payload) {
        Ok(assessment) => assessment,
        Err(failure) => {
            tracing::debug!("Rejected submission with {} field errors", failure.errors.len());
            return Ok((StatusCode::BAD_REQUEST, Json(PollutionResponse::failure(failure))));
        }
    };

    tracing::info!(
        "Scored submission: {:.2} ({}, dominant {})",
        assessment.result.score,
        assessment.result.category,
        assessment.result.dominant_pollutant
    );

    // CPU-bound work: run in blocking thread pool
    let rankings = state.rankings.clone();
    let top_n = state.config.top_n;
    let most_polluted = tokio::task::spawn_blocking(move || rankings.most_polluted(top_n))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok((
        StatusCode::OK,
        Json(PollutionResponse::success(&assessment, &most_polluted)),
    ))
}

/// Accept either a JSON object or a urlencoded form.
///
/// JSON numbers are taken as their decimal text so they pass through the
/// same validation as form strings; other non-string values are dropped and
/// reported as missing.
#[cfg(feature = "api")]
async fn read_payload(request: Request, state: &AppState) -> Result<HashMap<String, String>, AppError> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.starts_with("application/json"));

    if is_json {
        let Json(body) = Json::<HashMap<String, serde_json::Value>>::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(body
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((key, s)),
                serde_json::Value::Number(n) => Some((key, n.to_string())),
                _ => None,
            })
            .collect())
    } else {
        let Form(form) = Form::<HashMap<String, String>>::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(form)
    }
}

/// Query params for the ranking endpoint
#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct RankingQuery {
    limit: Option<usize>,
}

/// Most polluted cities by average AQI
///
/// GET /api/cities/most-polluted?limit=10
#[cfg(feature = "api")]
async fn get_most_polluted(
    State(state): State<AppState>,
    Query(params): Query<RankingQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = params.limit.unwrap_or(state.config.top_n).min(MAX_TOP_N);

    let rankings = state.rankings.clone();
    let ranked = tokio::task::spawn_blocking(move || rankings.most_polluted(limit))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    let data: Vec<serde_json::Value> = ranked
        .iter()
        .map(|r| {
            serde_json::json!({
                "city": r.city,
                "avgAqi": crate::utils::round_to(r.avg_aqi, 2),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "rows": data.len(),
        "data": data,
    })))
}

/// Re-read the dataset from disk and publish it as a new snapshot
///
/// POST /api/dataset/reload
#[cfg(feature = "api")]
async fn reload_dataset(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let config = state.config.clone();
    let rankings = state.rankings.clone();

    let (version, cities) = tokio::task::spawn_blocking(move || -> anyhow::Result<(u64, usize)> {
        let cities = load_dataset(&config)?;
        let count = cities.len();
        Ok((rankings.refresh(cities), count))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(|e| AppError::Internal(format!("Dataset reload error: {:#}", e)))?;

    Ok(Json(serde_json::json!({
        "version": version,
        "cities": cities,
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("{}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}
