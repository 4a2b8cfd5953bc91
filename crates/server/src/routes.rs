//! HTTP routes over [`GameService`].

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use game_manager::{
    CreateSessionRequest, EvaluationResponse, GameError, GameService, GameStateResponse,
    PlayerMoveRequest, PlayerMoveResponse, SessionListResponse, StartGameResponse,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GameService>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub engine: String,
    pub engine_ready: bool,
    pub active_games: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateParams {
    pub depth: Option<u8>,
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/start_game", post(start_game))
        .route("/player_move", post(player_move))
        .route("/resume_game/{game_id}", post(resume_game))
        .route("/state/{game_id}", get(game_state))
        .route("/game/{game_id}", delete(delete_game))
        .route("/games", get(list_games))
        .route("/evaluate/{game_id}", get(evaluate))
        .layer(cors(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);
    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Chess play API".to_string(),
        status: "running".to_string(),
        engine: state.service.engine_name().to_string(),
        engine_ready: state.service.engine_ready(),
        active_games: state.service.session_count().await,
    })
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".to_string(),
    })
}

async fn start_game(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<StartGameResponse>, AppError> {
    Ok(Json(state.service.create_session(request).await?))
}

async fn player_move(
    State(state): State<AppState>,
    Json(request): Json<PlayerMoveRequest>,
) -> Result<Json<PlayerMoveResponse>, AppError> {
    Ok(Json(state.service.play_move(request).await?))
}

async fn resume_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<PlayerMoveResponse>, AppError> {
    Ok(Json(state.service.resume_game(&game_id).await?))
}

async fn game_state(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameStateResponse>, AppError> {
    Ok(Json(state.service.get_state(&game_id).await?))
}

async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    if state.service.delete_session(&game_id).await {
        Ok(Json(Deleted {
            message: "Game deleted successfully".to_string(),
        }))
    } else {
        Err(GameError::NotFound(game_id).into())
    }
}

async fn list_games(State(state): State<AppState>) -> Json<SessionListResponse> {
    Json(state.service.list_sessions().await)
}

async fn evaluate(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Query(params): Query<EvaluateParams>,
) -> Result<Json<EvaluationResponse>, AppError> {
    Ok(Json(state.service.evaluate(&game_id, params.depth).await?))
}
