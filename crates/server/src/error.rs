use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use game_manager::{ApiError, ErrorCode, GameError};
use tracing::error;

/// A [`GameError`] on its way to the client.
#[derive(Debug)]
pub struct AppError(pub GameError);

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::EngineFault => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ApiError::from(&self.0);
        let status = status_for(body.code);
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        (status, Json(body)).into_response()
    }
}
