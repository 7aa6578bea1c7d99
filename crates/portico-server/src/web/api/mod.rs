pub mod auth;
pub mod middleware;
pub mod usuarios;

use crate::clients::ClientError;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth routes
        .route("/auth/registro", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/usuarios/{usuario}", delete(auth::delete_user))
        // Unified user routes
        .route(
            "/usuarios/{usuario}",
            get(usuarios::fetch_user)
                .put(usuarios::update_user)
                .delete(usuarios::delete_user),
        )
        .with_state(state)
}

/// Map a downstream error to the gateway envelope: the downstream status is
/// carried over 1:1 when there was one, 500 otherwise; the message is the
/// downstream `respuesta` when it can be extracted, `fallback` if not.
pub(crate) fn downstream_error(error: &ClientError, fallback: &str) -> Response {
    let status = error.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({"error": true, "respuesta": error.respuesta_message(fallback)})),
    )
        .into_response()
}

/// Error mapping shared by both delete endpoints: 403 and 404 get fixed
/// messages, anything else is a generic 500.
pub(crate) fn delete_error(error: &ClientError) -> Response {
    match error.status() {
        Some(StatusCode::FORBIDDEN) => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": true, "respuesta": "No tiene permisos para eliminar usuarios"})),
        )
            .into_response(),
        Some(StatusCode::NOT_FOUND) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": true, "respuesta": "Usuario no encontrado"})),
        )
            .into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": true, "respuesta": "Error eliminando usuario"})),
        )
            .into_response(),
    }
}
