use crate::orchestrator::UpdateError;
use crate::state::AppState;
use crate::web::api::middleware::BearerToken;
use crate::web::api::{delete_error, downstream_error};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// GET /api/v1/usuarios/{usuario}
///
/// Composite fetch. Each sub-fetch degrades to an omitted field on failure,
/// so the response always answers 200 with at least the username.
#[tracing::instrument(skip(state, token))]
pub async fn fetch_user(
    State(state): State<Arc<AppState>>,
    Path(usuario): Path<String>,
    token: BearerToken,
) -> impl IntoResponse {
    Json(state.orchestrator.fetch(&usuario, &token.0).await)
}

/// PUT /api/v1/usuarios/{usuario}
///
/// Composite update: security fields first, profile fields after. The body
/// keeps the historical shape `{mensaje, datosSeguridad, datosPerfil}`.
#[tracing::instrument(skip(state, body, token))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(usuario): Path<String>,
    token: BearerToken,
    Json(body): Json<Map<String, Value>>,
) -> impl IntoResponse {
    match state.orchestrator.update(&usuario, &body, &token.0).await {
        Ok(result) => Json(json!({
            "mensaje": result.mensaje,
            "datosSeguridad": result.security,
            "datosPerfil": result.profile,
        }))
        .into_response(),
        Err(e) => {
            match &e {
                UpdateError::Security(inner) => {
                    tracing::error!(%usuario, "Security update failed: {}", inner);
                }
                UpdateError::Permission(inner) => {
                    tracing::error!(%usuario, "Permission probe rejected update: {}", inner);
                }
                UpdateError::Profile(inner) => {
                    tracing::error!(%usuario, "Profile update failed: {}", inner);
                }
            }
            downstream_error(e.client_error(), "Error actualizando datos del usuario")
        }
    }
}

/// DELETE /api/v1/usuarios/{usuario}
///
/// Composite delete plus deletion event. The event goes out exactly once
/// per attempt: with the extracted email on success, with an empty one when
/// the authoritative delete failed. Publish failures never reach the
/// response.
#[tracing::instrument(skip(state, token))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(usuario): Path<String>,
    token: BearerToken,
) -> impl IntoResponse {
    match state.orchestrator.delete(&usuario, &token.0).await {
        Ok(outcome) => {
            state.events.publish_deletion(&usuario, &outcome.correo).await;
            Json(json!({
                "error": false,
                "respuesta": "Usuario eliminado exitosamente del sistema",
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!(%usuario, "Failed to delete user: {}", e);
            state.events.publish_deletion(&usuario, "").await;
            delete_error(&e)
        }
    }
}
