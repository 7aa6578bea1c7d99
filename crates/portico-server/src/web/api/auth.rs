use crate::clients::ClientError;
use crate::orchestrator::RegisterOutcome;
use crate::state::AppState;
use crate::web::api::middleware::BearerToken;
use crate::web::api::{delete_error, downstream_error};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// POST /api/v1/auth/registro
///
/// Composite registration: the security record always goes first; profile
/// creation is attempted only when profile fields were supplied, and its
/// failure still reports 201 since the account already exists.
#[tracing::instrument(skip(state, body))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Map<String, Value>>,
) -> impl IntoResponse {
    match state.orchestrator.register(&body).await {
        Ok(RegisterOutcome::Complete { security, profile }) => (
            StatusCode::CREATED,
            Json(json!({
                "error": false,
                "respuesta": "Usuario y perfil registrados exitosamente",
                "datosSeguridad": security,
                "datosPerfil": profile,
            })),
        )
            .into_response(),
        Ok(RegisterOutcome::ProfilePending { security }) => (
            StatusCode::CREATED,
            Json(json!({
                "error": false,
                "respuesta": "Usuario registrado exitosamente. El perfil se puede crear posteriormente.",
                "datosSeguridad": security,
            })),
        )
            .into_response(),
        Ok(RegisterOutcome::SecurityOnly { security }) => {
            (StatusCode::CREATED, Json(security)).into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            downstream_error(&e, "Error procesando registro")
        }
    }
}

/// POST /api/v1/auth/login
///
/// Thin forward to the Domain Service; the token response passes through
/// verbatim on success.
#[tracing::instrument(skip(state, body))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    match state.domain.authenticate(&body).await {
        Ok(response) => Json(response).into_response(),
        Err(e @ ClientError::Status { .. }) => {
            tracing::error!("Authentication rejected downstream: {}", e);
            downstream_error(&e, "Credenciales inválidas")
        }
        Err(e) => {
            tracing::error!("Authentication failed: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": true, "respuesta": "Credenciales inválidas"})),
            )
                .into_response()
        }
    }
}

/// DELETE /api/v1/auth/usuarios/{usuario}
///
/// Deletes the security record only; the Domain Service decides whether the
/// token's role may delete this username.
#[tracing::instrument(skip(state, token))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(usuario): Path<String>,
    token: BearerToken,
) -> impl IntoResponse {
    match state.domain.delete_user(&usuario, &token.0).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            tracing::error!(%usuario, "Failed to delete user: {}", e);
            delete_error(&e)
        }
    }
}
