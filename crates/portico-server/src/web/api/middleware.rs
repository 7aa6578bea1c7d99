use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Extractor for the opaque bearer token on protected endpoints.
///
/// The gateway only checks the literal "Bearer " prefix and strips it; token
/// semantics (expiry, role, subject) belong entirely to the Domain Service.
/// Missing header and wrong prefix both answer 401 before any downstream
/// call is made.
#[derive(Debug)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        match auth_header.and_then(|v| v.strip_prefix("Bearer ")) {
            Some(token) => Ok(BearerToken(token.to_string())),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": true, "respuesta": "Token de autenticación requerido"})),
            )
                .into_response()),
        }
    }
}
