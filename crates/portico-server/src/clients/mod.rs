pub mod dominio;
pub mod perfil;

use serde_json::Value;
use thiserror::Error;

pub use dominio::DomainClient;
pub use perfil::ProfileClient;

/// Error from an outbound call to a downstream service.
///
/// Downstream failures are never swallowed here: callers branch on the HTTP
/// status (403 vs 404 vs other) to decide how the gateway answers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The downstream service answered with a non-success status. The raw
    /// body is kept for best-effort message extraction.
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    /// The request never produced an HTTP response (connect failure,
    /// timeout, malformed body on a success status).
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Status code of the downstream response, if there was one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Best-effort extraction of the downstream `respuesta` message for the
    /// caller-facing envelope. Falls back to `fallback` when there is no
    /// body, the body is not JSON, or it carries no string `respuesta`.
    pub fn respuesta_message(&self, fallback: &str) -> String {
        if let Self::Status { body, .. } = self {
            if let Ok(parsed) = serde_json::from_str::<Value>(body) {
                if let Some(respuesta) = parsed.get("respuesta").and_then(Value::as_str) {
                    return respuesta.to_string();
                }
            }
        }
        fallback.to_string()
    }
}

/// Turn a downstream response into JSON, capturing status and body on
/// non-success so callers can branch and surface the message.
pub(crate) async fn into_json(
    service: &'static str,
    response: reqwest::Response,
) -> Result<Value, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read body".to_string());
        return Err(ClientError::Status {
            service,
            status,
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|source| ClientError::Transport { service, source })
}

pub(crate) fn transport(service: &'static str, source: reqwest::Error) -> ClientError {
    ClientError::Transport { service, source }
}
