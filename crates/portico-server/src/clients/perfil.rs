use std::sync::Arc;

use serde_json::Value;

use super::{into_json, transport, ClientError};
use crate::config::UpstreamConfig;

const SERVICE: &str = "perfil-service";

/// HTTP client for the Profile Service.
///
/// The Profile Service performs no authorization of its own; callers are
/// expected to have vetted the request against the Domain Service first.
#[derive(Clone)]
pub struct ProfileClient {
    http: reqwest::Client,
    base: Arc<str>,
}

impl ProfileClient {
    pub fn new(http: reqwest::Client, upstream: &UpstreamConfig) -> Self {
        Self {
            http,
            base: Arc::from(format!("{}{}", upstream.url, upstream.base_path)),
        }
    }

    /// POST /{usuario} - create a profile.
    #[tracing::instrument(skip(self, body))]
    pub async fn create_profile(&self, usuario: &str, body: &Value) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.base, usuario);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        into_json(SERVICE, response).await
    }

    /// GET /{usuario} - fetch a profile.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_profile(&self, usuario: &str) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.base, usuario);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        into_json(SERVICE, response).await
    }

    /// PUT /{usuario} - full replace, not a merge.
    #[tracing::instrument(skip(self, body))]
    pub async fn update_profile(&self, usuario: &str, body: &Value) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.base, usuario);
        let response = self
            .http
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        into_json(SERVICE, response).await
    }

    /// DELETE /{usuario}. The response body is discarded; callers branch on
    /// the typed error for the 404-means-already-gone case.
    #[tracing::instrument(skip(self))]
    pub async fn delete_profile(&self, usuario: &str) -> Result<(), ClientError> {
        let url = format!("{}/{}", self.base, usuario);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read body".to_string());
            return Err(ClientError::Status {
                service: SERVICE,
                status,
                body,
            });
        }
        Ok(())
    }
}
