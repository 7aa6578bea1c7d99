use std::sync::Arc;

use serde_json::Value;

use super::{into_json, transport, ClientError};
use crate::config::UpstreamConfig;

const SERVICE: &str = "domain-service";

/// HTTP client for the Domain Service (credentials, authentication and
/// account records).
#[derive(Clone)]
pub struct DomainClient {
    http: reqwest::Client,
    base: Arc<str>,
}

impl DomainClient {
    pub fn new(http: reqwest::Client, upstream: &UpstreamConfig) -> Self {
        Self {
            http,
            base: Arc::from(format!("{}{}", upstream.url, upstream.base_path)),
        }
    }

    /// POST /usuarios - create the security record.
    #[tracing::instrument(skip(self, body))]
    pub async fn register_user(&self, body: &Value) -> Result<Value, ClientError> {
        let url = format!("{}/usuarios", self.base);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        into_json(SERVICE, response).await
    }

    /// POST /sesiones - validate credentials, returns a token on success.
    #[tracing::instrument(skip(self, body))]
    pub async fn authenticate(&self, body: &Value) -> Result<Value, ClientError> {
        let url = format!("{}/sesiones", self.base);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        into_json(SERVICE, response).await
    }

    /// DELETE /usuarios/{usuario} - remove the security record.
    #[tracing::instrument(skip(self, token))]
    pub async fn delete_user(&self, usuario: &str, token: &str) -> Result<Value, ClientError> {
        let url = format!("{}/usuarios/{}", self.base, usuario);
        let response = self
            .http
            .delete(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        into_json(SERVICE, response).await
    }

    /// Look up a single security record.
    ///
    /// The Domain Service has no GET /usuarios/{usuario}; the only read is
    /// the paged list endpoint. The page is filtered here so the rest of the
    /// gateway sees one record or nothing - this method is the single place
    /// to swap in a real single-resource call once the upstream grows one.
    #[tracing::instrument(skip(self, token))]
    pub async fn fetch_user(
        &self,
        usuario: &str,
        token: &str,
    ) -> Result<Option<Value>, ClientError> {
        let url = format!("{}/usuarios", self.base);
        let response = self
            .http
            .get(&url)
            .query(&[("pagina", "0")])
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        let page = into_json(SERVICE, response).await?;
        Ok(find_in_page(&page, usuario))
    }

    /// PATCH /usuarios/{usuario} - partial update, only the fields present
    /// in `body` are touched downstream.
    #[tracing::instrument(skip(self, body, token))]
    pub async fn update_user(
        &self,
        usuario: &str,
        body: &Value,
        token: &str,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/usuarios/{}", self.base, usuario);
        let response = self
            .http
            .patch(&url)
            .header("Authorization", format!("Bearer {}", token))
            .json(body)
            .send()
            .await
            .map_err(|e| transport(SERVICE, e))?;
        into_json(SERVICE, response).await
    }
}

fn find_in_page(page: &Value, usuario: &str) -> Option<Value> {
    let items = match page {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("respuesta") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };
    items
        .iter()
        .find(|item| item.get("usuario").and_then(Value::as_str) == Some(usuario))
        .cloned()
}

/// Pull the email out of a Domain Service response.
///
/// Two historical response shapes exist: the record at the top level, or
/// nested under a `respuesta` wrapper. Both are tried; the fallback is an
/// empty string, never an error.
pub fn extract_email(response: &Value) -> String {
    if let Some(correo) = response
        .get("respuesta")
        .and_then(|r| r.get("correo"))
        .and_then(Value::as_str)
    {
        return correo.to_string();
    }
    response
        .get("correo")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> DomainClient {
        DomainClient::new(
            reqwest::Client::new(),
            &UpstreamConfig {
                url: server.base_url(),
                base_path: "/api/v1".to_string(),
            },
        )
    }

    #[test]
    fn test_extract_email_top_level() {
        let response = json!({"usuario": "bob", "correo": "bob@example.com"});
        assert_eq!(extract_email(&response), "bob@example.com");
    }

    #[test]
    fn test_extract_email_nested_under_respuesta() {
        let response = json!({"error": false, "respuesta": {"correo": "bob@example.com"}});
        assert_eq!(extract_email(&response), "bob@example.com");
    }

    #[test]
    fn test_extract_email_prefers_wrapper_shape() {
        let response = json!({"correo": "outer@example.com", "respuesta": {"correo": "inner@example.com"}});
        assert_eq!(extract_email(&response), "inner@example.com");
    }

    #[test]
    fn test_extract_email_missing_yields_empty() {
        assert_eq!(extract_email(&json!({"respuesta": "Usuario eliminado"})), "");
        assert_eq!(extract_email(&json!({})), "");
        assert_eq!(extract_email(&json!(null)), "");
    }

    #[tokio::test]
    async fn test_fetch_user_filters_the_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/usuarios")
                    .query_param("pagina", "0")
                    .header("Authorization", "Bearer tok");
                then.status(200).json_body(json!({
                    "error": false,
                    "respuesta": [
                        {"usuario": "alice", "correo": "alice@example.com"},
                        {"usuario": "bob", "correo": "bob@example.com"},
                    ]
                }));
            })
            .await;

        let record = client(&server).fetch_user("bob", "tok").await.unwrap();

        mock.assert_async().await;
        let record = record.expect("bob should be in the page");
        assert_eq!(record["correo"], "bob@example.com");
    }

    #[tokio::test]
    async fn test_fetch_user_handles_top_level_array() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/usuarios");
                then.status(200)
                    .json_body(json!([{"usuario": "bob", "correo": "bob@example.com"}]));
            })
            .await;

        let record = client(&server).fetch_user("bob", "tok").await.unwrap();
        assert!(record.is_some());
    }

    #[tokio::test]
    async fn test_fetch_user_absent_from_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/usuarios");
                then.status(200)
                    .json_body(json!({"error": false, "respuesta": []}));
            })
            .await;

        let record = client(&server).fetch_user("bob", "tok").await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_surfaces_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/v1/usuarios/bob");
                then.status(403)
                    .json_body(json!({"error": true, "respuesta": "Rol inválido"}));
            })
            .await;

        let error = client(&server).delete_user("bob", "tok").await.unwrap_err();
        assert_eq!(error.status(), Some(reqwest::StatusCode::FORBIDDEN));
        assert_eq!(error.respuesta_message("fallback"), "Rol inválido");
    }

    #[tokio::test]
    async fn test_update_user_patches_with_bearer() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/api/v1/usuarios/alice")
                    .header("Authorization", "Bearer admin-tok")
                    .json_body(json!({"correo": "a@b.com"}));
                then.status(200)
                    .json_body(json!({"usuario": "alice", "correo": "a@b.com"}));
            })
            .await;

        let updated = client(&server)
            .update_user("alice", &json!({"correo": "a@b.com"}), "admin-tok")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(updated["correo"], "a@b.com");
    }
}
