//! Composite user operations spanning the Domain and Profile services.
//!
//! The Domain Service is the source of truth: its failures abort composite
//! writes, while Profile Service failures are downgraded or swallowed once
//! the security step has committed.

use serde_json::{json, Map, Value};

use portico_common::partition;

use crate::clients::{dominio, ClientError, DomainClient, ProfileClient};

#[derive(Clone)]
pub struct UserOrchestrator {
    domain: DomainClient,
    profile: ProfileClient,
}

/// Outcome of a composite registration. Security registration committed in
/// every variant; the variants only differ in what happened to the profile.
pub enum RegisterOutcome {
    /// Security record and profile both created.
    Complete { security: Value, profile: Value },
    /// Security record created; profile creation failed and can be retried
    /// later by the client.
    ProfilePending { security: Value },
    /// No profile data was supplied; the downstream security response passes
    /// through untouched.
    SecurityOnly { security: Value },
}

/// Outcome of a composite update.
pub struct UpdateResult {
    pub mensaje: &'static str,
    pub security: Value,
    pub profile: Value,
}

/// Why a composite update failed. Carries the downstream error so handlers
/// can remap its status and surface its message.
pub enum UpdateError {
    /// The security update failed; the profile was never touched.
    Security(ClientError),
    /// The permission probe before a profile-only update was rejected.
    Permission(ClientError),
    /// The profile update failed with no committed security update to
    /// protect (profile-only path).
    Profile(ClientError),
}

impl UpdateError {
    pub fn client_error(&self) -> &ClientError {
        match self {
            Self::Security(e) | Self::Permission(e) | Self::Profile(e) => e,
        }
    }
}

pub struct DeleteOutcome {
    /// Email extracted from the security response, empty when unavailable.
    pub correo: String,
}

impl UserOrchestrator {
    pub fn new(domain: DomainClient, profile: ProfileClient) -> Self {
        Self { domain, profile }
    }

    /// Composite registration: the security record is authoritative and goes
    /// first; profile creation is best-effort at creation time.
    pub async fn register(&self, body: &Map<String, Value>) -> Result<RegisterOutcome, ClientError> {
        let split = partition::split_register(body);
        let usuario = body
            .get("usuario")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let security = self
            .domain
            .register_user(&Value::Object(split.security))
            .await?;

        if split.profile.is_empty() || usuario.is_empty() {
            return Ok(RegisterOutcome::SecurityOnly { security });
        }

        tracing::info!(%usuario, "Creating profile for new user");
        match self
            .profile
            .create_profile(&usuario, &Value::Object(split.profile))
            .await
        {
            Ok(profile) => Ok(RegisterOutcome::Complete { security, profile }),
            Err(e) => {
                tracing::warn!(%usuario, "User registered but profile creation failed: {}", e);
                Ok(RegisterOutcome::ProfilePending { security })
            }
        }
    }

    /// Composite update: split the payload, security first.
    pub async fn update(
        &self,
        usuario: &str,
        body: &Map<String, Value>,
        token: &str,
    ) -> Result<UpdateResult, UpdateError> {
        let split = partition::split_update(body);

        if split.security.is_empty() && split.profile.is_empty() {
            return Ok(UpdateResult {
                mensaje: "No hay datos para actualizar",
                security: json!({}),
                profile: json!({}),
            });
        }

        if split.security.is_empty() {
            // Profile-only update. The Profile Service does no authorization
            // of its own, so let the Domain Service vet the token first; it
            // answers 403/404 when the actor may not touch this username.
            self.domain
                .fetch_user(usuario, token)
                .await
                .map_err(UpdateError::Permission)?;

            let profile = self
                .profile
                .update_profile(usuario, &Value::Object(split.profile))
                .await
                .map_err(UpdateError::Profile)?;
            return Ok(UpdateResult {
                mensaje: "Usuario actualizado exitosamente",
                security: json!({}),
                profile,
            });
        }

        let security = self
            .domain
            .update_user(usuario, &Value::Object(split.security), token)
            .await
            .map_err(UpdateError::Security)?;
        tracing::info!(%usuario, "Security update succeeded");

        if split.profile.is_empty() {
            return Ok(UpdateResult {
                mensaje: "Usuario actualizado exitosamente",
                security,
                profile: json!({}),
            });
        }

        match self
            .profile
            .update_profile(usuario, &Value::Object(split.profile))
            .await
        {
            Ok(profile) => Ok(UpdateResult {
                mensaje: "Usuario actualizado exitosamente",
                security,
                profile,
            }),
            Err(e) => {
                // The committed security update must stand; report partial.
                tracing::warn!(%usuario, "Profile update failed after security update: {}", e);
                Ok(UpdateResult {
                    mensaje: "Usuario actualizado parcialmente (solo seguridad)",
                    security,
                    profile: json!({}),
                })
            }
        }
    }

    /// Composite delete: the security record first. A missing profile is an
    /// acceptable end state, and any other profile failure is swallowed once
    /// the security record is gone.
    pub async fn delete(&self, usuario: &str, token: &str) -> Result<DeleteOutcome, ClientError> {
        let security = self.domain.delete_user(usuario, token).await?;

        match self.profile.delete_profile(usuario).await {
            Ok(()) => {}
            Err(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND) => {
                tracing::debug!(%usuario, "No profile to delete");
            }
            Err(e) => {
                tracing::warn!(%usuario, "Profile deletion failed: {}", e);
            }
        }

        Ok(DeleteOutcome {
            correo: dominio::extract_email(&security),
        })
    }

    /// Composite fetch: both sub-fetches run concurrently and each failure
    /// degrades to an omitted field. The result always carries the username.
    pub async fn fetch(&self, usuario: &str, token: &str) -> Value {
        let (security, profile) = tokio::join!(
            self.domain.fetch_user(usuario, token),
            self.profile.fetch_profile(usuario),
        );

        let mut result = Map::new();
        result.insert("usuario".to_string(), json!(usuario));

        match profile {
            Ok(profile) if !is_empty_object(&profile) => {
                result.insert("perfil".to_string(), profile);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(%usuario, "Failed to fetch profile: {}", e);
            }
        }

        match security {
            Ok(Some(record)) => {
                result.insert("datosSeguridad".to_string(), record);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(%usuario, "Failed to fetch security record: {}", e);
            }
        }

        Value::Object(result)
    }
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty) || value.is_null()
}
