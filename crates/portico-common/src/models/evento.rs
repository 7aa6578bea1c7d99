use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action tag carried by user-deletion events.
pub const ACCION_ELIMINACION_USUARIO: &str = "ELIMINACION_USUARIO";

/// Domain event published to the message bus.
///
/// Consumers depend on the exact wire keys (`tipoAccion`, `fechaCreacion`,
/// `datos`), so the Spanish names are part of the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventoDominio {
    pub id: String,
    #[serde(rename = "tipoAccion")]
    pub tipo_accion: String,
    #[serde(rename = "fechaCreacion")]
    pub fecha_creacion: DateTime<Utc>,
    pub datos: DatosEliminacion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatosEliminacion {
    pub usuario: String,
    pub correo: String,
    #[serde(rename = "fechaEliminacion")]
    pub fecha_eliminacion: DateTime<Utc>,
}

impl EventoDominio {
    /// Build a fresh deletion event. Each call gets its own id and
    /// timestamps; the event represents "a deletion was attempted", so the
    /// email may be empty when the security record could not be read.
    pub fn eliminacion(usuario: &str, correo: &str) -> Self {
        let ahora = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            tipo_accion: ACCION_ELIMINACION_USUARIO.to_string(),
            fecha_creacion: ahora,
            datos: DatosEliminacion {
                usuario: usuario.to_string(),
                correo: correo.to_string(),
                fecha_eliminacion: ahora,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eliminacion_sets_action_and_data() {
        let evento = EventoDominio::eliminacion("john_doe", "john@example.com");
        assert_eq!(evento.tipo_accion, "ELIMINACION_USUARIO");
        assert_eq!(evento.datos.usuario, "john_doe");
        assert_eq!(evento.datos.correo, "john@example.com");
    }

    #[test]
    fn test_eliminacion_accepts_empty_correo() {
        let evento = EventoDominio::eliminacion("john_doe", "");
        assert_eq!(evento.datos.correo, "");
    }

    #[test]
    fn test_each_event_gets_fresh_id() {
        let a = EventoDominio::eliminacion("u", "c@d.com");
        let b = EventoDominio::eliminacion("u", "c@d.com");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_wire_keys_are_spanish() {
        let evento = EventoDominio::eliminacion("john_doe", "john@example.com");
        let json = serde_json::to_value(&evento).unwrap();
        assert!(json.get("tipoAccion").is_some());
        assert!(json.get("fechaCreacion").is_some());
        let datos = json.get("datos").unwrap();
        assert!(datos.get("fechaEliminacion").is_some());
        assert_eq!(datos["usuario"], "john_doe");
        assert_eq!(datos["correo"], "john@example.com");
    }

    #[test]
    fn test_timestamps_serialize_as_strings() {
        let evento = EventoDominio::eliminacion("u", "");
        let json = serde_json::to_value(&evento).unwrap();
        assert!(json["fechaCreacion"].is_string());
        assert!(json["datos"]["fechaEliminacion"].is_string());
    }

    #[test]
    fn test_round_trips_through_json() {
        let evento = EventoDominio::eliminacion("john_doe", "john@example.com");
        let text = serde_json::to_string(&evento).unwrap();
        let parsed: EventoDominio = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.id, evento.id);
        assert_eq!(parsed.datos.usuario, "john_doe");
    }
}
