//! Splitting an inbound user payload into the sub-payloads owned by each
//! downstream service.
//!
//! Membership is decided by fixed field-name allowlists: presence of a key
//! decides where it goes, its value is never inspected. Keys outside both
//! lists are dropped and never forwarded.

use serde_json::{Map, Value};

/// Fields owned by the Domain Service on update (PATCH).
pub const SECURITY_FIELDS: [&str; 3] = ["correo", "clave", "numeroTelefono"];

/// Fields owned by the Profile Service.
pub const PROFILE_FIELDS: [&str; 13] = [
    "apodo",
    "biografia",
    "urlPaginaPersonal",
    "informacionContactoPublica",
    "direccionCorrespondencia",
    "organizacion",
    "paisResidencia",
    "linkFacebook",
    "linkTwitter",
    "linkLinkedIn",
    "linkInstagram",
    "linkGithub",
    "linkOtraRed",
];

/// The two disjoint sub-payloads produced by a split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Split {
    pub security: Map<String, Value>,
    pub profile: Map<String, Value>,
}

fn collect(body: &Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    let mut subset = Map::new();
    for field in fields {
        if let Some(value) = body.get(*field) {
            subset.insert((*field).to_string(), value.clone());
        }
    }
    subset
}

/// Split an update payload. `usuario` is not an updatable security field;
/// the username travels in the request path.
pub fn split_update(body: &Map<String, Value>) -> Split {
    Split {
        security: collect(body, &SECURITY_FIELDS),
        profile: collect(body, &PROFILE_FIELDS),
    }
}

/// Split a registration payload. Registration additionally carries the
/// username inside the security sub-payload.
pub fn split_register(body: &Map<String, Value>) -> Split {
    let mut security = collect(body, &SECURITY_FIELDS);
    if let Some(usuario) = body.get("usuario") {
        security.insert("usuario".to_string(), usuario.clone());
    }
    Split {
        security,
        profile: collect(body, &PROFILE_FIELDS),
    }
}
