use serde::{Deserialize, Serialize};

/// Location of one downstream service: scheme/host/port plus the path
/// prefix its resources live under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub url: String,
    #[serde(default)]
    pub base_path: String,
}

/// Message-bus configuration. Optional: without it, deletion events are
/// dropped instead of published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmqpConfig {
    pub url: String,
}

fn default_request_timeout() -> u64 {
    10
}

/// Gateway configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String, // "0.0.0.0:8080"
    pub domain_service: UpstreamConfig,
    pub perfil_service: UpstreamConfig,
    pub amqp: Option<AmqpConfig>,
    /// Timeout applied to every outbound HTTP call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Load gateway config from a YAML file with PORTICO__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    use anyhow::Context;
    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("PORTICO")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", path))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
listen: "0.0.0.0:8080"
domain_service:
  url: "http://localhost:8081"
  base_path: "/api/v1"
perfil_service:
  url: "http://localhost:8082"
  base_path: "/api/v1/perfiles"
amqp:
  url: "amqp://localhost:5672"
request_timeout_secs: 5
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.domain_service.url, "http://localhost:8081");
        assert_eq!(config.domain_service.base_path, "/api/v1");
        assert_eq!(config.perfil_service.base_path, "/api/v1/perfiles");
        assert_eq!(config.amqp.unwrap().url, "amqp://localhost:5672");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_parse_config_without_amqp() {
        let yaml = r#"
listen: "0.0.0.0:8080"
domain_service:
  url: "http://localhost:8081"
perfil_service:
  url: "http://localhost:8082"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert!(config.amqp.is_none());
    }

    #[test]
    fn test_request_timeout_defaults() {
        let yaml = r#"
listen: "0.0.0.0:8080"
domain_service:
  url: "http://localhost:8081"
perfil_service:
  url: "http://localhost:8082"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_base_path_defaults_to_empty() {
        let yaml = r#"
listen: "0.0.0.0:8080"
domain_service:
  url: "http://localhost:8081"
perfil_service:
  url: "http://localhost:8082"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.domain_service.base_path, "");
        assert_eq!(config.perfil_service.base_path, "");
    }

    #[test]
    fn test_parse_missing_domain_service_fails() {
        let yaml = r#"
listen: "0.0.0.0:8080"
perfil_service:
  url: "http://localhost:8082"
"#;
        let result = serde_yml::from_str::<ServerConfig>(yaml);
        assert!(result.is_err(), "Config without domain_service should fail");
    }

    #[test]
    fn test_parse_missing_listen_fails() {
        let yaml = r#"
domain_service:
  url: "http://localhost:8081"
perfil_service:
  url: "http://localhost:8082"
"#;
        let result = serde_yml::from_str::<ServerConfig>(yaml);
        assert!(result.is_err(), "Config without listen should fail");
    }

    /// Serialize access to env vars in tests to avoid races between parallel tests
    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_env_override_domain_url() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let yaml = r#"
listen: "0.0.0.0:8080"
domain_service:
  url: "http://placeholder:8081"
perfil_service:
  url: "http://localhost:8082"
"#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, yaml.as_bytes()).unwrap();
        std::io::Write::flush(&mut file).unwrap();

        // SAFETY: test-only, serialized by ENV_MUTEX
        unsafe {
            std::env::set_var("PORTICO__DOMAIN_SERVICE__URL", "http://overridden:9999");
        }

        let config = load_config(file.path().to_str().unwrap()).unwrap();

        unsafe {
            std::env::remove_var("PORTICO__DOMAIN_SERVICE__URL");
        }

        assert_eq!(config.domain_service.url, "http://overridden:9999");
        // Non-overridden values preserved from YAML
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.perfil_service.url, "http://localhost:8082");
    }

    #[test]
    fn test_env_override_listen() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let yaml = r#"
listen: "0.0.0.0:8080"
domain_service:
  url: "http://localhost:8081"
perfil_service:
  url: "http://localhost:8082"
"#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, yaml.as_bytes()).unwrap();
        std::io::Write::flush(&mut file).unwrap();

        // SAFETY: test-only, serialized by ENV_MUTEX
        unsafe {
            std::env::set_var("PORTICO__LISTEN", "0.0.0.0:9090");
        }

        let config = load_config(file.path().to_str().unwrap()).unwrap();

        unsafe {
            std::env::remove_var("PORTICO__LISTEN");
        }

        assert_eq!(config.listen, "0.0.0.0:9090");
    }
}
