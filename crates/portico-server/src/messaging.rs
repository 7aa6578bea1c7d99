//! Best-effort publication of user-deletion events.
//!
//! Event publication must never perturb the HTTP response that triggered it:
//! every transport failure is logged and swallowed behind the trait.

use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use portico_common::models::evento::EventoDominio;

/// Topic exchange the gateway publishes domain events to.
pub const EVENTS_EXCHANGE: &str = "dominio.events";
/// Routing key for user-deletion events.
pub const DELETION_ROUTING_KEY: &str = "auth.deleted";

/// Sink for deletion events. Implementations are fire-and-forget: the
/// method returns once the attempt has been made, success or not.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_deletion(&self, usuario: &str, correo: &str);
}

/// AMQP-backed publisher. The connection handle is kept alongside the
/// channel so it outlives every publish.
pub struct AmqpEventPublisher {
    _connection: Connection,
    channel: Channel,
}

impl AmqpEventPublisher {
    /// Connect and declare the events exchange. Failures here are startup
    /// failures; the caller decides whether to fall back to
    /// [`DisabledEventPublisher`].
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let connection = Connection::connect(url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .exchange_declare(
                EVENTS_EXCHANGE,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        Ok(Self {
            _connection: connection,
            channel,
        })
    }

    async fn try_publish(&self, evento: &EventoDominio) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(evento)?;
        self.channel
            .basic_publish(
                EVENTS_EXCHANGE,
                DELETION_ROUTING_KEY,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await?
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for AmqpEventPublisher {
    async fn publish_deletion(&self, usuario: &str, correo: &str) {
        let evento = EventoDominio::eliminacion(usuario, correo);
        match self.try_publish(&evento).await {
            Ok(()) => {
                tracing::info!(%usuario, evento_id = %evento.id, "Deletion event published");
            }
            Err(e) => {
                tracing::error!(%usuario, "Failed to publish deletion event: {:#}", e);
            }
        }
    }
}

/// Stand-in used when AMQP is not configured or was unreachable at startup.
pub struct DisabledEventPublisher;

#[async_trait]
impl EventPublisher for DisabledEventPublisher {
    async fn publish_deletion(&self, usuario: &str, _correo: &str) {
        tracing::debug!(%usuario, "Event publishing disabled, dropping deletion event");
    }
}
