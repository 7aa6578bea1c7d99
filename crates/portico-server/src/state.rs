use std::sync::Arc;

use crate::clients::{DomainClient, ProfileClient};
use crate::config::ServerConfig;
use crate::messaging::EventPublisher;
use crate::orchestrator::UserOrchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub domain: DomainClient,
    pub profile: ProfileClient,
    pub orchestrator: UserOrchestrator,
    pub events: Arc<dyn EventPublisher>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        domain: DomainClient,
        profile: ProfileClient,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        let orchestrator = UserOrchestrator::new(domain.clone(), profile.clone());
        Self {
            config: Arc::new(config),
            domain,
            profile,
            orchestrator,
            events,
        }
    }
}
