use crate::config::ServerConfig;
use sentihotel::{ModelRegistry, Readiness};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Init-once handle to the encoder/classifier pair, shared across requests
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    /// Create new server state. Model loading happens separately (eagerly at
    /// startup in the binary, lazily in tests that never touch the models).
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(ModelRegistry::new(config.models.clone()));
        Self {
            config: Arc::new(config),
            registry,
        }
    }

    /// Current model readiness, for the readiness probe.
    pub fn readiness(&self) -> Readiness {
        self.registry.readiness()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::ModelConfig;

    #[test]
    fn new_state_has_unloaded_registry() {
        let state = AppState::new(ServerConfig::default());
        assert_eq!(state.readiness(), Readiness::NotLoaded);
    }

    #[tokio::test]
    async fn stub_state_becomes_ready_after_load() {
        let config = ServerConfig {
            models: ModelConfig {
                mode: "stub".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let state = AppState::new(config);
        state.registry.get_or_load().await.unwrap();
        assert_eq!(state.readiness(), Readiness::Ready);
    }
}
