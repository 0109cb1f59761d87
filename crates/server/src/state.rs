use podsearch_core::{Config, PodcastService, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    service: PodcastService,
}

impl AppState {
    pub fn new(config: Config, service: PodcastService) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn service(&self) -> &PodcastService {
        &self.service
    }
}
