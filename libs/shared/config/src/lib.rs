use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("MEDIBOOK_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MEDIBOOK_API_URL not set, using empty value");
                    String::new()
                }),
            request_timeout_secs: env::var("MEDIBOOK_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(30),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }
}
