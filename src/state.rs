//! Shared application state
//!
//! Cloned into every handler by the router.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::repositories::Repositories;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub jwt: JwtConfig,
    pub repos: Repositories,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repos: Repositories) -> Self {
        Self {
            jwt: JwtConfig::from(&config),
            rate_limit: RateLimitState::new(&config),
            config: Arc::new(config),
            repos,
        }
    }
}
