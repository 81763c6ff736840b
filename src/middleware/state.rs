use std::sync::Arc;

use super::config::{AuthSettings, SessionAuthConfig};
use crate::issuer::IssuerClient;

/// Shared state for the auth routes and the route guard.
#[derive(Clone)]
pub struct AuthState {
    pub(super) client: Arc<IssuerClient>,
    pub(super) settings: Arc<AuthSettings>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: SessionAuthConfig) -> Self {
        Self {
            client: Arc::new(config.client),
            settings: Arc::new(config.settings),
        }
    }
}

impl From<SessionAuthConfig> for AuthState {
    fn from(config: SessionAuthConfig) -> Self {
        Self::new(config)
    }
}
