use url::Url;

use super::error::AuthError;
use super::guard::RouteTable;
use crate::issuer::{IssuerClient, IssuerConfig};

/// Shared auth settings used by both config and runtime state.
#[derive(Debug, Clone)]
pub(crate) struct AuthSettings {
    pub(crate) access_cookie_name: String,
    pub(crate) refresh_cookie_name: String,
    pub(crate) secure_cookies: bool,
    pub(crate) auth_path: String,
    pub(crate) login_path: String,
    pub(crate) forbidden_path: String,
    pub(crate) routes: RouteTable,
}

impl AuthSettings {
    pub(crate) fn defaults() -> Self {
        Self {
            access_cookie_name: "accessToken".into(),
            refresh_cookie_name: "refreshToken".into(),
            secure_cookies: true,
            auth_path: "/api/auth".into(),
            login_path: "/login".into(),
            forbidden_path: "/forbidden".into(),
            routes: RouteTable::default(),
        }
    }
}

/// Session authentication configuration.
///
/// The issuer client is a constructor parameter, so there is no runtime
/// "missing field" error and no module-level base URL.
///
/// Use [`from_env()`](SessionAuthConfig::from_env) for convention-based setup,
/// or [`new()`](SessionAuthConfig::new) with `with_*` methods for full control.
pub struct SessionAuthConfig {
    pub(super) client: IssuerClient,
    pub(super) settings: AuthSettings,
}

impl SessionAuthConfig {
    #[must_use]
    pub fn new(client: IssuerClient) -> Self {
        Self {
            client,
            settings: AuthSettings::defaults(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `API_BASE_URL`: base URL of the credential issuer
    ///
    /// # Optional env vars
    /// - `DEV_AUTH`: Set to `"1"` or `"true"` to drop the `Secure` cookie flag
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if `API_BASE_URL` is missing or invalid.
    pub fn from_env() -> Result<Self, AuthError> {
        let base = std::env::var("API_BASE_URL")
            .map_err(|_| AuthError::Config("API_BASE_URL is required".into()))?;
        Self::from_values(&base, std::env::var("DEV_AUTH").ok().as_deref())
    }

    fn from_values(base: &str, dev_auth: Option<&str>) -> Result<Self, AuthError> {
        let base_url: Url = base
            .parse()
            .map_err(|e| AuthError::Config(format!("API_BASE_URL: {e}")))?;
        let issuer = IssuerConfig::new(base_url)
            .map_err(|e| AuthError::Config(format!("API_BASE_URL: {e}")))?;

        let dev_auth = matches!(dev_auth, Some("1" | "true"));

        Ok(Self::new(IssuerClient::new(issuer)).with_secure_cookies(!dev_auth))
    }

    #[must_use]
    pub fn with_access_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.access_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_refresh_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.refresh_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.settings.auth_path = path.into();
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.settings.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_forbidden_path(mut self, path: impl Into<String>) -> Self {
        self.settings.forbidden_path = path.into();
        self
    }

    /// Replace the path table consulted by the route guard.
    #[must_use]
    pub fn with_route_table(mut self, routes: RouteTable) -> Self {
        self.settings.routes = routes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_defaults() {
        let config = SessionAuthConfig::from_values("https://api.example.com/auth", None).unwrap();
        assert!(config.settings.secure_cookies);
        assert_eq!(config.settings.access_cookie_name, "accessToken");
        assert_eq!(config.settings.refresh_cookie_name, "refreshToken");
        assert_eq!(
            config.client.config().login_url().as_str(),
            "https://api.example.com/auth/login"
        );
    }

    #[test]
    fn test_dev_auth_disables_secure() {
        let config =
            SessionAuthConfig::from_values("http://localhost:3001", Some("true")).unwrap();
        assert!(!config.settings.secure_cookies);

        let config = SessionAuthConfig::from_values("http://localhost:3001", Some("no")).unwrap();
        assert!(config.settings.secure_cookies);
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SessionAuthConfig::from_values("not a url", None);
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = SessionAuthConfig::from_values("http://localhost:3001", None)
            .unwrap()
            .with_auth_path("/auth")
            .with_login_path("/entrar")
            .with_forbidden_path("/negado");
        assert_eq!(config.settings.auth_path, "/auth");
        assert_eq!(config.settings.login_path, "/entrar");
        assert_eq!(config.settings.forbidden_path, "/negado");
    }
}
