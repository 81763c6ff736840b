use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::types::{CredentialBundle, Role};

/// Endpoints of the external credential issuer.
///
/// The base URL is injected; nothing is read from process-wide state.
///
/// ```rust,ignore
/// use cppd_accounts::IssuerConfig;
///
/// let config = IssuerConfig::new("https://api.example.com/auth".parse()?)?;
/// // Optional overrides via chaining:
/// let config = config.with_refresh_url("https://api.example.com/token/refresh".parse()?);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct IssuerConfig {
    pub(crate) login_url: Url,
    pub(crate) refresh_url: Url,
    pub(crate) select_role_url: Url,
}

impl IssuerConfig {
    /// Derive `{base}/login`, `{base}/refresh-token` and `{base}/select-role`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` cannot carry a path.
    pub fn new(base_url: Url) -> Result<Self, Error> {
        Ok(Self {
            login_url: endpoint(&base_url, "login")?,
            refresh_url: endpoint(&base_url, "refresh-token")?,
            select_role_url: endpoint(&base_url, "select-role")?,
        })
    }

    #[must_use]
    pub fn with_login_url(mut self, url: Url) -> Self {
        self.login_url = url;
        self
    }

    #[must_use]
    pub fn with_refresh_url(mut self, url: Url) -> Self {
        self.refresh_url = url;
        self
    }

    #[must_use]
    pub fn with_select_role_url(mut self, url: Url) -> Self {
        self.select_role_url = url;
        self
    }

    #[must_use]
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    #[must_use]
    pub fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }

    #[must_use]
    pub fn select_role_url(&self) -> &Url {
        &self.select_role_url
    }
}

fn endpoint(base: &Url, segment: &str) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::Config(format!("issuer base URL cannot be a base: {base}")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    secret: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectRoleRequest<'a> {
    refresh_token: &'a str,
    role: Role,
}

#[derive(Deserialize)]
struct Envelope {
    data: CredentialBundle,
}

/// Client for the credential issuer.
///
/// Every successful call returns a freshly rotated [`CredentialBundle`];
/// the credentials it replaces must not be presented again.
pub struct IssuerClient {
    config: IssuerConfig,
    http: reqwest::Client,
}

impl IssuerClient {
    #[must_use]
    pub fn new(config: IssuerConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Exchange an identifier/secret pair for a credential bundle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Rejected`]
    /// carrying the issuer's status and body (e.g. invalid credentials).
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<CredentialBundle, Error> {
        let body = LoginRequest { identifier, secret };
        self.post(&self.config.login_url, &body, "login").await
    }

    /// Rotate both credentials using the refresh credential.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRefreshCredential`] for an empty credential,
    /// [`Error::Http`] on network failure, or [`Error::Rejected`] if the
    /// issuer refuses it (expired, already rotated, unknown).
    pub async fn refresh(&self, refresh_token: &str) -> Result<CredentialBundle, Error> {
        if refresh_token.is_empty() {
            return Err(Error::MissingRefreshCredential);
        }
        let body = RefreshRequest { refresh_token };
        self.post(&self.config.refresh_url, &body, "refresh").await
    }

    /// Rotate both credentials with `role` fixed as the selected role.
    ///
    /// Whether `role` was granted is left to the issuer.
    ///
    /// # Errors
    ///
    /// Same as [`refresh`](Self::refresh).
    pub async fn select_role(
        &self,
        refresh_token: &str,
        role: Role,
    ) -> Result<CredentialBundle, Error> {
        if refresh_token.is_empty() {
            return Err(Error::MissingRefreshCredential);
        }
        let body = SelectRoleRequest {
            refresh_token,
            role,
        };
        self.post(&self.config.select_role_url, &body, "select-role")
            .await
    }

    async fn post<B: Serialize>(
        &self,
        url: &Url,
        body: &B,
        operation: &'static str,
    ) -> Result<CredentialBundle, Error> {
        let response = self.http.post(url.clone()).json(body).send().await?;
        let response = Self::ensure_success(response, operation).await?;
        let envelope = response.json::<Envelope>().await?;
        tracing::debug!(
            operation,
            roles = ?envelope.data.roles,
            selected_role = ?envelope.data.selected_role,
            "Issuer returned rotated credentials"
        );
        Ok(envelope.data)
    }

    /// Checks HTTP response status; returns the response on success or the
    /// issuer's status and body untouched.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.unwrap_or_default();
        Err(Error::Rejected {
            operation,
            status,
            detail: body,
            content_type,
        })
    }
}
