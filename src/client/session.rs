use reqwest::StatusCode;
use serde::Serialize;

use super::role_selection::Navigation;
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::Error;
use crate::types::{Landing, Role, SessionView};

#[derive(Serialize)]
struct LoginBody<'a> {
    identifier: &'a str,
    secret: &'a str,
}

#[derive(Serialize)]
struct SelectRoleBody {
    role: Role,
}

/// Browser-side session manager.
///
/// Wraps a [`Transport`] so that a `401` triggers exactly one silent refresh
/// followed by one replay, and exposes the login/role-selection/logout calls
/// of the auth routes.
pub struct SessionClient<T> {
    transport: T,
    auth_path: String,
}

impl<T: Transport> SessionClient<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            auth_path: "/api/auth".into(),
        }
    }

    /// Override the auth route prefix (default `/api/auth`).
    #[must_use]
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.auth_path = path.into();
        self
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn auth_url(&self, action: &str) -> String {
        format!("{}/{action}", self.auth_path)
    }

    /// Send `request`; on a `401`, refresh once and replay it once.
    ///
    /// When the refresh fails the original `401` response is returned as-is.
    /// A `401` on the replay is returned as well; there is no second refresh.
    ///
    /// # Errors
    ///
    /// Only transport failures of the original request or of the replay.
    pub async fn guarded_fetch(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let response = self.transport.send(request.clone()).await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        match self.refresh().await {
            Ok(_) => {
                tracing::debug!(path = %request.path, "Session refreshed, replaying request");
                self.transport.send(request).await
            }
            Err(e) => {
                tracing::debug!(path = %request.path, error = %e, "Session refresh failed");
                Ok(response)
            }
        }
    }

    /// Rotate the session credentials.
    ///
    /// # Errors
    ///
    /// [`Error::Rejected`] with the auth route's status and body, or a
    /// transport error.
    pub async fn refresh(&self) -> Result<SessionView, Error> {
        let response = self
            .transport
            .send(ApiRequest::post(self.auth_url("refresh")))
            .await?;
        session_view(response, "refresh")
    }

    /// Log in and work out where to go next.
    ///
    /// # Errors
    ///
    /// [`Error::Rejected`] carrying the issuer's answer for bad credentials.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Navigation, Error> {
        let request =
            ApiRequest::post(self.auth_url("login")).json(&LoginBody { identifier, secret })?;
        let response = self.transport.send(request).await?;
        let view = session_view(response, "login")?;
        Ok(Navigation::after_login(view))
    }

    /// Fix `role` as the active role of the session.
    ///
    /// # Errors
    ///
    /// [`Error::Rejected`] when the auth route or issuer refuses the role or
    /// the refresh credential.
    pub async fn select_role(&self, role: Role) -> Result<SessionView, Error> {
        let request = ApiRequest::post(self.auth_url("select-role")).json(&SelectRoleBody { role })?;
        let response = self.transport.send(request).await?;
        session_view(response, "select-role")
    }

    /// Clear both credential cookies.
    ///
    /// # Errors
    ///
    /// [`Error::Rejected`] on a non-success answer, or a transport error.
    pub async fn logout(&self) -> Result<(), Error> {
        let response = self
            .transport
            .send(ApiRequest::post(self.auth_url("logout")))
            .await?;
        ensure_success(response, "logout").map(|_| ())
    }

    /// Role-appropriate landing path of the current principal, used by the
    /// forbidden page's way back.
    ///
    /// # Errors
    ///
    /// [`Error::Rejected`] when no usable access credential remains.
    pub async fn landing(&self) -> Result<String, Error> {
        let response = self
            .guarded_fetch(ApiRequest::get(self.auth_url("landing")))
            .await?;
        let landing: Landing = ensure_success(response, "landing")?.json()?;
        Ok(landing.path)
    }
}

fn ensure_success(response: ApiResponse, operation: &'static str) -> Result<ApiResponse, Error> {
    if response.is_success() {
        return Ok(response);
    }
    Err(Error::Rejected {
        operation,
        status: response.status.as_u16(),
        detail: response.text(),
        content_type: response
            .headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    })
}

fn session_view(response: ApiResponse, operation: &'static str) -> Result<SessionView, Error> {
    ensure_success(response, operation)?.json()
}
