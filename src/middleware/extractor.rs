use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::cookies;
use super::error::AuthError;
use super::state::AuthState;
use crate::claims::decode_claims;
use crate::error::ErrorCode;
use crate::types::AccessClaims;

/// Claims of the access credential cookie, decoded without verification.
///
/// Use as an Axum extractor for routing hints. Returns `401 Unauthorized`
/// when the cookie is missing or cannot be decoded.
///
/// # Example
///
/// ```rust,ignore
/// async fn forbidden_back_link(SessionClaims(claims): SessionClaims) -> impl IntoResponse {
///     claims.landing_path()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionClaims(pub AccessClaims);

impl FromRequestParts<AuthState> for SessionClaims {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = cookies::get_credential(&jar, &state.settings.access_cookie_name)
            .ok_or(AuthError::Unauthenticated(ErrorCode::MissingCredential))?;

        decode_claims(&token)
            .map(Self)
            .ok_or(AuthError::MalformedCredential)
    }
}
