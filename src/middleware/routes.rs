use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;

use super::cookies;
use super::error::AuthError;
use super::extractor::SessionClaims;
use super::state::AuthState;
use super::types::{LoginBody, SelectRoleBody};
use crate::error::{Error, ErrorCode};
use crate::types::{CredentialBundle, Landing, SessionView};

/// Create the session authentication router.
///
/// Mounts `login`, `refresh`, `select-role`, `logout` (POST) and `landing`
/// (GET) under the configured auth path.
pub fn auth_routes(state: AuthState) -> Router {
    let auth_path = state.settings.auth_path.clone();

    Router::new()
        .route(&format!("{auth_path}/login"), post(login))
        .route(&format!("{auth_path}/refresh"), post(refresh))
        .route(&format!("{auth_path}/select-role"), post(select_role))
        .route(&format!("{auth_path}/logout"), post(logout))
        .route(&format!("{auth_path}/landing"), get(landing))
        .with_state(state)
}

type SessionResponse = Result<(CookieJar, Json<SessionView>), AuthError>;

// ── Login ──────────────────────────────────────────────────────────

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> SessionResponse {
    let bundle = state
        .client
        .login(&body.identifier, &body.secret)
        .await
        .map_err(|e| log_issuer_failure(e, "Login failed"))?;

    tracing::info!(
        roles = ?bundle.roles,
        needs_profile_selection = bundle.needs_profile_selection,
        "Login successful"
    );
    Ok(persist(jar, &state, &bundle))
}

// ── Refresh ────────────────────────────────────────────────────────

async fn refresh(State(state): State<AuthState>, jar: CookieJar) -> SessionResponse {
    let refresh_token = cookies::get_credential(&jar, &state.settings.refresh_cookie_name)
        .ok_or(AuthError::Unauthenticated(ErrorCode::MissingRefreshCredential))?;

    let bundle = state
        .client
        .refresh(&refresh_token)
        .await
        .map_err(|e| log_issuer_failure(e, "Refresh failed"))?;

    tracing::debug!("Session credentials rotated");
    Ok(persist(jar, &state, &bundle))
}

// ── Select role ────────────────────────────────────────────────────

async fn select_role(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(body): Json<SelectRoleBody>,
) -> SessionResponse {
    let refresh_token = cookies::get_credential(&jar, &state.settings.refresh_cookie_name)
        .ok_or(AuthError::Unauthenticated(ErrorCode::MissingRefreshCredential))?;

    let bundle = state
        .client
        .select_role(&refresh_token, body.role)
        .await
        .map_err(|e| log_issuer_failure(e, "Role selection failed"))?;

    tracing::info!(role = %body.role, selected_role = ?bundle.selected_role, "Role selected");
    Ok(persist(jar, &state, &bundle))
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout(State(state): State<AuthState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    tracing::info!("Logout");
    (
        cookies::clear_session(jar, &state.settings),
        StatusCode::NO_CONTENT,
    )
}

// ── Landing ────────────────────────────────────────────────────────

async fn landing(SessionClaims(claims): SessionClaims) -> Json<Landing> {
    Json(Landing {
        path: claims.landing_path().to_string(),
    })
}

// ── Helpers ────────────────────────────────────────────────────────

/// Both cookies are set before the response leaves, so the browser never
/// observes half a rotation.
fn persist(
    jar: CookieJar,
    state: &AuthState,
    bundle: &CredentialBundle,
) -> (CookieJar, Json<SessionView>) {
    let jar = cookies::store_bundle(jar, &state.settings, bundle);
    (jar, Json(SessionView::from(bundle)))
}

fn log_issuer_failure(e: Error, message: &'static str) -> AuthError {
    match &e {
        Error::Rejected {
            operation, status, ..
        } => {
            tracing::warn!(operation, status, code = ?e.code(), "{message}");
        }
        _ => tracing::error!(error = %e, "{message}"),
    }
    AuthError::from(e)
}
