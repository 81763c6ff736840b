//! Path-based route guard.
//!
//! The decision is a pure function of the request path and the access
//! credential cookie; no server-side session is consulted. Claims are read
//! without signature verification, so the guard is a routing convenience:
//! the protected API re-checks the credential on every call.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use super::cookies;
use super::state::AuthState;
use crate::claims::decode_claims;
use crate::error::ErrorCode;
use crate::types::Role;

/// One role-scoped prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRule {
    pub prefix: String,
    pub role: Role,
}

/// Declarative path table consumed by the guard.
///
/// Only paths under one of `matched_prefixes` are evaluated at all; every
/// other path bypasses the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub matched_prefixes: Vec<String>,
    pub public_exact: Vec<String>,
    pub public_prefixes: Vec<String>,
    pub role_rules: Vec<RoleRule>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            matched_prefixes: owned(&[
                "/",
                "/login",
                "/register-professor",
                "/dashboard",
                "/professor",
                "/cppd",
                "/forbidden",
            ]),
            public_exact: owned(&["/", "/favicon.ico", "/robots.txt"]),
            public_prefixes: owned(&[
                "/login",
                "/register-professor",
                "/api/public",
                "/_next",
                "/static",
                "/assets",
            ]),
            role_rules: vec![
                RoleRule {
                    prefix: "/professor".into(),
                    role: Role::Docente,
                },
                RoleRule {
                    prefix: "/cppd".into(),
                    role: Role::CppdMember,
                },
            ],
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl RouteTable {
    fn in_scope(&self, path: &str) -> bool {
        self.matched_prefixes.iter().any(|prefix| {
            if prefix == "/" {
                path == "/"
            } else {
                path.starts_with(prefix.as_str())
            }
        })
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_exact.iter().any(|p| p == path)
            || self
                .public_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Role required by the first matching role rule, if any.
    #[must_use]
    pub fn required_role(&self, path: &str) -> Option<Role> {
        self.role_rules
            .iter()
            .find(|rule| path.starts_with(rule.prefix.as_str()))
            .map(|rule| rule.role)
    }
}

/// Where a request ended up in the guard's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Outside the matcher; never evaluated.
    OutOfScope,
    Public,
    Unauthenticated,
    AuthenticatedNoRoleMatch,
    AuthenticatedRoleMatch,
}

/// Terminal action of the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    RedirectToLogin,
    RedirectToForbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOutcome {
    pub state: GuardState,
    pub decision: AuthDecision,
    /// Why the request was turned away.
    pub reason: Option<ErrorCode>,
}

impl GuardOutcome {
    const fn allow(state: GuardState) -> Self {
        Self {
            state,
            decision: AuthDecision::Allow,
            reason: None,
        }
    }

    const fn login(reason: ErrorCode) -> Self {
        Self {
            state: GuardState::Unauthenticated,
            decision: AuthDecision::RedirectToLogin,
            reason: Some(reason),
        }
    }
}

/// Evaluate the guard for `path` given the raw access credential, if any.
#[must_use]
pub fn evaluate(table: &RouteTable, path: &str, access_token: Option<&str>) -> GuardOutcome {
    if !table.in_scope(path) {
        return GuardOutcome::allow(GuardState::OutOfScope);
    }
    if table.is_public(path) {
        return GuardOutcome::allow(GuardState::Public);
    }

    let Some(token) = access_token.filter(|t| !t.is_empty()) else {
        return GuardOutcome::login(ErrorCode::MissingCredential);
    };
    let Some(claims) = decode_claims(token) else {
        return GuardOutcome::login(ErrorCode::MalformedCredential);
    };

    match table.required_role(path) {
        Some(role) if !claims.has_role(role) => GuardOutcome {
            state: GuardState::AuthenticatedNoRoleMatch,
            decision: AuthDecision::RedirectToForbidden,
            reason: Some(ErrorCode::RoleNotGranted),
        },
        _ => GuardOutcome::allow(GuardState::AuthenticatedRoleMatch),
    }
}

/// Axum middleware applying [`evaluate`] to every request.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/professor", get(professor_home))
///     .layer(axum::middleware::from_fn_with_state(auth_state, route_guard));
/// ```
pub async fn route_guard(
    State(state): State<AuthState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let token = cookies::get_credential(&jar, &state.settings.access_cookie_name);
    let outcome = evaluate(&state.settings.routes, &path, token.as_deref());

    match outcome.decision {
        AuthDecision::Allow => next.run(request).await,
        AuthDecision::RedirectToLogin => {
            tracing::debug!(path = %path, reason = ?outcome.reason, "Guard redirecting to login");
            Redirect::to(&state.settings.login_path).into_response()
        }
        AuthDecision::RedirectToForbidden => {
            tracing::debug!(path = %path, reason = ?outcome.reason, "Guard redirecting to forbidden");
            Redirect::to(&state.settings.forbidden_path).into_response()
        }
    }
}
