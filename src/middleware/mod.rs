//! Cookie-backed session authentication for Axum.
//!
//! Credentials issued by the external issuer live in two http-only cookies;
//! the route guard reads the access cookie on every request and the auth
//! routes rotate both cookies on login, refresh and role selection.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cppd_accounts::middleware::{AuthState, SessionAuthConfig, auth_routes, route_guard};
//!
//! // 1. Configure from environment (API_BASE_URL)
//! let state = AuthState::new(SessionAuthConfig::from_env()?);
//!
//! // 2. Mount auth routes and guard the pages
//! let app = axum::Router::new()
//!     .merge(pages)
//!     .merge(auth_routes(state.clone()))
//!     .layer(axum::middleware::from_fn_with_state(state, route_guard));
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod guard;
mod routes;
mod state;
mod types;

pub use config::SessionAuthConfig;
pub use error::AuthError;
pub use extractor::SessionClaims;
pub use guard::{AuthDecision, GuardOutcome, GuardState, RoleRule, RouteTable, evaluate, route_guard};
pub use routes::auth_routes;
pub use state::AuthState;
