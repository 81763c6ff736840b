#![doc = include_str!("../README.md")]

pub mod claims;
#[cfg(feature = "client")]
pub mod client;
pub mod duration;
pub mod error;
#[cfg(feature = "issuer")]
pub mod issuer;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod types;

// Re-exports for convenient access
pub use claims::decode_claims;
pub use duration::parse_duration;
pub use error::{Error, ErrorCode};
#[cfg(feature = "issuer")]
pub use issuer::{IssuerClient, IssuerConfig};
pub use types::{
    AccessClaims, CredentialBundle, Landing, PrincipalId, Role, SessionView, landing_for,
};
