use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Landing route of the professor area.
pub const PROFESSOR_LANDING: &str = "/professor";
/// Landing route of the CPPD committee area.
pub const COMMITTEE_LANDING: &str = "/cppd";
/// Landing route of the admin dashboard (also the fallback).
pub const DASHBOARD_LANDING: &str = "/dashboard";

/// Role a principal can be granted by the issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Docente,
    CppdMember,
    Admin,
}

impl Role {
    /// Wire name, as carried in claims and issuer payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docente => "DOCENTE",
            Self::CppdMember => "CPPD_MEMBER",
            Self::Admin => "ADMIN",
        }
    }

    /// Route the principal lands on after acting under this role.
    #[must_use]
    pub fn landing_path(self) -> &'static str {
        match self {
            Self::Docente => PROFESSOR_LANDING,
            Self::CppdMember => COMMITTEE_LANDING,
            Self::Admin => DASHBOARD_LANDING,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DOCENTE" => Ok(Self::Docente),
            "CPPD_MEMBER" => Ok(Self::CppdMember),
            "ADMIN" => Ok(Self::Admin),
            other => Err(Error::Decode(format!("unknown role: {other}"))),
        }
    }
}

/// Landing route for an optional selected role; no role lands on the dashboard.
#[must_use]
pub fn landing_for(selected: Option<Role>) -> &'static str {
    selected.map_or(DASHBOARD_LANDING, Role::landing_path)
}

/// Stable principal identifier (the credential `sub` claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct PrincipalId(pub String);

// Claims are routing hints only: a field of unexpected shape is dropped
// instead of failing the whole payload.

// Issuers emit numeric or string subjects.
fn lenient_principal<'de, D>(deserializer: D) -> Result<Option<PrincipalId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(PrincipalId(s)),
        Some(serde_json::Value::Number(n)) => Some(PrincipalId(n.to_string())),
        _ => None,
    })
}

// Unknown role names are skipped; null or a non-array means no roles.
fn lenient_roles<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(serde_json::Value::as_str)
            .filter_map(|name| name.parse().ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<serde_json::Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|name| name.parse().ok()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<serde_json::Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(serde_json::Value::as_i64))
}

/// Claims read from the middle segment of an access credential.
///
/// Never verified locally; only used for routing hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    #[serde(
        default,
        deserialize_with = "lenient_principal",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub: Option<PrincipalId>,
    #[serde(default, deserialize_with = "lenient_roles")]
    pub roles: Vec<Role>,
    #[serde(default, deserialize_with = "lenient_role")]
    pub selected_role: Option<Role>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<i64>,
}

impl AccessClaims {
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Where the principal belongs: the selected role, else the only granted
    /// role, else the dashboard.
    #[must_use]
    pub fn landing_path(&self) -> &'static str {
        match (self.selected_role, self.roles.as_slice()) {
            (Some(role), _) | (None, &[role]) => role.landing_path(),
            _ => DASHBOARD_LANDING,
        }
    }
}

/// Credentials and session facts produced by every login, refresh and
/// role selection. Each new bundle supersedes both previous credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialBundle {
    pub access_token: String,
    pub expires_in: String,
    pub refresh_token: String,
    pub refresh_expires_in: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub selected_role: Option<Role>,
    #[serde(default)]
    pub needs_profile_selection: bool,
    #[serde(default)]
    pub first_access: bool,
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_token", &"[redacted]")
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &"[redacted]")
            .field("refresh_expires_in", &self.refresh_expires_in)
            .field("roles", &self.roles)
            .field("selected_role", &self.selected_role)
            .field("needs_profile_selection", &self.needs_profile_selection)
            .field("first_access", &self.first_access)
            .finish()
    }
}

/// Session facts exposed to the browser; the credentials stay in cookies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub selected_role: Option<Role>,
    #[serde(default)]
    pub needs_profile_selection: bool,
    #[serde(default)]
    pub first_access: bool,
}

impl From<&CredentialBundle> for SessionView {
    fn from(bundle: &CredentialBundle) -> Self {
        Self {
            roles: bundle.roles.clone(),
            selected_role: bundle.selected_role,
            needs_profile_selection: bundle.needs_profile_selection,
            first_access: bundle.first_access,
        }
    }
}

/// Body of the landing-route lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landing {
    pub path: String,
}
