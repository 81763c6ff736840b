use serde::{Deserialize, Serialize};

/// Failure vocabulary shared by the guard, the auth routes and the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    /// No access or refresh cookie where one is required.
    MissingCredential,
    /// Refresh or role selection attempted without a refresh cookie.
    MissingRefreshCredential,
    /// Issuer rejected the identifier/secret pair.
    InvalidCredentials,
    /// Issuer rejected the refresh credential (expired, rotated away or unknown).
    InvalidRefreshToken,
    /// Route requires a role the principal was not granted.
    RoleNotGranted,
    /// Access credential could not be decoded; handled like a missing one.
    MalformedCredential,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::MissingRefreshCredential => "MISSING_REFRESH_CREDENTIAL",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::RoleNotGranted => "ROLE_NOT_GRANTED",
            Self::MalformedCredential => "MALFORMED_CREDENTIAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Upstream answered with a non-success status; body kept verbatim.
    #[error("{operation} rejected (status {status}): {detail}")]
    Rejected {
        operation: &'static str,
        status: u16,
        detail: String,
        /// `Content-Type` of the rejection, when upstream sent one.
        content_type: Option<String>,
    },
    #[cfg(any(feature = "issuer", feature = "client"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Missing refresh credential")]
    MissingRefreshCredential,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

impl Error {
    /// Maps the failure onto the shared vocabulary, when it belongs to it.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::MissingRefreshCredential => Some(ErrorCode::MissingRefreshCredential),
            Self::Rejected {
                operation, status, ..
            } if matches!(status, 400 | 401 | 403) => {
                if *operation == "login" {
                    Some(ErrorCode::InvalidCredentials)
                } else {
                    Some(ErrorCode::InvalidRefreshToken)
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_login_maps_to_invalid_credentials() {
        let err = Error::Rejected {
            operation: "login",
            status: 401,
            detail: "{}".into(),
            content_type: None,
        };
        assert_eq!(err.code(), Some(ErrorCode::InvalidCredentials));
    }

    #[test]
    fn rejected_refresh_maps_to_invalid_refresh_token() {
        let err = Error::Rejected {
            operation: "refresh",
            status: 401,
            detail: String::new(),
            content_type: None,
        };
        assert_eq!(err.code(), Some(ErrorCode::InvalidRefreshToken));

        let server_side = Error::Rejected {
            operation: "refresh",
            status: 500,
            detail: String::new(),
            content_type: None,
        };
        assert_eq!(server_side.code(), None);
    }

    #[test]
    fn code_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::MissingRefreshCredential).unwrap(),
            "\"MISSING_REFRESH_CREDENTIAL\""
        );
        assert_eq!(ErrorCode::RoleNotGranted.to_string(), "ROLE_NOT_GRANTED");
    }
}
