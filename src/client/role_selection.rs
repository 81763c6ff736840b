use super::session::SessionClient;
use super::transport::Transport;
use crate::error::Error;
use crate::types::{Role, SessionView, landing_for};

/// Roles offered to a multi-role principal right after login.
///
/// Travels from the login step to the selection screen as a value; it is a
/// UI aid, not an authorization fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    pub roles: Vec<Role>,
    pub previous: Option<Role>,
}

/// Where the browser should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Login,
    RoleSelection(PendingSelection),
    Landing(&'static str),
}

impl Navigation {
    /// Route after a login answer: the selection screen when the issuer asks
    /// for one, otherwise the selected role's landing page.
    #[must_use]
    pub fn after_login(view: SessionView) -> Self {
        if view.needs_profile_selection {
            Self::RoleSelection(PendingSelection {
                roles: view.roles,
                previous: view.selected_role,
            })
        } else {
            Self::Landing(landing_for(view.selected_role))
        }
    }
}

/// Role selection screen state.
#[derive(Debug)]
pub struct RoleSelectionFlow {
    draft: PendingSelection,
}

impl RoleSelectionFlow {
    /// Open the screen with the draft handed over by login.
    ///
    /// # Errors
    ///
    /// Returns [`Navigation::Login`] when the screen is reached without a
    /// draft or with an empty one.
    pub fn enter(draft: Option<PendingSelection>) -> Result<Self, Navigation> {
        match draft {
            Some(draft) if !draft.roles.is_empty() => Ok(Self { draft }),
            _ => Err(Navigation::Login),
        }
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.draft.roles
    }

    #[must_use]
    pub fn previous(&self) -> Option<Role> {
        self.draft.previous
    }

    /// Ask the issuer to fix `role` and return the resulting landing page.
    ///
    /// The draft is not consulted: whether `role` is granted is the issuer's
    /// call. On error the flow stays usable for another attempt.
    ///
    /// # Errors
    ///
    /// Whatever [`SessionClient::select_role`] reports.
    pub async fn choose<T: Transport>(
        &self,
        client: &SessionClient<T>,
        role: Role,
    ) -> Result<Navigation, Error> {
        let view = client.select_role(role).await?;
        tracing::info!(
            offered = ?self.draft.roles,
            requested = %role,
            selected = ?view.selected_role,
            "Role selection complete"
        );
        Ok(Navigation::Landing(landing_for(view.selected_role)))
    }

    /// Drop the draft and end the session.
    ///
    /// # Errors
    ///
    /// Whatever [`SessionClient::logout`] reports; the draft is gone either way.
    pub async fn logout<T: Transport>(self, client: &SessionClient<T>) -> Result<Navigation, Error> {
        client.logout().await?;
        Ok(Navigation::Login)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::client::session::tests::{MockTransport, ok_json, status};

    fn multi_role_login() -> serde_json::Value {
        json!({
            "roles": ["DOCENTE", "CPPD_MEMBER"],
            "selectedRole": null,
            "needsProfileSelection": true,
            "firstAccess": false
        })
    }

    #[test]
    fn single_role_lands_directly() {
        let view = SessionView {
            roles: vec![Role::Docente],
            selected_role: Some(Role::Docente),
            needs_profile_selection: false,
            first_access: false,
        };
        assert_eq!(Navigation::after_login(view), Navigation::Landing("/professor"));
    }

    #[test]
    fn no_selected_role_lands_on_dashboard() {
        let view = SessionView {
            roles: vec![Role::Admin],
            selected_role: None,
            needs_profile_selection: false,
            first_access: true,
        };
        assert_eq!(Navigation::after_login(view), Navigation::Landing("/dashboard"));
    }

    #[test]
    fn missing_or_empty_draft_goes_back_to_login() {
        assert_eq!(RoleSelectionFlow::enter(None).unwrap_err(), Navigation::Login);
        let empty = PendingSelection {
            roles: vec![],
            previous: None,
        };
        assert_eq!(RoleSelectionFlow::enter(Some(empty)).unwrap_err(), Navigation::Login);
    }

    #[tokio::test]
    async fn multi_role_login_then_committee_selection() {
        let client = SessionClient::new(
            MockTransport::default()
                .script("/api/auth/login", ok_json(&multi_role_login()))
                .script(
                    "/api/auth/select-role",
                    ok_json(&json!({
                        "roles": ["DOCENTE", "CPPD_MEMBER"],
                        "selectedRole": "CPPD_MEMBER",
                        "needsProfileSelection": false,
                        "firstAccess": false
                    })),
                ),
        );

        let Navigation::RoleSelection(draft) = client.login("ana", "pw").await.unwrap() else {
            panic!("multi-role login must go to role selection");
        };
        assert_eq!(draft.roles, vec![Role::Docente, Role::CppdMember]);

        let flow = RoleSelectionFlow::enter(Some(draft)).unwrap();
        assert_eq!(flow.roles(), &[Role::Docente, Role::CppdMember]);
        assert_eq!(flow.previous(), None);

        let next = flow.choose(&client, Role::CppdMember).await.unwrap();
        assert_eq!(next, Navigation::Landing("/cppd"));

        let sent = client.transport().requests();
        let select = sent.iter().find(|r| r.path == "/api/auth/select-role").unwrap();
        let body: serde_json::Value = serde_json::from_slice(select.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"role": "CPPD_MEMBER"}));
    }

    #[tokio::test]
    async fn rejected_selection_keeps_flow() {
        let client = SessionClient::new(
            MockTransport::default()
                .script(
                    "/api/auth/select-role",
                    status(StatusCode::FORBIDDEN, r#"{"error":"ROLE_NOT_GRANTED"}"#),
                )
                .script(
                    "/api/auth/select-role",
                    ok_json(&json!({"roles": ["DOCENTE"], "selectedRole": "DOCENTE"})),
                ),
        );
        let flow = RoleSelectionFlow::enter(Some(PendingSelection {
            roles: vec![Role::Docente],
            previous: None,
        }))
        .unwrap();

        assert!(flow.choose(&client, Role::Admin).await.is_err());
        let next = flow.choose(&client, Role::Docente).await.unwrap();
        assert_eq!(next, Navigation::Landing("/professor"));
    }

    #[tokio::test]
    async fn logout_discards_draft() {
        let client = SessionClient::new(
            MockTransport::default().script("/api/auth/logout", status(StatusCode::NO_CONTENT, "")),
        );
        let flow = RoleSelectionFlow::enter(Some(PendingSelection {
            roles: vec![Role::Docente, Role::Admin],
            previous: Some(Role::Admin),
        }))
        .unwrap();

        assert_eq!(flow.logout(&client).await.unwrap(), Navigation::Login);
        assert_eq!(client.transport().calls_to("/api/auth/logout"), 1);
    }
}
