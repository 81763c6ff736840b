use serde::Deserialize;

use crate::types::Role;

/// Body of `POST {auth_path}/login`.
#[derive(Deserialize)]
pub(super) struct LoginBody {
    pub(super) identifier: String,
    pub(super) secret: String,
}

/// Body of `POST {auth_path}/select-role`.
#[derive(Debug, Deserialize)]
pub(super) struct SelectRoleBody {
    pub(super) role: Role,
}
