use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

/// The signed-in account as held by the session. The linked employee
/// profile is kept next to it on the session, not inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}
