use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Closed set of account roles issued by the HRM backend.
#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Admin,
    Hr,
    Manager,
    Employee,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn is_hr_or_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }

    /// Roles that act on other people's leave and reviews.
    pub fn manages_people(self) -> bool {
        matches!(self, Role::Admin | Role::Hr | Role::Manager)
    }

    /// Human readable label for headers and badges.
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Hr => "HR",
            Role::Manager => "Manager",
            Role::Employee => "Employee",
        }
    }
}

/// What the dashboard may offer for a given role.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub manage_employees: bool,
    pub approve_leave: bool,
    pub run_payroll: bool,
    pub review_performance: bool,
    pub change_passwords: bool,
    pub self_service: bool,
}

impl Permissions {
    pub fn for_role(role: Role) -> Self {
        Self {
            manage_employees: role.is_hr_or_admin(),
            approve_leave: role.manages_people(),
            run_payroll: role.is_hr_or_admin(),
            review_performance: role.manages_people(),
            change_passwords: role.is_admin(),
            self_service: true,
        }
    }
}
