use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{employee::Employee, role::Role, user::SessionUser};

#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jane@company.com", format = "email")]
    pub email: String,
    #[schema(example = "s3cret-pass")]
    pub password: String,
}

/// Account part of a login response. Login responses carry no activation status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: LoginUser,
    #[serde(default)]
    pub employee: Option<Employee>,
    pub access_token: String,
    pub refresh_token: String,
}

impl LoginResponse {
    pub fn has_tokens(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }

    /// Session user built from the payload; `isActive` defaults to true when omitted.
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.user.id.clone(),
            email: self.user.email.clone(),
            role: self.user.role,
            is_active: self.user.is_active.unwrap_or(true),
        }
    }
}

fn default_active() -> bool {
    true
}

/// Body of `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub employee: Option<Employee>,
}

impl CurrentUserResponse {
    pub fn into_parts(self) -> (SessionUser, Option<Employee>) {
        let user = SessionUser {
            id: self.id,
            email: self.email,
            role: self.role,
            is_active: self.is_active,
        };
        (user, self.employee)
    }
}

/// Wire body for the backend's admin password change.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminChangePasswordReq {
    pub user_id: String,
    pub new_password: String,
}

/// Form submitted by the admin screen.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    #[schema(example = "n3w-passw0rd")]
    pub new_password: String,
    #[schema(example = "n3w-passw0rd")]
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DemoRoleReq {
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Password must be at least 8 characters")]
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_defaults_is_active() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "user": {"id": "u1", "email": "a@b.com", "role": "HR"},
            "employee": null,
            "accessToken": "tA",
            "refreshToken": "tR"
        }))
        .unwrap();

        let user = resp.session_user();
        assert!(user.is_active);
        assert_eq!(user.role, Role::Hr);
    }

    #[test]
    fn current_user_splits_employee() {
        let resp: CurrentUserResponse = serde_json::from_value(json!({
            "id": "u2",
            "email": "e@b.com",
            "role": "EMPLOYEE",
            "isActive": false,
            "employee": {
                "id": "e2",
                "employeeId": "EMP-002",
                "firstName": "Ada",
                "lastName": "Lovelace"
            }
        }))
        .unwrap();

        let (user, employee) = resp.into_parts();
        assert!(!user.is_active);
        let employee = employee.unwrap();
        assert_eq!(employee.full_name(), "Ada Lovelace");
        assert_eq!(user.id, "u2");
        assert!(serde_json::to_value(&user).unwrap().get("employee").is_none());
    }

    #[test]
    fn admin_change_password_uses_camel_case() {
        let body = serde_json::to_value(AdminChangePasswordReq {
            user_id: "u9".into(),
            new_password: "longenough".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"userId": "u9", "newPassword": "longenough"}));
    }
}
