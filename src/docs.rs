use crate::api::dashboard::DashboardView;
use crate::api::session::SessionView;
use crate::auth::demo::{DemoState, RoleView};
use crate::auth::session::SessionSnapshot;
use crate::model::employee::Employee;
use crate::model::role::{Permissions, Role};
use crate::model::user::SessionUser;
use crate::models::{ChangePasswordForm, DemoRoleReq, ErrorBody, LoginReqDto};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Portal API",
        version = "1.0.0",
        description = r#"
## HRM Portal

Local session gateway for the **Human Resource Management (HRM)** web UI.
It holds the operator's session, forwards authentication calls to the HRM
backend and keeps the bearer tokens in durable storage.

### Session
- Login, logout and identity refresh
- Tokens never leave the portal; responses only report `isAuthenticated`

### Demo mode
- Preview the UI under another role without touching the real account

### Errors
Failures are returned as `{ "error": "<message>" }`.
"#,
    ),
    paths(
        crate::api::session::get_session,
        crate::api::session::login,
        crate::api::session::logout,
        crate::api::session::refresh,

        crate::api::demo::get_demo,
        crate::api::demo::enable,
        crate::api::demo::disable,
        crate::api::demo::set_role,

        crate::api::admin::change_password,

        crate::api::dashboard::dashboard,
        crate::api::dashboard::profile
    ),
    components(
        schemas(
            SessionView,
            SessionSnapshot,
            SessionUser,
            Employee,
            Role,
            RoleView,
            Permissions,
            DemoState,
            DemoRoleReq,
            DashboardView,
            LoginReqDto,
            ChangePasswordForm,
            ErrorBody
        )
    ),
    tags(
        (name = "Session", description = "Login, logout and identity refresh"),
        (name = "Demo", description = "Presentation-only role override"),
        (name = "Admin", description = "Privileged account operations"),
        (name = "Views", description = "Protected views with page-level checks"),
    )
)]
pub struct ApiDoc;
