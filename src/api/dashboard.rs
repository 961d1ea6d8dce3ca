use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::{
        demo::{DemoOverride, RoleView},
        guard::SignedIn,
    },
    model::employee::Employee,
};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub display_name: String,
    pub email: String,
    pub role: RoleView,
}

/// Role-based landing view. Display name falls back to the email for
/// accounts without an employee record.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard for the signed-in user", body = DashboardView),
        (status = 401, description = "Not signed in", body = crate::models::ErrorBody)
    ),
    tag = "Views"
)]
pub async fn dashboard(auth: SignedIn, demo: web::Data<DemoOverride>) -> impl Responder {
    let display_name = auth
        .session
        .employee
        .as_ref()
        .map(Employee::full_name)
        .unwrap_or_else(|| auth.user.email.clone());

    HttpResponse::Ok().json(DashboardView {
        display_name,
        email: auth.user.email.clone(),
        role: demo.role_view(&auth.user),
    })
}

/// Own employee profile; pure admin accounts have none.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Employee profile", body = Employee),
        (status = 401, description = "Not signed in", body = crate::models::ErrorBody),
        (status = 404, description = "Account has no employee record", body = crate::models::ErrorBody)
    ),
    tag = "Views"
)]
pub async fn profile(auth: SignedIn) -> actix_web::Result<impl Responder> {
    auth.require_employee()?;
    Ok(HttpResponse::Ok().json(&auth.session.employee))
}
