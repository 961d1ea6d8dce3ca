use actix_web::{HttpResponse, Responder, web};

use crate::{auth::demo::DemoOverride, models::DemoRoleReq};

#[utoipa::path(
    get,
    path = "/demo",
    responses((status = 200, description = "Demo mode state", body = crate::auth::demo::DemoState)),
    tag = "Demo"
)]
pub async fn get_demo(demo: web::Data<DemoOverride>) -> impl Responder {
    HttpResponse::Ok().json(demo.state())
}

#[utoipa::path(
    post,
    path = "/demo/enable",
    responses((status = 200, description = "Demo mode on", body = crate::auth::demo::DemoState)),
    tag = "Demo"
)]
pub async fn enable(demo: web::Data<DemoOverride>) -> impl Responder {
    demo.enable();
    HttpResponse::Ok().json(demo.state())
}

#[utoipa::path(
    post,
    path = "/demo/disable",
    responses((status = 200, description = "Demo mode off", body = crate::auth::demo::DemoState)),
    tag = "Demo"
)]
pub async fn disable(demo: web::Data<DemoOverride>) -> impl Responder {
    demo.disable();
    HttpResponse::Ok().json(demo.state())
}

/// Picks the role shown while demo mode is on. Never sent to the backend.
#[utoipa::path(
    put,
    path = "/demo/role",
    request_body = DemoRoleReq,
    responses((status = 200, description = "Demo role selected", body = crate::auth::demo::DemoState)),
    tag = "Demo"
)]
pub async fn set_role(
    demo: web::Data<DemoOverride>,
    payload: web::Json<DemoRoleReq>,
) -> impl Responder {
    demo.set_role(payload.role);
    HttpResponse::Ok().json(demo.state())
}
