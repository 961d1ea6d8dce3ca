use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    auth::{
        demo::{DemoOverride, RoleView},
        session::{SessionContext, SessionSnapshot},
    },
    models::LoginReqDto,
};

#[derive(Serialize, ToSchema)]
pub struct SessionView {
    pub session: SessionSnapshot,
    /// Present once a user is loaded.
    pub role: Option<RoleView>,
}

impl SessionView {
    pub fn new(session: SessionSnapshot, demo: &DemoOverride) -> Self {
        let role = session.user.as_ref().map(|user| demo.role_view(user));
        Self { session, role }
    }
}

/* =========================
Current session
========================= */
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Current session state", body = SessionView)
    ),
    tag = "Session"
)]
pub async fn get_session(
    ctx: web::Data<SessionContext>,
    demo: web::Data<DemoOverride>,
) -> impl Responder {
    HttpResponse::Ok().json(SessionView::new(ctx.snapshot(), &demo))
}

/* =========================
Login
========================= */
#[utoipa::path(
    post,
    path = "/session/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = SessionView),
        (status = 400, description = "Missing email or password", body = crate::models::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::models::ErrorBody),
        (status = 502, description = "Backend unreachable", body = crate::models::ErrorBody)
    ),
    tag = "Session"
)]
pub async fn login(
    ctx: web::Data<SessionContext>,
    demo: web::Data<DemoOverride>,
    payload: web::Json<LoginReqDto>,
) -> actix_web::Result<impl Responder> {
    let snapshot = ctx.sign_in(&payload).await?;
    Ok(HttpResponse::Ok().json(SessionView::new(snapshot, &demo)))
}

/* =========================
Logout
========================= */
#[utoipa::path(
    post,
    path = "/session/logout",
    responses(
        (status = 200, description = "Session cleared", body = SessionView)
    ),
    tag = "Session"
)]
pub async fn logout(
    ctx: web::Data<SessionContext>,
    demo: web::Data<DemoOverride>,
) -> impl Responder {
    ctx.logout().await;
    HttpResponse::Ok().json(SessionView::new(ctx.snapshot(), &demo))
}

/* =========================
Refresh identity
========================= */
/// Re-reads the current user from the backend. A stale token ends in a
/// logged-out session, reported here with `redirect`.
#[utoipa::path(
    post,
    path = "/session/refresh",
    responses(
        (status = 200, description = "Session after refresh", body = SessionView),
        (status = 401, description = "Session expired; client should go to /login", body = Object,
         example = json!({"error": "Not authenticated", "redirect": "/login"}))
    ),
    tag = "Session"
)]
pub async fn refresh(
    ctx: web::Data<SessionContext>,
    demo: web::Data<DemoOverride>,
) -> impl Responder {
    ctx.fetch_user().await;

    let snapshot = ctx.snapshot();
    if !snapshot.is_authenticated {
        info!("Session expired during refresh");
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Not authenticated",
            "redirect": "/login"
        }));
    }

    HttpResponse::Ok().json(SessionView::new(snapshot, &demo))
}
