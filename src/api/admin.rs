use actix_web::{HttpResponse, Responder, web};

use crate::{auth::session::SessionContext, models::ChangePasswordForm};

/* =========================
Admin password change
========================= */
/// Sets another user's password. Failures come back with the backend's
/// message untouched; the caller's session is not affected either way.
#[utoipa::path(
    post,
    path = "/admin/users/{user_id}/password",
    params(
        ("user_id" = String, Path, description = "Account whose password is replaced")
    ),
    request_body = ChangePasswordForm,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Password too short or confirmation mismatch", body = crate::models::ErrorBody),
        (status = 401, description = "Not signed in", body = crate::models::ErrorBody),
        (status = 403, description = "Caller is not an admin", body = crate::models::ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn change_password(
    ctx: web::Data<SessionContext>,
    path: web::Path<String>,
    form: web::Json<ChangePasswordForm>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();

    ctx.admin_change_password(&user_id, &form.new_password, &form.confirm_password)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
