use std::future::{Ready, ready};

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError, web::Data,
};

use crate::{
    auth::{
        error::AuthError,
        session::{SessionContext, SessionSnapshot},
    },
    model::user::SessionUser,
    models::ErrorBody,
};

/// Page-level check for protected views: the session must be
/// authenticated and its user loaded.
pub struct SignedIn {
    pub user: SessionUser,
    pub session: SessionSnapshot,
}

impl FromRequest for SignedIn {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(ctx) = req.app_data::<Data<SessionContext>>() else {
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "Session missing",
            )));
        };

        let session = ctx.snapshot();
        if !session.is_authenticated {
            return ready(Err(AuthError::Unauthorized.into()));
        }

        match session.user.clone() {
            Some(user) => ready(Ok(SignedIn { user, session })),
            None => ready(Err(AuthError::Unauthorized.into())),
        }
    }
}

impl SignedIn {
    pub fn require_employee(&self) -> actix_web::Result<()> {
        if self.session.employee.is_some() {
            Ok(())
        } else {
            let body = ErrorBody {
                error: "No employee profile".to_string(),
            };
            Err(InternalError::from_response(
                "No employee profile",
                HttpResponse::NotFound().json(body),
            )
            .into())
        }
    }
}
