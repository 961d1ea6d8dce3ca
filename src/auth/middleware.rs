use actix_web::{
    Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RouteAccess {
    Public,
    Protected,
}

const PUBLIC_PREFIXES: [&str; 2] = ["/login", "/register"];

/// Root, login and register (and anything below the last two) are public.
pub fn classify(path: &str) -> RouteAccess {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() || path == "/" {
        return RouteAccess::Public;
    }

    let public = PUBLIC_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    });

    if public {
        RouteAccess::Public
    } else {
        RouteAccess::Protected
    }
}

/// Advisory only: tags the request with its classification and always
/// forwards it. Protected views check the session themselves.
pub async fn route_gate(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let access = classify(req.path());
    debug!(path = %req.path(), ?access, "Route classified");

    req.extensions_mut().insert(access);

    next.call(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, middleware::from_fn, web};

    #[test]
    fn classifies_public_paths() {
        for path in ["", "/", "/login", "/login/", "/register", "/register/confirm", "/?next=x"] {
            assert_eq!(classify(path), RouteAccess::Public, "{path}");
        }
    }

    #[test]
    fn everything_else_is_protected() {
        for path in ["/dashboard", "/loginx", "/registered", "/employees/login", "/session"] {
            assert_eq!(classify(path), RouteAccess::Protected, "{path}");
        }
    }

    async fn echo_access(req: HttpRequest) -> HttpResponse {
        let access = req.extensions().get::<RouteAccess>().copied();
        HttpResponse::Ok().body(format!("{access:?}"))
    }

    #[actix_web::test]
    async fn gate_never_blocks() {
        let app = actix_web::test::init_service(
            App::new()
                .wrap(from_fn(route_gate))
                .default_service(web::to(echo_access)),
        )
        .await;

        let req = actix_web::test::TestRequest::get().uri("/payroll").to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(actix_web::test::read_body(resp).await, "Some(Protected)");

        let req = actix_web::test::TestRequest::get().uri("/login").to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(actix_web::test::read_body(resp).await, "Some(Public)");
    }
}
