use crate::{
    api::{admin, dashboard, demo, session},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let burst = requests_per_min.max(1);
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request((60_000 / u64::from(burst)).max(1))
            .burst_size(burst)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let admin_limiter = Arc::new(build_limiter(config.rate_admin_per_min));

    // Session
    cfg.service(
        web::scope("/session")
            .service(web::resource("").route(web::get().to(session::get_session)))
            .service(
                web::resource("/login")
                    .wrap(login_limiter)
                    .route(web::post().to(session::login)),
            )
            .service(web::resource("/logout").route(web::post().to(session::logout)))
            .service(web::resource("/refresh").route(web::post().to(session::refresh))),
    );

    // Demo override
    cfg.service(
        web::scope("/demo")
            .service(web::resource("").route(web::get().to(demo::get_demo)))
            .service(web::resource("/enable").route(web::post().to(demo::enable)))
            .service(web::resource("/disable").route(web::post().to(demo::disable)))
            .service(web::resource("/role").route(web::put().to(demo::set_role))),
    );

    // Admin
    cfg.service(
        web::scope("/admin").service(
            web::resource("/users/{user_id}/password")
                .wrap(admin_limiter)
                .route(web::post().to(admin::change_password)),
        ),
    );

    // Protected views
    cfg.service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard)));
    cfg.service(web::resource("/profile").route(web::get().to(dashboard::profile)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{
            client::AuthApi,
            demo::DemoOverride,
            error::{AuthError, AuthResult},
            middleware::route_gate,
            session::SessionContext,
            token_store::TokenStore,
        },
        model::role::Role,
        models::{
            AdminChangePasswordReq, CurrentUserResponse, LoginReqDto, LoginResponse, LoginUser,
        },
        utils::storage::{KeyValueStore, MemoryStore, StorageKey},
    };
    use actix_web::{
        App, body::MessageBody, dev::ServiceResponse, http::StatusCode, middleware::from_fn, test,
    };
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Backend;

    #[async_trait]
    impl AuthApi for Backend {
        async fn login(&self, credentials: &LoginReqDto) -> AuthResult<LoginResponse> {
            if credentials.password != "correct-horse" {
                return Err(AuthError::InvalidCredentials);
            }
            Ok(LoginResponse {
                user: LoginUser {
                    id: "u1".into(),
                    email: credentials.email.clone(),
                    role: Role::Hr,
                    is_active: None,
                },
                employee: None,
                access_token: "tA".into(),
                refresh_token: "tR".into(),
            })
        }

        async fn logout(&self, _bearer: &str) -> AuthResult<()> {
            Err(AuthError::Network("down".into()))
        }

        async fn current_user(&self, bearer: &str) -> AuthResult<CurrentUserResponse> {
            if bearer != "tA" {
                return Err(AuthError::Unauthorized);
            }
            Ok(CurrentUserResponse {
                id: "u1".into(),
                email: "a@b.com".into(),
                role: Role::Hr,
                is_active: true,
                employee: None,
            })
        }

        async fn admin_change_password(
            &self,
            _bearer: &str,
            _request: &AdminChangePasswordReq,
        ) -> AuthResult<()> {
            Err(AuthError::Forbidden("Admin only".into()))
        }
    }

    fn test_config() -> Config {
        Config::from_lookup(|key| match key {
            "BACKEND_URL" => Some("http://backend.invalid".to_string()),
            _ => None,
        })
        .unwrap()
    }

    macro_rules! portal {
        ($storage:expr) => {{
            let storage: Arc<dyn KeyValueStore> = $storage;
            let ctx = web::Data::new(SessionContext::new(
                TokenStore::new(storage.clone()),
                Arc::new(Backend),
            ));
            let demo = web::Data::new(DemoOverride::new(storage));
            let config = test_config();
            test::init_service(
                App::new()
                    .app_data(ctx)
                    .app_data(demo)
                    .wrap(from_fn(route_gate))
                    .configure(|cfg| configure(cfg, &config)),
            )
            .await
        }};
    }

    fn peer() -> std::net::SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn json_body<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
        serde_json::from_slice(&test::read_body(resp).await).unwrap()
    }

    #[actix_web::test]
    async fn login_dashboard_logout_flow() {
        let storage = Arc::new(MemoryStore::new());
        let app = portal!(storage.clone());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/session/login")
            .peer_addr(peer())
            .set_json(json!({"email": "a@b.com", "password": "correct-horse"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["session"]["isAuthenticated"], true);
        assert_eq!(body["session"]["user"]["role"], "HR");
        assert!(body["session"].get("accessToken").is_none());
        assert_eq!(body["role"]["displayedRole"], "HR");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["displayName"], "a@b.com");
        assert_eq!(body["role"]["permissions"]["runPayroll"], true);

        // HR account without employee record
        let resp = test::call_service(&app, test::TestRequest::get().uri("/profile").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, test::TestRequest::post().uri("/session/logout").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["session"]["isAuthenticated"], false);
        assert!(body["role"].is_null());
        assert!(storage.get(StorageKey::AccessToken).is_none());
    }

    #[actix_web::test]
    async fn bad_credentials_show_inline_error() {
        let app = portal!(Arc::new(MemoryStore::new()));

        let req = test::TestRequest::post()
            .uri("/session/login")
            .peer_addr(peer())
            .set_json(json!({"email": "a@b.com", "password": "nope"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await, json!({"error": "Invalid credentials"}));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/session").to_request()).await;
        assert_eq!(json_body(resp).await["session"]["isAuthenticated"], false);
    }

    #[actix_web::test]
    async fn stale_tokens_refresh_into_redirect() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(StorageKey::AccessToken, "revoked");
        storage.set(StorageKey::RefreshToken, "tR");
        let app = portal!(storage.clone());

        let resp = test::call_service(&app, test::TestRequest::post().uri("/session/refresh").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["redirect"], "/login");
        assert!(storage.get(StorageKey::RefreshToken).is_none());
    }

    #[actix_web::test]
    async fn demo_role_changes_display_only() {
        let storage = Arc::new(MemoryStore::new());
        let app = portal!(storage.clone());

        let req = test::TestRequest::post()
            .uri("/session/login")
            .peer_addr(peer())
            .set_json(json!({"email": "a@b.com", "password": "correct-horse"}))
            .to_request();
        test::call_service(&app, req).await;

        test::call_service(&app, test::TestRequest::post().uri("/demo/enable").to_request()).await;
        let req = test::TestRequest::put()
            .uri("/demo/role")
            .set_json(json!({"role": "EMPLOYEE"}))
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body, json!({"isDemoMode": true, "demoRole": "EMPLOYEE"}));

        let body = json_body(test::call_service(&app, test::TestRequest::get().uri("/session").to_request()).await).await;
        assert_eq!(body["session"]["user"]["role"], "HR");
        assert_eq!(body["role"]["displayedRole"], "EMPLOYEE");
        assert_eq!(body["role"]["permissions"]["runPayroll"], false);
        assert_eq!(storage.get(StorageKey::AccessToken).as_deref(), Some("tA"));

        test::call_service(&app, test::TestRequest::post().uri("/demo/disable").to_request()).await;
        let body = json_body(test::call_service(&app, test::TestRequest::get().uri("/session").to_request()).await).await;
        assert_eq!(body["role"]["displayedRole"], "HR");
    }

    #[actix_web::test]
    async fn password_change_errors_are_verbatim() {
        let app = portal!(Arc::new(MemoryStore::new()));

        let req = test::TestRequest::post()
            .uri("/session/login")
            .peer_addr(peer())
            .set_json(json!({"email": "a@b.com", "password": "correct-horse"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/admin/users/u2/password")
            .peer_addr(peer())
            .set_json(json!({"newPassword": "short", "confirmPassword": "short"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(resp).await,
            json!({"error": "Password must be at least 8 characters"})
        );

        let req = test::TestRequest::post()
            .uri("/admin/users/u2/password")
            .peer_addr(peer())
            .set_json(json!({"newPassword": "longenough", "confirmPassword": "longenough"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(resp).await, json!({"error": "Admin only"}));

        let body = json_body(test::call_service(&app, test::TestRequest::get().uri("/session").to_request()).await).await;
        assert_eq!(body["session"]["isAuthenticated"], true);
    }
}
