//! Calls into the HRM backend's auth endpoints.
//!
//! One round trip per call, no retries. Status codes are folded into
//! `AuthError` here so the session never sees transport details.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    auth::error::{AuthError, AuthResult},
    models::{AdminChangePasswordReq, CurrentUserResponse, ErrorBody, LoginReqDto, LoginResponse},
};

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginReqDto) -> AuthResult<LoginResponse>;

    /// Best-effort notification; callers ignore the result.
    async fn logout(&self, bearer: &str) -> AuthResult<()>;

    async fn current_user(&self, bearer: &str) -> AuthResult<CurrentUserResponse>;

    async fn admin_change_password(
        &self,
        bearer: &str,
        request: &AdminChangePasswordReq,
    ) -> AuthResult<()>;
}

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    #[instrument(name = "remote_login", skip_all, fields(email = %credentials.email))]
    async fn login(&self, credentials: &LoginReqDto) -> AuthResult<LoginResponse> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            debug!(status = status.as_u16(), "Backend rejected credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let login: LoginResponse = read_json(response).await?;
        if !login.has_tokens() {
            return Err(AuthError::Server(
                "malformed response from backend: empty token".to_string(),
            ));
        }
        Ok(login)
    }

    #[instrument(name = "remote_logout", skip_all)]
    async fn logout(&self, bearer: &str) -> AuthResult<()> {
        let response = self
            .http
            .post(self.url("/auth/logout"))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(network_error)?;

        expect_success(response).await
    }

    #[instrument(name = "remote_current_user", skip_all)]
    async fn current_user(&self, bearer: &str) -> AuthResult<CurrentUserResponse> {
        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }

    #[instrument(name = "remote_admin_change_password", skip_all, fields(user_id = %request.user_id))]
    async fn admin_change_password(
        &self,
        bearer: &str,
        request: &AdminChangePasswordReq,
    ) -> AuthResult<()> {
        let response = self
            .http
            .post(self.url("/auth/admin/change-password"))
            .bearer_auth(bearer)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        expect_success(response).await
    }
}

fn network_error(e: reqwest::Error) -> AuthError {
    warn!(error = %e, "Backend unreachable");
    AuthError::Network(e.to_string())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AuthResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;

    if !status.is_success() {
        return Err(error_for_status(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| AuthError::Server(format!("malformed response from backend: {e}")))
}

async fn expect_success(response: reqwest::Response) -> AuthResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, &body))
}

/// Message from an `{ "error": ... }` body, else the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

pub(crate) fn error_for_status(status: StatusCode, body: &str) -> AuthError {
    let message = error_message(body);
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string()
    } else {
        message
    };

    match status {
        StatusCode::UNAUTHORIZED => AuthError::Unauthorized,
        StatusCode::FORBIDDEN => AuthError::Forbidden(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AuthError::Validation(message),
        _ => AuthError::Server(message),
    }
}
