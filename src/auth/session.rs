//! Session state for the signed-in operator.
//!
//! One `SessionContext` per process (or per test), handed to handlers as
//! application data. Credentials live as a single optional pair, so the
//! authenticated flag is always derived from token presence. Every
//! transition takes the write lock once, so readers never observe a half
//! applied update.

use std::sync::{
    Arc, PoisonError, RwLock, RwLockWriteGuard,
    atomic::{AtomicU64, Ordering},
};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    auth::{
        client::AuthApi,
        error::{AuthError, AuthResult},
        password::validate_new_password,
        token_store::{Credentials, StoredTokens, TokenStore},
    },
    model::{employee::Employee, user::SessionUser},
    models::{AdminChangePasswordReq, LoginReqDto, LoginResponse},
};

#[derive(Debug, Default)]
struct Session {
    user: Option<SessionUser>,
    employee: Option<Employee>,
    credentials: Option<Credentials>,
    is_loading: bool,
}

impl Session {
    fn reset(&mut self) {
        self.user = None;
        self.employee = None;
        self.credentials = None;
    }
}

/// Point-in-time copy of the session. Tokens are never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub user: Option<SessionUser>,
    pub employee: Option<Employee>,
    #[serde(skip)]
    pub access_token: Option<String>,
    #[serde(skip)]
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl SessionSnapshot {
    /// State of a session that has never logged in.
    pub fn logged_out() -> Self {
        Self {
            user: None,
            employee: None,
            access_token: None,
            refresh_token: None,
            is_authenticated: false,
            is_loading: false,
        }
    }
}

pub struct SessionContext {
    state: RwLock<Session>,
    /// Bumped by login and logout; stale remote results are dropped.
    generation: AtomicU64,
    tokens: TokenStore,
    api: Arc<dyn AuthApi>,
}

/// Clears the loading flag however the owning call exits.
struct LoadingGuard<'a> {
    ctx: &'a SessionContext,
}

impl<'a> LoadingGuard<'a> {
    fn start(ctx: &'a SessionContext) -> Self {
        ctx.set_loading(true);
        Self { ctx }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.ctx.set_loading(false);
    }
}

impl SessionContext {
    pub fn new(tokens: TokenStore, api: Arc<dyn AuthApi>) -> Self {
        let credentials = match tokens.load() {
            StoredTokens::Complete(credentials) => {
                info!("Restored credentials from storage");
                Some(credentials)
            }
            StoredTokens::Empty => None,
            StoredTokens::Partial => {
                warn!("Storage held a single token; clearing it");
                tokens.clear();
                None
            }
        };

        Self {
            state: RwLock::new(Session {
                credentials,
                ..Session::default()
            }),
            generation: AtomicU64::new(0),
            tokens,
            api,
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        SessionSnapshot {
            user: state.user.clone(),
            employee: state.employee.clone(),
            access_token: state.credentials.as_ref().map(|c| c.access_token().to_string()),
            refresh_token: state.credentials.as_ref().map(|c| c.refresh_token().to_string()),
            is_authenticated: state.credentials.is_some(),
            is_loading: state.is_loading,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .credentials
            .is_some()
    }

    fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .credentials
            .as_ref()
            .map(|c| c.access_token().to_string())
    }

    /// Applies a successful login response. Storage and memory are updated
    /// under the same write lock, so they cannot diverge between workers.
    /// A response with an empty token is ignored.
    pub fn login(&self, response: LoginResponse) {
        let user = response.session_user();
        let Some(credentials) = Credentials::new(response.access_token, response.refresh_token)
        else {
            warn!("Login response carried an empty token; session unchanged");
            return;
        };

        let mut state = self.write();
        self.tokens.save(&credentials);
        self.next_generation();
        state.user = Some(user);
        state.employee = response.employee;
        state.credentials = Some(credentials);

        info!(user_id = ?state.user.as_ref().map(|u| &u.id), "Session logged in");
    }

    /// Clears local state unconditionally, then tells the backend.
    pub async fn logout(&self) {
        let previous = {
            let mut state = self.write();
            self.next_generation();
            let previous = state.credentials.take();
            state.reset();
            self.tokens.clear();
            previous
        };

        info!("Session logged out");

        if let Some(credentials) = previous {
            if let Err(e) = self.api.logout(credentials.access_token()).await {
                warn!(error = %e, "Logout notification failed; ignoring");
            }
        }
    }

    /// Replaces the user record only; employee and tokens stay as they are.
    pub fn set_user(&self, user: SessionUser) {
        self.write().user = Some(user);
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().is_loading = loading;
    }

    /// Refreshes user and employee from the backend. Any failure logs the
    /// session out, unless a login or logout happened meanwhile.
    #[instrument(name = "session_fetch_user", skip_all)]
    pub async fn fetch_user(&self) {
        let _loading = LoadingGuard::start(self);
        let generation = self.current_generation();

        let Some(access_token) = self.access_token() else {
            debug!("No credentials to refresh; resetting session");
            self.logout().await;
            return;
        };

        let result = self.api.current_user(&access_token).await;

        if self.current_generation() != generation {
            info!("Session changed during fetch; dropping stale result");
            return;
        }

        match result {
            Ok(response) => {
                let (user, employee) = response.into_parts();
                let mut state = self.write();
                if self.current_generation() != generation {
                    return;
                }
                debug!(user_id = %user.id, "Current user refreshed");
                state.user = Some(user);
                state.employee = employee;
            }
            Err(e) => {
                warn!(error = %e, "Could not fetch current user; logging out");
                self.logout().await;
            }
        }
    }

    /// Remote login followed by `login`. On failure the session is untouched.
    #[instrument(name = "session_sign_in", skip_all, fields(email = %credentials.email))]
    pub async fn sign_in(&self, credentials: &LoginReqDto) -> AuthResult<SessionSnapshot> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let response = {
            let _loading = LoadingGuard::start(self);
            self.api.login(credentials).await?
        };

        if !response.has_tokens() {
            return Err(AuthError::Server(
                "malformed response from backend: empty token".to_string(),
            ));
        }

        self.login(response);
        Ok(self.snapshot())
    }

    /// Sets another user's password. The caller's own session is never
    /// modified, whatever the outcome.
    #[instrument(name = "session_admin_change_password", skip_all, fields(user_id = %user_id))]
    pub async fn admin_change_password(
        &self,
        user_id: &str,
        new_password: &str,
        confirmation: &str,
    ) -> AuthResult<()> {
        validate_new_password(new_password, confirmation)?;

        let access_token = self.access_token().ok_or(AuthError::Unauthorized)?;
        let request = AdminChangePasswordReq {
            user_id: user_id.to_string(),
            new_password: new_password.to_string(),
        };

        self.api
            .admin_change_password(&access_token, &request)
            .await
            .inspect(|()| info!("Password changed"))
    }
}
