pub mod guard;

use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::error::ApiError;
use crate::http::{CallOpts, Http};
use crate::models::User;

pub use guard::{Access, RouteDecision};

/// Snapshot of the authentication state.
///
/// `is_loading` is true only between app start and the completion of the
/// initial identity probe; the route guard renders a placeholder until then.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_loading: bool,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[allow(dead_code)]
    user_id: uuid::Uuid,
}

/// The only process-wide mutable state in the client.
///
/// Read by many components, mutated exclusively through the operations below.
/// Rebuilt from the server cookie session on every fresh start; nothing is
/// persisted locally.
pub struct SessionStore {
    http: Arc<Http>,
    state: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new(http: Arc<Http>) -> Self {
        Self {
            http,
            state: Mutex::new(SessionState { user: None, is_loading: true }),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.lock().unwrap().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.lock().unwrap().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().is_loading
    }

    /// Startup identity probe (`GET /users/me`).
    ///
    /// Opted out of the global 401 redirect: an anonymous visitor is a normal
    /// outcome, not a session expiry. Failure of any kind resolves to
    /// "no user" and clears the loading flag; this never returns an error.
    pub async fn fetch_current_user(&self) {
        let result: Result<User, ApiError> = self
            .http
            .get_json("users/me", &[], CallOpts::probe("fetching current user"))
            .await;

        let mut state = self.state.lock().unwrap();
        state.user = result.ok();
        state.is_loading = false;
    }

    /// Start a session and load the authenticated user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let _ack: LoginResponse = self
            .http
            .post_json("auth_session/login", &body, CallOpts::probe("logging in"))
            .await?;

        let user: User = self
            .http
            .get_json("users/me", &[], CallOpts::action("fetching current user"))
            .await?;

        let mut state = self.state.lock().unwrap();
        state.user = Some(user.clone());
        state.is_loading = false;
        Ok(user)
    }

    /// End the session.
    ///
    /// The local user is cleared even when the server call fails: logout must
    /// be effective locally regardless of network state.
    pub async fn logout(&self) {
        let result = self
            .http
            .delete("auth_session/logout", CallOpts::probe("logging out"))
            .await;

        if let Err(e) = result {
            tracing::warn!("server logout failed, clearing local session anyway: {}", e);
        }

        let mut state = self.state.lock().unwrap();
        state.user = None;
        state.is_loading = false;
    }

    /// Route-guard entry point: decide access from the current snapshot
    pub fn check_access(&self, access: Access) -> RouteDecision {
        guard::evaluate(&self.snapshot(), access)
    }

    /// Used by the session-expired hook: drop the local user so guards stop
    /// admitting a dead session
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.user = None;
        state.is_loading = false;
    }
}
