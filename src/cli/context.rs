use std::sync::{Arc, Weak};

use anyhow::Context;

use crate::http::Http;
use crate::notify::{Notifier, TracingNotifier};
use crate::resources::{
    CoursesClient, DepartmentsClient, FilesClient, LevelsClient, StatsClient, UsersClient,
};
use crate::session::{Access, RouteDecision, SessionStore};

/// Wired-up client state for one CLI invocation: transport, session store
/// and the resource clients, sharing a single cookie jar.
pub struct AppContext {
    pub http: Arc<Http>,
    pub session: Arc<SessionStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub fn new() -> anyhow::Result<Self> {
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
        let http = Arc::new(
            Http::from_config(Arc::clone(&notifier)).context("failed to initialize API client")?,
        );
        let session = Arc::new(SessionStore::new(Arc::clone(&http)));

        // The CLI analog of the redirect-to-login interceptor: drop the dead
        // session so subsequent guard checks fail closed. Weak avoids an Arc
        // cycle (the store owns the transport).
        let weak: Weak<SessionStore> = Arc::downgrade(&session);
        http.on_session_expired(move || {
            tracing::warn!("session expired, please log in again");
            if let Some(store) = weak.upgrade() {
                store.clear();
            }
        });

        Ok(Self { http, session, notifier })
    }

    /// Establish identity for this invocation: log in with VAULT_EMAIL /
    /// VAULT_PASSWORD when provided, otherwise probe the cookie session.
    pub async fn authenticate(&self) -> anyhow::Result<()> {
        let email = std::env::var("VAULT_EMAIL").ok();
        let password = std::env::var("VAULT_PASSWORD").ok();

        match (email, password) {
            (Some(email), Some(password)) => {
                self.session
                    .login(&email, &password)
                    .await
                    .map(|_| ())
                    .map_err(|e| anyhow::anyhow!("login failed: {}", e))
            }
            _ => {
                self.session.fetch_current_user().await;
                Ok(())
            }
        }
    }

    /// Gate an admin-only command the way the route guard gates a view
    pub async fn ensure_admin(&self) -> anyhow::Result<()> {
        self.authenticate().await?;
        match self.session.check_access(Access::AdminOnly) {
            RouteDecision::Authorized => Ok(()),
            RouteDecision::Unauthenticated | RouteDecision::Loading => Err(anyhow::anyhow!(
                "Not logged in. Set VAULT_EMAIL and VAULT_PASSWORD or run 'vault auth login'."
            )),
            RouteDecision::Unauthorized => {
                Err(anyhow::anyhow!("Forbidden: You're not supposed to be here"))
            }
        }
    }

    pub fn departments(&self) -> DepartmentsClient {
        DepartmentsClient::new(Arc::clone(&self.http))
    }

    pub fn levels(&self) -> LevelsClient {
        LevelsClient::new(Arc::clone(&self.http))
    }

    pub fn courses(&self) -> CoursesClient {
        CoursesClient::new(Arc::clone(&self.http))
    }

    pub fn users(&self) -> UsersClient {
        UsersClient::new(Arc::clone(&self.http))
    }

    pub fn files(&self) -> FilesClient {
        FilesClient::new(Arc::clone(&self.http))
    }

    pub fn stats(&self) -> StatsClient {
        StatsClient::new(Arc::clone(&self.http))
    }
}
