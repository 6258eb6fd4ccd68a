use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::CONFIG;
use crate::error::ApiError;
use crate::notify::{Notifier, ToastLevel};

#[derive(Error, Debug)]
pub enum HttpInitError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Per-call options: the action label feeds the fallback error message, and
/// `skip_auth_redirect` opts a call out of the global 401 handling (used by
/// the startup identity probe, which must not bounce the user).
#[derive(Debug, Clone, Copy)]
pub struct CallOpts<'a> {
    pub action: &'a str,
    pub skip_auth_redirect: bool,
}

impl<'a> CallOpts<'a> {
    pub fn action(action: &'a str) -> Self {
        Self { action, skip_auth_redirect: false }
    }

    pub fn probe(action: &'a str) -> Self {
        Self { action, skip_auth_redirect: true }
    }
}

type SessionExpiredHook = Box<dyn Fn() + Send + Sync>;

/// Shared transport for every resource client.
///
/// Owns the cookie session, prefixes `/api/v1`, normalizes every non-2xx
/// through `ApiError::from_status`, surfaces failures through the notifier,
/// and routes 401s to the registered session-expired hook (the client-side
/// redirect-to-login) unless the call opted out.
pub struct Http {
    client: reqwest::Client,
    base_url: Url,
    notifier: Arc<dyn Notifier>,
    session_expired_hook: Mutex<Option<SessionExpiredHook>>,
}

impl Http {
    pub fn new(base_url: &str, notifier: Arc<dyn Notifier>) -> Result<Self, HttpInitError> {
        // Trailing slash matters for Url::join
        let normalized = format!("{}/api/v1/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| HttpInitError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(CONFIG.api.request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONFIG.api.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            notifier,
            session_expired_hook: Mutex::new(None),
        })
    }

    pub fn from_config(notifier: Arc<dyn Notifier>) -> Result<Self, HttpInitError> {
        Self::new(&CONFIG.api.base_url, notifier)
    }

    /// Register the handler invoked when any non-opted-out call sees a 401
    pub fn on_session_expired(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.session_expired_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    fn endpoint(&self, path: &str) -> Url {
        // Paths are relative ("departments/13/1"); join keeps the /api/v1 prefix
        self.base_url
            .join(path.trim_start_matches('/'))
            .unwrap_or_else(|_| self.base_url.clone())
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.endpoint(path))
    }

    /// Send a request and normalize the outcome.
    ///
    /// Exactly one HTTP call; on failure the normalized error is surfaced via
    /// the notifier (validation and session-expiry excepted) and returned so
    /// the caller can keep its own state intact.
    pub async fn execute(&self, rb: RequestBuilder, opts: CallOpts<'_>) -> Result<Response, ApiError> {
        let response = match rb.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from(e);
                self.notifier.notify(err.message(), ToastLevel::Error);
                return Err(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 && !opts.skip_auth_redirect {
            if let Some(hook) = self.session_expired_hook.lock().unwrap().as_ref() {
                hook();
            }
            return Err(ApiError::SessionExpired);
        }

        let server_message = extract_server_message(response).await;
        let err = ApiError::from_status(status.as_u16(), server_message, opts.action);
        if !err.is_session_expired() {
            self.notifier.notify(err.message(), ToastLevel::Error);
        }
        Err(err)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        opts: CallOpts<'_>,
    ) -> Result<T, ApiError> {
        let rb = self.request(Method::GET, path).query(query);
        let response = self.execute(rb, opts).await?;
        self.decode(response, opts).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: CallOpts<'_>,
    ) -> Result<T, ApiError> {
        let rb = self.request(Method::POST, path).json(body);
        let response = self.execute(rb, opts).await?;
        self.decode(response, opts).await
    }

    /// POST with no request body (assignment-style endpoints)
    pub async fn post_empty(&self, path: &str, opts: CallOpts<'_>) -> Result<(), ApiError> {
        let rb = self.request(Method::POST, path);
        self.execute(rb, opts).await?;
        Ok(())
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: CallOpts<'_>,
    ) -> Result<T, ApiError> {
        let rb = self.request(Method::PUT, path).json(body);
        let response = self.execute(rb, opts).await?;
        self.decode(response, opts).await
    }

    pub async fn delete(&self, path: &str, opts: CallOpts<'_>) -> Result<(), ApiError> {
        let rb = self.request(Method::DELETE, path);
        self.execute(rb, opts).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        opts: CallOpts<'_>,
    ) -> Result<T, ApiError> {
        let rb = self.request(Method::POST, path).multipart(form);
        let response = self.execute(rb, opts).await?;
        self.decode(response, opts).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: Response,
        opts: CallOpts<'_>,
    ) -> Result<T, ApiError> {
        match response.json::<T>().await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!("failed to decode response for {}: {}", opts.action, e);
                let err = ApiError::network(format!("Invalid server response during {}.", opts.action));
                self.notifier.notify(err.message(), ToastLevel::Error);
                Err(err)
            }
        }
    }
}

/// Pull the `{"error": "..."}` body the vault API attaches to failures
async fn extract_server_message(response: Response) -> Option<String> {
    let body = response.json::<serde_json::Value>().await.ok()?;
    body.get("error")?.as_str().map(|s| s.to_string())
}
