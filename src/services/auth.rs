//! auth.rs
//!
//! Bearer-token handling for the events API.
//!
//! The backend issues opaque bearer tokens against a shared client secret.
//! `TokenManager` owns the single cached token for the process, fetches it
//! lazily on the first authenticated call, and replaces it reactively when
//! the server answers 401/403. There is no expiry bookkeeping beyond that.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct TokenRequest {
    secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Holds the cached bearer token and wraps requests with
/// retry-once-on-auth-failure semantics.
///
/// Injected into the API client rather than kept as a global so tests can
/// stand up one instance per mock server. Concurrent callers may each
/// trigger a token fetch; issuance is idempotent so the race is tolerated
/// rather than coordinated.
pub struct TokenManager {
    http: reqwest::Client,
    base_url: String,
    client_secret: String,
    token: RwLock<Option<String>>,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            client_secret: client_secret.into(),
            token: RwLock::new(None),
        }
    }

    /// Returns the cached token, fetching one first if none is held.
    ///
    /// A failed fetch yields `None`, never an error: callers proceed
    /// unauthenticated and let the server decide whether that is acceptable.
    pub async fn ensure_token(&self) -> Option<String> {
        if let Some(token) = self.token.read().unwrap().clone() {
            return Some(token);
        }
        self.fetch_token().await
    }

    /// Unconditionally requests a fresh token and caches it on success.
    async fn fetch_token(&self) -> Option<String> {
        debug!("Requesting bearer token from {}", self.base_url);

        let result = self
            .http
            .post(format!("{}/api/auth/token", self.base_url))
            .json(&TokenRequest { secret: self.client_secret.clone() })
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<TokenResponse>().await {
                    Ok(body) => {
                        *self.token.write().unwrap() = Some(body.token.clone());
                        info!("Bearer token obtained");
                        Some(body.token)
                    }
                    Err(e) => {
                        error!("Failed to decode token response: {}", e);
                        None
                    }
                }
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!("Token request rejected ({}): {}", status, body);
                None
            }
            Err(e) => {
                error!("Token request failed: {}", e);
                None
            }
        }
    }

    /// Sends the request produced by `build` with the current bearer token
    /// attached (omitted while no token is held) and returns the successful
    /// response body.
    ///
    /// On 401/403 the token is refetched exactly once; if a new token
    /// arrives the request is rebuilt and resent with it, otherwise the
    /// failed response stands. Network-level failures propagate as
    /// `ApiError::Transport` without retry.
    pub async fn execute<F>(&self, build: F) -> Result<String, ApiError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let token = self.ensure_token().await;
        let mut response = Self::send(build(), token.as_deref()).await?;

        if matches!(response.status().as_u16(), 401 | 403) {
            warn!("Auth failed ({}), refetching token once", response.status());
            if let Some(fresh) = self.fetch_token().await {
                response = Self::send(build(), Some(&fresh)).await?;
            }
        }

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            error!("API request failed ({}): {}", status, body);
            Err(ApiError::Api { status: status.as_u16(), body })
        }
    }

    async fn send(
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let request = match token {
            Some(t) => request.bearer_auth(t),
            None => request,
        };
        request.send().await
    }
}
