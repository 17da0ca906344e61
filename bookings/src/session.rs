//! Signed-in session, held explicitly by the application shell
//!
//! [`AuthClient`] talks to the hosted auth service. The resulting [`Session`]
//! is published into a [`SessionContext`] the shell owns and hands to whoever
//! needs the access token; there is no process-wide session.

use crate::error::AuthError;
use crate::types::UserId;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Auth user id; profile and booking rows use the same id
    pub id: UserId,
    /// Sign-in email
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens returned by a successful sign-in
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    /// Who signed in
    pub user: SessionUser,
    /// Bearer token for the store and the notification endpoint
    pub access_token: String,
    /// Token to obtain a new access token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix time the access token expires
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Current session, observable by subscribers
///
/// Clones share the same channel. `None` means signed out.
#[derive(Debug, Clone)]
pub struct SessionContext {
    sender: Arc<watch::Sender<Option<Session>>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Signed-out context
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the current session and wake subscribers
    pub fn publish(&self, session: Option<Session>) {
        tracing::debug!(signed_in = session.is_some(), "Session changed");
        self.sender.send_replace(session);
    }

    /// Snapshot of the current session
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.sender.borrow().clone()
    }

    /// Access token of the current session
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.sender
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// Receiver that sees every later change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }
}

/// Client for `{supabase_url}/auth/v1`
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    auth_url: String,
    anon_key: String,
}

impl AuthClient {
    /// Create a client for a project
    #[must_use]
    pub fn new(supabase_url: &str, anon_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), supabase_url, anon_key)
    }

    /// Create a client reusing an existing connection pool
    #[must_use]
    pub fn with_client(client: Client, supabase_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            auth_url: format!("{}/auth/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.into(),
        }
    }

    /// Exchange an email and password for a session
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the service refuses the
    /// credentials, or another [`AuthError`] if the call fails.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        if matches!(response.status(), StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            tracing::info!("Sign-in refused");
            return Err(AuthError::InvalidCredentials);
        }

        let session: Session = Self::parse(response).await?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// Resolve an access token to its user
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] for a missing, expired or revoked
    /// token, or another [`AuthError`] if the call fails.
    pub async fn user(&self, access_token: &str) -> Result<SessionUser, AuthError> {
        let response = self
            .client
            .get(format!("{}/user", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AuthError::Unauthorized);
        }

        Self::parse(response).await
    }

    /// Revoke the session's tokens
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the service cannot be reached or refuses.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: Response) -> Result<Response, AuthError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(AuthError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
        Self::check(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AuthError::ResponseParseFailed(e.to_string()))
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("auth_url", &self.auth_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            user: SessionUser {
                id: UserId::new("u1"),
                email: Some("admin@example.com".to_string()),
            },
            access_token: token.to_string(),
            refresh_token: None,
            expires_at: None,
        }
    }

    #[test]
    fn test_context_starts_signed_out() {
        let context = SessionContext::new();
        assert!(context.current().is_none());
        assert!(context.access_token().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_published_session() {
        let context = SessionContext::new();
        let mut receiver = context.subscribe();

        context.publish(Some(session("jwt-1")));
        receiver.changed().await.unwrap();
        assert_eq!(
            receiver.borrow().as_ref().map(|s| s.access_token.clone()),
            Some("jwt-1".to_string())
        );

        context.publish(None);
        receiver.changed().await.unwrap();
        assert!(receiver.borrow().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let context = SessionContext::new();
        let shell_copy = context.clone();
        shell_copy.publish(Some(session("jwt-2")));
        assert_eq!(context.access_token().as_deref(), Some("jwt-2"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", session("secret-token"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_session_deserializes_from_token_response() {
        let body = serde_json::json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1_735_693_200,
            "refresh_token": "refresh",
            "user": { "id": "u1", "email": "admin@example.com", "role": "authenticated" }
        });
        let session: Session = serde_json::from_value(body).unwrap();
        assert_eq!(session.user.id, UserId::new("u1"));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
    }
}
