//! Resend HTTP API provider

use crate::email::{EmailProvider, OutgoingEmail, SendFuture};
use crate::error::NotificationError;
use reqwest::Client;

/// Default Resend API base URL
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Sends email through `POST {api_url}/emails`
///
/// The JSON body of the response is returned whatever the status code: Resend
/// reports validation problems as JSON with a 4xx status, and callers expect to
/// see that body. Non-2xx statuses are logged at `warn`.
///
/// ```ignore
/// let provider = ResendEmailProvider::new(api_key);
/// let body = provider.send(email).await?;
/// ```
#[derive(Clone)]
pub struct ResendEmailProvider {
    client: Client,
    api_key: String,
    api_url: String,
}

impl ResendEmailProvider {
    /// Create a provider against the public Resend API
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self::with_api_url(api_key, DEFAULT_RESEND_API_URL.to_string())
    }

    /// Create a provider against a custom base URL
    #[must_use]
    pub fn with_api_url(api_key: String, api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn deliver(&self, email: OutgoingEmail) -> Result<serde_json::Value, NotificationError> {
        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await
            .map_err(|e| NotificationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| NotificationError::ResponseParseFailed(e.to_string()))?;

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Resend accepted email");
        } else {
            tracing::warn!(
                status = status.as_u16(),
                body = %body,
                "Resend answered with an error status"
            );
        }

        Ok(body)
    }
}

impl std::fmt::Debug for ResendEmailProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendEmailProvider")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl EmailProvider for ResendEmailProvider {
    fn send(&self, email: OutgoingEmail) -> SendFuture<'_> {
        Box::pin(self.deliver(email))
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}
