//! Shared state for the HTTP handlers.
//!
//! Built once at startup from [`Config`]. Everything inside is behind `Arc`,
//! so cloning per request is cheap.

use crate::config::{Config, EmailConfig, EmailProviderKind, StoreConfig};
use sathi_bookings::{AuthClient, BookingRepository, PostgrestRepository};
use sathi_core::environment::SystemClock;
use sathi_notifications::providers::{ConsoleEmailProvider, ResendEmailProvider, SmtpEmailProvider};
use sathi_notifications::{EmailProvider, NotificationService};
use std::sync::Arc;

/// Hands out a repository acting as a given caller
///
/// The data store enforces row-level policies per bearer token, so every
/// request gets a repository bound to the caller's token (or the anon role).
pub trait RepositorySource: Send + Sync {
    /// Repository authenticated with `access_token`, or anonymous
    fn for_caller(&self, access_token: Option<&str>) -> Arc<dyn BookingRepository>;
}

impl RepositorySource for PostgrestRepository {
    fn for_caller(&self, access_token: Option<&str>) -> Arc<dyn BookingRepository> {
        match access_token {
            Some(token) => Arc::new(self.with_access_token(token)),
            None => Arc::new(self.clone()),
        }
    }
}

/// Clients for the hosted store
#[derive(Clone)]
pub struct StoreServices {
    /// Repository per caller
    pub repositories: Arc<dyn RepositorySource>,
    /// Resolves bearer tokens to users
    pub auth: AuthClient,
}

impl StoreServices {
    /// Clients for a configured store
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            repositories: Arc::new(PostgrestRepository::with_client(
                client.clone(),
                &config.supabase_url,
                config.anon_key.clone(),
            )),
            auth: AuthClient::with_client(client, &config.supabase_url, config.anon_key.clone()),
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Email rendering and delivery
    pub notifications: Arc<NotificationService>,
    /// Which provider `notifications` was built with
    pub email_provider: EmailProviderKind,
    /// Present when the data store is configured
    pub store: Option<StoreServices>,
}

impl AppState {
    /// Assemble state from parts
    #[must_use]
    pub const fn new(
        notifications: Arc<NotificationService>,
        email_provider: EmailProviderKind,
        store: Option<StoreServices>,
    ) -> Self {
        Self {
            notifications,
            email_provider,
            store,
        }
    }

    /// Build every client the configuration asks for
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let service = NotificationService::new(email_provider(&config.email), Arc::new(SystemClock))
            .with_sender(config.email.from.clone())
            .with_admin_recipient(config.email.admin_recipient.clone());

        Self::new(
            Arc::new(service),
            config.email.provider,
            config.store.as_ref().map(StoreServices::from_config),
        )
    }
}

/// Provider selected by the configuration
///
/// Falls back to the console provider when the selected one lacks its
/// settings; configuration loading already rejects that case.
#[must_use]
pub fn email_provider(config: &EmailConfig) -> Arc<dyn EmailProvider> {
    match (config.provider, &config.resend_api_key, &config.smtp) {
        (EmailProviderKind::Resend, Some(api_key), _) => Arc::new(ResendEmailProvider::with_api_url(
            api_key.clone(),
            config.resend_api_url.clone(),
        )),
        (EmailProviderKind::Smtp, _, Some(smtp)) => Arc::new(SmtpEmailProvider::new(
            smtp.server.clone(),
            smtp.port,
            smtp.username.clone(),
            smtp.password.clone(),
        )),
        _ => Arc::new(ConsoleEmailProvider::new()),
    }
}
