//! PostgREST client for the hosted store

use super::{BookingRepository, RepositoryFuture};
use crate::error::RepositoryError;
use crate::types::{
    AdminBooking, Booking, BookingId, BookingStatus, BookingWithCompanion, Companion, UserId,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

const ADMIN_BOOKINGS_SELECT: &str = "*,companions:companion_id(name),profiles:user_id(email)";
const USER_BOOKINGS_SELECT: &str = "*,companions(*)";

/// Talks to `{supabase_url}/rest/v1`
///
/// Requests carry the project's anon key as `apikey` and, as bearer, the
/// caller's access token when one is set or the anon key otherwise.
///
/// ```ignore
/// let repository = PostgrestRepository::new(supabase_url, anon_key)
///     .with_access_token(session.access_token.clone());
/// let bookings = repository.list_admin_bookings().await?;
/// ```
#[derive(Clone)]
pub struct PostgrestRepository {
    client: Client,
    rest_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl PostgrestRepository {
    /// Create a client for a project, authenticated as the anon role
    #[must_use]
    pub fn new(supabase_url: &str, anon_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), supabase_url, anon_key)
    }

    /// Create a client reusing an existing connection pool
    #[must_use]
    pub fn with_client(client: Client, supabase_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            rest_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.into(),
            access_token: None,
        }
    }

    /// Same project, acting as the user the token belongs to
    #[must_use]
    pub fn with_access_token(&self, access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..self.clone()
        }
    }

    /// Base URL requests go to
    #[must_use]
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        builder.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    fn get(&self, table: &str) -> RequestBuilder {
        self.authorized(self.client.get(format!("{}/{table}", self.rest_url)))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, RepositoryError> {
        let response = builder
            .send()
            .await
            .map_err(|e| RepositoryError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %message, "Store request refused");
        Err(RepositoryError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, RepositoryError> {
        Self::send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| RepositoryError::ResponseParseFailed(e.to_string()))
    }
}

impl std::fmt::Debug for PostgrestRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestRepository")
            .field("rest_url", &self.rest_url)
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct NameOnly {
    name: Option<String>,
}

#[derive(Deserialize)]
struct EmailOnly {
    email: Option<String>,
}

/// Admin list row as the join returns it
#[derive(Deserialize)]
struct AdminBookingRow {
    #[serde(flatten)]
    booking: Booking,
    #[serde(default)]
    companions: Option<NameOnly>,
    #[serde(default)]
    profiles: Option<EmailOnly>,
}

impl From<AdminBookingRow> for AdminBooking {
    fn from(row: AdminBookingRow) -> Self {
        Self {
            booking: row.booking,
            companion_name: row.companions.and_then(|c| c.name),
            user_email: row.profiles.and_then(|p| p.email),
        }
    }
}

impl BookingRepository for PostgrestRepository {
    fn list_available_companions(&self) -> RepositoryFuture<'_, Vec<Companion>> {
        Box::pin(async move {
            let request = self.get("companions").query(&[
                ("select", "*"),
                ("is_available", "eq.true"),
                ("order", "rating.desc"),
            ]);
            Self::fetch::<Vec<Companion>>(request).await
        })
    }

    fn list_user_bookings(&self, user_id: &UserId) -> RepositoryFuture<'_, Vec<BookingWithCompanion>> {
        let user_filter = format!("eq.{user_id}");
        Box::pin(async move {
            let request = self.get("bookings").query(&[
                ("select", USER_BOOKINGS_SELECT),
                ("user_id", user_filter.as_str()),
                ("order", "booking_date.desc"),
            ]);
            Self::fetch::<Vec<BookingWithCompanion>>(request).await
        })
    }

    fn list_admin_bookings(&self) -> RepositoryFuture<'_, Vec<AdminBooking>> {
        Box::pin(async move {
            let request = self.get("bookings").query(&[
                ("select", ADMIN_BOOKINGS_SELECT),
                ("order", "created_at.desc"),
            ]);
            let rows: Vec<AdminBookingRow> = Self::fetch(request).await?;
            tracing::debug!(count = rows.len(), "Fetched admin bookings");
            Ok::<_, RepositoryError>(rows.into_iter().map(AdminBooking::from).collect::<Vec<_>>())
        })
    }

    fn update_status(
        &self,
        booking_id: &BookingId,
        status: BookingStatus,
    ) -> RepositoryFuture<'_, ()> {
        let id_filter = format!("eq.{booking_id}");
        Box::pin(async move {
            let request = self
                .authorized(self.client.patch(format!("{}/bookings", self.rest_url)))
                .query(&[("id", id_filter.as_str())])
                .header("Prefer", "return=minimal")
                .json(&json!({ "status": status }));
            Self::send(request).await?;
            Ok::<(), RepositoryError>(())
        })
    }
}
