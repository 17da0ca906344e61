//! Public companion browsing.

use super::{store, store_error};
use crate::state::AppState;
use axum::{extract::State, Json};
use sathi_bookings::Companion;
use sathi_web::WebResult;
use serde::Serialize;

/// A companion as the browse page shows it, fallbacks applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanionCard {
    /// Companion id
    pub id: String,
    /// Display name
    pub name: String,
    /// Uploaded or generated avatar
    pub avatar: String,
    /// Price per hour in rupees
    pub hourly_rate: f64,
    /// Home city
    pub city: String,
    /// Energy tag
    pub energy_type: String,
    /// Energy display label
    pub energy_label: String,
    /// Identity verified
    pub is_verified: bool,
    /// Rating, defaulted when unrated
    pub rating: f64,
    /// Bio, defaulted when empty
    pub bio: String,
}

impl From<&Companion> for CompanionCard {
    fn from(companion: &Companion) -> Self {
        Self {
            id: companion.id.to_string(),
            name: companion.name.clone(),
            avatar: companion.avatar(),
            hourly_rate: companion.hourly_rate,
            city: companion.city.clone(),
            energy_type: companion.energy_type.as_str().to_string(),
            energy_label: companion.energy_type.label().to_string(),
            is_verified: companion.is_verified,
            rating: companion.display_rating(),
            bio: companion.display_bio().to_string(),
        }
    }
}

/// `GET /api/companions`: available companions, best rated first
///
/// # Errors
///
/// Returns a `502` if the store cannot be read.
pub async fn list_companions(State(state): State<AppState>) -> WebResult<Json<Vec<CompanionCard>>> {
    let repository = store(&state)?.repositories.for_caller(None);
    let companions = repository
        .list_available_companions()
        .await
        .map_err(store_error)?;

    Ok(Json(companions.iter().map(CompanionCard::from).collect()))
}
