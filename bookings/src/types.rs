//! Booking data model
//!
//! These types mirror the rows the hosted store returns. Field names stay
//! snake_case on the wire because that is how the tables are defined.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Raw id
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Booking primary key
    BookingId
);
string_id!(
    /// Companion primary key
    CompanionId
);
string_id!(
    /// Auth user id, shared by profiles and bookings
    UserId
);

/// Lifecycle of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Requested by the customer, awaiting an admin
    #[default]
    Pending,
    /// Accepted by an admin
    Confirmed,
    /// The meeting took place
    Completed,
    /// Declined or withdrawn
    Cancelled,
}

impl BookingStatus {
    /// Every status, in lifecycle order
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not one of the four booking statuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown booking status `{0}` (expected pending, confirmed, completed or cancelled)")]
pub struct StatusParseError(pub String);

impl FromStr for BookingStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// Interaction style requested for a booking, e.g. `silent_observant`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresenceNature(String);

impl PresenceNature {
    /// Wrap a wire tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Wire tag
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human label: underscores become spaces
    #[must_use]
    pub fn label(&self) -> String {
        self.0.replace('_', " ")
    }
}

/// A companion's advertised energy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnergyType {
    /// `silent_observant`
    SilentObservant,
    /// `comforting_presence`
    ComfortingPresence,
    /// `public_event_plus_one`
    PublicEventPlusOne,
    /// `calm_listener`
    CalmListener,
    /// `gentle_companion`
    GentleCompanion,
    /// Any tag this build does not know, kept verbatim
    Other(String),
}

impl EnergyType {
    /// Wire tag
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SilentObservant => "silent_observant",
            Self::ComfortingPresence => "comforting_presence",
            Self::PublicEventPlusOne => "public_event_plus_one",
            Self::CalmListener => "calm_listener",
            Self::GentleCompanion => "gentle_companion",
            Self::Other(tag) => tag,
        }
    }

    /// Display label; unknown tags are shown as is
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::SilentObservant => "Silent & Observant",
            Self::ComfortingPresence => "Comforting Presence",
            Self::PublicEventPlusOne => "Event +1",
            Self::CalmListener => "Calm Listener",
            Self::GentleCompanion => "Gentle Companion",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for EnergyType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "silent_observant" => Self::SilentObservant,
            "comforting_presence" => Self::ComfortingPresence,
            "public_event_plus_one" => Self::PublicEventPlusOne,
            "calm_listener" => Self::CalmListener,
            "gentle_companion" => Self::GentleCompanion,
            _ => Self::Other(tag),
        }
    }
}

impl From<EnergyType> for String {
    fn from(energy: EnergyType) -> Self {
        match energy {
            EnergyType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// One row of the `bookings` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Primary key
    pub id: BookingId,
    /// Booked companion
    pub companion_id: CompanionId,
    /// Customer
    pub user_id: UserId,
    /// Day of the meeting
    pub booking_date: NaiveDate,
    /// `HH:MM` or `HH:MM:SS`
    pub start_time: String,
    /// Length of the meeting in hours
    pub duration_hours: f64,
    /// Venue name
    pub venue_name: String,
    /// Venue street address
    pub venue_address: String,
    /// Requested interaction style
    pub presence_nature: PresenceNature,
    /// Total in rupees
    pub total_amount: f64,
    /// Current status; a missing value reads as pending
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: BookingStatus,
    /// Free-text notes from the customer
    #[serde(default)]
    pub special_notes: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

fn status_or_pending<'de, D>(deserializer: D) -> Result<BookingStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<BookingStatus>::deserialize(deserializer)?.unwrap_or_default())
}

/// A booking as the admin list shows it, with the joined companion name and
/// customer email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminBooking {
    /// The booking row
    #[serde(flatten)]
    pub booking: Booking,
    /// Name of the booked companion, if the join found one
    #[serde(default)]
    pub companion_name: Option<String>,
    /// Customer email, if the customer has a profile
    #[serde(default)]
    pub user_email: Option<String>,
}

/// A booking as the customer dashboard shows it, with the full companion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingWithCompanion {
    /// The booking row
    #[serde(flatten)]
    pub booking: Booking,
    /// Joined companion row
    #[serde(default, rename = "companions")]
    pub companion: Option<Companion>,
}

/// Fallback avatar service, seeded by name
pub const AVATAR_FALLBACK_BASE: &str = "https://api.dicebear.com/7.x/lorelei/svg?seed=";

/// Rating shown for companions without one
pub const DEFAULT_RATING: f64 = 4.5;

/// Bio shown for companions without one
pub const DEFAULT_BIO: &str = "A professional presence companion ready to be there for you.";

/// One row of the `companions` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    /// Primary key
    pub id: CompanionId,
    /// Display name
    pub name: String,
    /// Uploaded avatar
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Price per hour in rupees
    pub hourly_rate: f64,
    /// Home city
    pub city: String,
    /// Advertised energy
    pub energy_type: EnergyType,
    /// Accepting bookings
    #[serde(default)]
    pub is_available: bool,
    /// Identity verified by the team
    #[serde(default)]
    pub is_verified: bool,
    /// Average rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Free-text bio
    #[serde(default)]
    pub bio: Option<String>,
}

impl Companion {
    /// Uploaded avatar, or a generated one seeded by name
    #[must_use]
    pub fn avatar(&self) -> String {
        self.avatar_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("{AVATAR_FALLBACK_BASE}{}", self.name))
    }

    /// Rating, or [`DEFAULT_RATING`] when unrated
    #[must_use]
    pub fn display_rating(&self) -> f64 {
        self.rating.filter(|r| *r > 0.0).unwrap_or(DEFAULT_RATING)
    }

    /// Bio, or [`DEFAULT_BIO`] when empty
    #[must_use]
    pub fn display_bio(&self) -> &str {
        self.bio
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BIO)
    }
}

/// One row of the `profiles` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Same id as the auth user
    pub id: UserId,
    /// Account email
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in BookingStatus::ALL {
            assert_eq!(status.to_string().parse::<BookingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = "archived".parse::<BookingStatus>().unwrap_err();
        assert_eq!(err, StatusParseError("archived".to_string()));
        assert!("Confirmed".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_energy_labels() {
        let cases = [
            ("silent_observant", "Silent & Observant"),
            ("comforting_presence", "Comforting Presence"),
            ("public_event_plus_one", "Event +1"),
            ("calm_listener", "Calm Listener"),
            ("gentle_companion", "Gentle Companion"),
            ("night_owl", "night_owl"),
        ];
        for (tag, label) in cases {
            let energy = EnergyType::from(tag.to_string());
            assert_eq!(energy.label(), label);
            assert_eq!(energy.as_str(), tag);
        }
    }

    #[test]
    fn test_presence_label() {
        assert_eq!(
            PresenceNature::new("public_event_plus_one").label(),
            "public event plus one"
        );
    }

    #[test]
    fn test_booking_null_status_reads_pending() {
        let booking: Booking = serde_json::from_value(json!({
            "id": "b1",
            "companion_id": "c1",
            "user_id": "u1",
            "booking_date": "2025-03-14",
            "start_time": "18:30:00",
            "duration_hours": 2,
            "venue_name": "Blue Tokai",
            "venue_address": "Bandra West",
            "presence_nature": "silent_observant",
            "total_amount": 3000,
            "status": null,
            "special_notes": null,
            "created_at": "2025-03-01T10:00:00.123456+00:00"
        }))
        .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.booking_date.to_string(), "2025-03-14");
    }

    #[test]
    fn test_companion_fallbacks() {
        let companion: Companion = serde_json::from_value(json!({
            "id": "c1",
            "name": "Meera",
            "avatar_url": null,
            "hourly_rate": 1500,
            "city": "Mumbai",
            "energy_type": "calm_listener",
            "is_available": true,
            "is_verified": false,
            "rating": null,
            "bio": ""
        }))
        .unwrap();

        assert_eq!(
            companion.avatar(),
            "https://api.dicebear.com/7.x/lorelei/svg?seed=Meera"
        );
        assert!((companion.display_rating() - DEFAULT_RATING).abs() < f64::EPSILON);
        assert_eq!(companion.display_bio(), DEFAULT_BIO);
        assert_eq!(companion.energy_type, EnergyType::CalmListener);
    }
}
