use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the `events` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub image: String,
}

/// A row of the `event_registrations` table: one user signed up for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventRegistration {
    pub id: Uuid,
    pub event_id: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// An event as shown to one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct EventCard {
    #[serde(flatten)]
    pub event: EventRecord,
    pub registered: bool,
    pub can_register: bool,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub success: bool,
    pub events: Vec<EventCard>,
    pub registrations: Vec<EventRegistration>,
    pub signed_in: bool,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub success: bool,
    pub message: String,
    pub registrations: Vec<EventRegistration>,
}
