// src/events/controller.rs
use super::store::{EventStore, StoreError};
use crate::models::event::{EventCard, EventRecord, EventRegistration, EventsResponse};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Please login to register for events")]
    LoginRequired,
    #[error("Already Registered")]
    AlreadyRegistered,
    #[error("Registration for this event is already in progress")]
    InProgress,
    #[error("Failed to register for the event. Please try again.")]
    Failed(#[source] StoreError),
}

type RegistrationKey = (Uuid, String);

/// Marks one (user, event) pair as being registered until dropped.
struct RegistrationGuard<'a> {
    in_flight: &'a Mutex<HashSet<RegistrationKey>>,
    key: RegistrationKey,
}

impl<'a> RegistrationGuard<'a> {
    fn acquire(in_flight: &'a Mutex<HashSet<RegistrationKey>>, key: RegistrationKey) -> Option<Self> {
        let mut set = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(key.clone()) {
            return None;
        }
        Some(Self { in_flight, key })
    }
}

impl Drop for RegistrationGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

pub struct EventsController {
    store: Arc<dyn EventStore>,
    in_flight: Mutex<HashSet<RegistrationKey>>,
}

impl EventsController {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Stored events by date, or the built-in list when the store has none.
    /// A failing store yields nothing.
    pub async fn list_events(&self) -> Vec<EventRecord> {
        match self.store.list_events().await {
            Ok(events) if events.is_empty() => {
                tracing::debug!("No events in database, serving built-in events");
                fallback_events()
            }
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Error fetching events: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn registrations_for(&self, user_id: Uuid) -> Vec<EventRegistration> {
        match self.store.registrations_for(user_id).await {
            Ok(registrations) => registrations,
            Err(e) => {
                tracing::error!("Error fetching registrations for user {}: {}", user_id, e);
                Vec::new()
            }
        }
    }

    /// The events page as one viewer sees it.
    pub async fn overview(&self, user_id: Option<Uuid>) -> EventsResponse {
        let events = self.list_events().await;
        let registrations = match user_id {
            Some(user_id) => self.registrations_for(user_id).await,
            None => Vec::new(),
        };

        let cards = events
            .into_iter()
            .map(|event| {
                let registered = registrations.iter().any(|r| r.event_id == event.id);
                let can_register = user_id.is_some() && !registered && !self.is_registering(user_id, &event.id);
                EventCard {
                    event,
                    registered,
                    can_register,
                }
            })
            .collect();

        EventsResponse {
            success: true,
            events: cards,
            registrations,
            signed_in: user_id.is_some(),
        }
    }

    /// Register a user for an event and return their refreshed
    /// registrations.
    pub async fn register(
        &self,
        user_id: Option<Uuid>,
        event_id: &str,
    ) -> Result<Vec<EventRegistration>, RegistrationError> {
        let user_id = user_id.ok_or(RegistrationError::LoginRequired)?;

        let _guard = RegistrationGuard::acquire(&self.in_flight, (user_id, event_id.to_string()))
            .ok_or(RegistrationError::InProgress)?;

        let existing = self.registrations_for(user_id).await;
        if existing.iter().any(|r| r.event_id == event_id) {
            return Err(RegistrationError::AlreadyRegistered);
        }

        match self.store.insert_registration(event_id, user_id).await {
            Ok(registration) => {
                tracing::info!(
                    registration_id = %registration.id,
                    event_id = %event_id,
                    user_id = %user_id,
                    "event registration created"
                );
            }
            Err(StoreError::DuplicateRegistration) => return Err(RegistrationError::AlreadyRegistered),
            Err(e) => {
                tracing::error!("Error registering user {} for event {}: {}", user_id, event_id, e);
                return Err(RegistrationError::Failed(e));
            }
        }

        Ok(self.registrations_for(user_id).await)
    }

    fn is_registering(&self, user_id: Option<Uuid>, event_id: &str) -> bool {
        let Some(user_id) = user_id else {
            return false;
        };
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(user_id, event_id.to_string()))
    }
}

fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap_or(NaiveDate::MIN)
}

/// Shown when the events table is empty.
pub fn fallback_events() -> Vec<EventRecord> {
    vec![
        EventRecord {
            id: "1".to_string(),
            title: "Aaruush 2025".to_string(),
            description: "Annual National Level Techno-Management Fest featuring competitions, workshops, and guest lectures".to_string(),
            date: day(2025, 3, 15),
            time: "09:00 AM".to_string(),
            location: "Main Ground".to_string(),
            image: "https://images.unsplash.com/photo-1540575467063-178a50c2df87?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=2070&q=80".to_string(),
        },
        EventRecord {
            id: "2".to_string(),
            title: "Milan 2025".to_string(),
            description: "Cultural festival celebrating diversity through music, dance, and art performances".to_string(),
            date: day(2025, 4, 10),
            time: "10:00 AM".to_string(),
            location: "Dr. T.P. Ganesan Auditorium".to_string(),
            image: "https://images.unsplash.com/photo-1514525253161-7a46d19cd819?ixlib=rb-4.0.3&auto=format&fit=crop&w=2074&q=80".to_string(),
        },
        EventRecord {
            id: "3".to_string(),
            title: "Tech Summit 2025".to_string(),
            description: "Industry experts share insights on emerging technologies and future trends".to_string(),
            date: day(2025, 5, 20),
            time: "11:00 AM".to_string(),
            location: "Tech Park".to_string(),
            image: "https://images.unsplash.com/photo-1505373877841-8d25f7d46678?ixlib=rb-4.0.3&auto=format&fit=crop&w=2012&q=80".to_string(),
        },
        EventRecord {
            id: "4".to_string(),
            title: "Sports Meet 2025".to_string(),
            description: "Annual inter-department sports competition featuring various athletic events".to_string(),
            date: day(2025, 6, 5),
            time: "08:00 AM".to_string(),
            location: "Main Ground".to_string(),
            image: "https://images.unsplash.com/photo-1461896836934-ffe607ba8211?ixlib=rb-4.0.3&auto=format&fit=crop&w=2070&q=80".to_string(),
        },
    ]
}
