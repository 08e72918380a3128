// src/events/store.rs
//! Persistence seam for event records and registrations.

use crate::models::event::{EventRecord, EventRegistration};
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("registration already exists")]
    DuplicateRegistration,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Every event, earliest date first.
    async fn list_events(&self) -> Result<Vec<EventRecord>, StoreError>;

    async fn registrations_for(&self, user_id: Uuid) -> Result<Vec<EventRegistration>, StoreError>;

    async fn insert_registration(&self, event_id: &str, user_id: Uuid) -> Result<EventRegistration, StoreError>;

    /// Insert an event unless one with the same id exists. Returns whether a
    /// row was written.
    async fn insert_event(&self, event: &EventRecord) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, StoreError> {
        let events = sqlx::query_as::<_, EventRecord>(
            "SELECT id, title, description, date, time, location, image FROM events ORDER BY date ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn registrations_for(&self, user_id: Uuid) -> Result<Vec<EventRegistration>, StoreError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(
            "SELECT id, event_id, user_id, created_at FROM event_registrations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(registrations)
    }

    async fn insert_registration(&self, event_id: &str, user_id: Uuid) -> Result<EventRegistration, StoreError> {
        let inserted = sqlx::query_as::<_, EventRegistration>(
            "INSERT INTO event_registrations (id, event_id, user_id, created_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (user_id, event_id) DO NOTHING
             RETURNING id, event_id, user_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        inserted.ok_or(StoreError::DuplicateRegistration)
    }

    async fn insert_event(&self, event: &EventRecord) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO events (id, title, description, date, time, location, image)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.image)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryEventStore {
    pub(crate) events: std::sync::Mutex<Vec<EventRecord>>,
    pub(crate) registrations: std::sync::Mutex<Vec<EventRegistration>>,
    pub fail_writes: std::sync::atomic::AtomicBool,
    pub fail_reads: std::sync::atomic::AtomicBool,
    pub insert_gate: Option<std::sync::Arc<tokio::sync::Notify>>,
    pub insert_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MemoryEventStore {
    pub fn with_events(events: Vec<EventRecord>) -> Self {
        Self {
            events: std::sync::Mutex::new(events),
            ..Default::default()
        }
    }

    fn failure() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[cfg(test)]
#[async_trait]
impl EventStore for MemoryEventStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, StoreError> {
        use std::sync::atomic::Ordering;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        let mut events = self.events.lock().unwrap().clone();
        events.sort_by_key(|event| event.date);
        Ok(events)
    }

    async fn registrations_for(&self, user_id: Uuid) -> Result<Vec<EventRegistration>, StoreError> {
        use std::sync::atomic::Ordering;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(self
            .registrations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_registration(&self, event_id: &str, user_id: Uuid) -> Result<EventRegistration, StoreError> {
        use std::sync::atomic::Ordering;
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.insert_gate {
            gate.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        let mut registrations = self.registrations.lock().unwrap();
        if registrations.iter().any(|r| r.user_id == user_id && r.event_id == event_id) {
            return Err(StoreError::DuplicateRegistration);
        }
        let registration = EventRegistration {
            id: Uuid::new_v4(),
            event_id: event_id.to_string(),
            user_id,
            created_at: chrono::Utc::now(),
        };
        registrations.push(registration.clone());
        Ok(registration)
    }

    async fn insert_event(&self, event: &EventRecord) -> Result<bool, StoreError> {
        let mut events = self.events.lock().unwrap();
        if events.iter().any(|e| e.id == event.id) {
            return Ok(false);
        }
        events.push(event.clone());
        Ok(true)
    }
}
