pub mod controller;
pub mod store;

pub use controller::{fallback_events, EventsController, RegistrationError};
pub use store::{EventStore, PgEventStore, StoreError};
