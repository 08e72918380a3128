// src/handlers/mod.rs
pub mod auth;
pub mod campus;
pub mod chat;
pub mod events;
pub mod info;
pub mod ui;
