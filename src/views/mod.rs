//! Server-rendered pages: fixed copy plus the shared layout.

pub mod content;
pub mod layout;
