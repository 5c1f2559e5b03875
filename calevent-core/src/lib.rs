//! Core types for calevent.
//!
//! This crate holds the calendar event business rules shared by the CLI:
//! - `event` and `store` for calendar events and the recurring-family arena
//! - `organizer` for organizer resolution against a user directory
//! - `uid` for spreading one iCalendar UID across a recurring family

pub mod config;
pub mod error;
pub mod event;
pub mod organizer;
pub mod store;
pub mod uid;
pub mod users;

pub use error::{CalEventError, CalEventResult};
pub use event::*;
