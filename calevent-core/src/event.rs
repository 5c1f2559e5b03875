//! Calendar event, user and calendar types.
//!
//! Events reference each other (parent/children), their calendar and their
//! organizer user by id only. The `EventStore` resolves those ids.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a stored calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

/// A user account that can organize events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Lookup key for organizer resolution (exact match)
    pub email: String,
    pub full_name: String,
}

/// A user calendar that events belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: CalendarId,
    pub name: String,
    pub owner: Option<User>,
}

/// A calendar event, possibly part of a recurring family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarId>,

    /// iCalendar UID, write-once across a recurring family
    #[serde(default)]
    pub uid: Option<String>,
    /// System events are never subject to organizer resolution
    #[serde(default)]
    pub is_system_event: bool,

    // Organizer
    #[serde(default)]
    pub organizer_email: Option<String>,
    #[serde(default)]
    pub organizer_display_name: Option<String>,
    #[serde(default)]
    pub organizer_user: Option<UserId>,
    /// Derived state, refreshed during organizer resolution
    #[serde(default)]
    pub is_organizer: Option<bool>,

    // Recurring family
    /// Series master this event is an instance of
    #[serde(default)]
    pub parent: Option<EventId>,
    /// Recurring instances, in order (only on a master)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_events: Vec<EventId>,
}

impl CalendarEvent {
    pub fn new(id: EventId, title: impl Into<String>) -> Self {
        CalendarEvent {
            id,
            title: title.into(),
            start: None,
            end: None,
            calendar: None,
            uid: None,
            is_system_event: false,
            organizer_email: None,
            organizer_display_name: None,
            organizer_user: None,
            is_organizer: None,
            parent: None,
            child_events: Vec::new(),
        }
    }

    /// Organizer email, treating an empty string as absent.
    pub fn organizer_email(&self) -> Option<&str> {
        non_empty(self.organizer_email.as_deref())
    }

    /// Organizer display name, treating an empty string as absent.
    pub fn organizer_display_name(&self) -> Option<&str> {
        non_empty(self.organizer_display_name.as_deref())
    }

    /// Human-readable time span, e.g. `2025-03-20 15:00 → 16:00`.
    /// The end keeps only the time when it falls on the start day.
    pub fn time_span(&self) -> Option<String> {
        let start = self.start?;
        let mut span = start.format("%Y-%m-%d %H:%M").to_string();

        if let Some(end) = self.end {
            let end_format = if end.date_naive() == start.date_naive() {
                "%H:%M"
            } else {
                "%Y-%m-%d %H:%M"
            };
            span.push_str(&format!(" → {}", end.format(end_format)));
        }

        Some(span)
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.title)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
