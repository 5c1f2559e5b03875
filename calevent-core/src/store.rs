//! In-memory event arena.
//!
//! Events refer to their series master and instances by `EventId`; the store
//! is the only place those ids are resolved. Persisting the store to disk is
//! up to the caller (`load`/`save`), the business rules never do it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CalEventError, CalEventResult};
use crate::event::{Calendar, CalendarEvent, CalendarId, EventId};

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    pub(crate) events: BTreeMap<EventId, CalendarEvent>,
    pub(crate) calendars: BTreeMap<CalendarId, Calendar>,
}

/// On-disk layout of a store file.
#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    #[serde(default)]
    calendars: Vec<Calendar>,
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON file. A missing file yields an empty store.
    pub fn load(path: &Path) -> CalEventResult<Self> {
        if !path.exists() {
            log::debug!("No store at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&content).map_err(|e| {
            CalEventError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let mut store = EventStore::new();
        for calendar in file.calendars {
            store.add_calendar(calendar);
        }
        store.restore_events(file.events)?;

        Ok(store)
    }

    /// Insert stored events and relink their families through
    /// `attach_child`, so a file cannot bring in what the API rejects.
    fn restore_events(&mut self, events: Vec<CalendarEvent>) -> CalEventResult<()> {
        let mut links = Vec::with_capacity(events.len());

        for mut event in events {
            let declared_parent = event.parent.take();
            let children = std::mem::take(&mut event.child_events);
            let id = event.id;

            if self.events.insert(id, event).is_some() {
                return Err(CalEventError::InvalidHierarchy(format!(
                    "event {} is stored more than once",
                    id
                )));
            }
            links.push((id, declared_parent, children));
        }

        for (id, _, children) in &links {
            for child in children {
                self.attach_child(*id, *child)?;
            }
        }

        // Instances must be listed by the master they name
        for (id, declared_parent, _) in links {
            let Some(declared) = declared_parent else {
                continue;
            };
            self.event(declared)?;

            let actual = self.event(id)?.parent;
            if actual != Some(declared) {
                return Err(CalEventError::InvalidHierarchy(format!(
                    "event {} names {} as parent but is not one of its instances",
                    id, declared
                )));
            }
        }

        Ok(())
    }

    /// Save the store to a JSON file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> CalEventResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = StoreFile {
            calendars: self.calendars.values().cloned().collect(),
            events: self.events.values().cloned().collect(),
        };

        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| CalEventError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    // EVENTS:

    /// Add an event, replacing any event with the same id.
    pub fn insert(&mut self, event: CalendarEvent) {
        self.events.insert(event.id, event);
    }

    pub fn get(&self, id: EventId) -> Option<&CalendarEvent> {
        self.events.get(&id)
    }

    pub fn get_mut(&mut self, id: EventId) -> Option<&mut CalendarEvent> {
        self.events.get_mut(&id)
    }

    pub fn event(&self, id: EventId) -> CalEventResult<&CalendarEvent> {
        self.get(id).ok_or(CalEventError::EventNotFound(id))
    }

    pub fn event_mut(&mut self, id: EventId) -> CalEventResult<&mut CalendarEvent> {
        self.get_mut(id).ok_or(CalEventError::EventNotFound(id))
    }

    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Make `child` a recurring instance of `parent`.
    ///
    /// Families are one level deep: a master cannot itself be an instance,
    /// and an instance cannot have instances of its own.
    pub fn attach_child(&mut self, parent: EventId, child: EventId) -> CalEventResult<()> {
        if parent == child {
            return Err(CalEventError::InvalidHierarchy(format!(
                "event {} cannot be its own parent",
                parent
            )));
        }

        let parent_event = self.event(parent)?;
        if let Some(grandparent) = parent_event.parent {
            return Err(CalEventError::InvalidHierarchy(format!(
                "event {} is already an instance of {}",
                parent, grandparent
            )));
        }

        let child_event = self.event(child)?;
        if !child_event.child_events.is_empty() {
            return Err(CalEventError::InvalidHierarchy(format!(
                "event {} has instances of its own",
                child
            )));
        }
        match child_event.parent {
            Some(existing) if existing != parent => {
                return Err(CalEventError::InvalidHierarchy(format!(
                    "event {} already belongs to {}",
                    child, existing
                )));
            }
            _ => {}
        }

        self.event_mut(child)?.parent = Some(parent);

        let parent_event = self.event_mut(parent)?;
        if !parent_event.child_events.contains(&child) {
            parent_event.child_events.push(child);
        }

        Ok(())
    }

    /// The recurring family of an event: its master followed by the
    /// master's instances, in order.
    pub fn family_of(&self, id: EventId) -> CalEventResult<Vec<EventId>> {
        let event = self.event(id)?;
        let master = self.event(event.parent.unwrap_or(id))?;

        let mut family = vec![master.id];
        family.extend(master.child_events.iter().copied());
        Ok(family)
    }

    /// Ids of every event that is not an instance of another one.
    pub fn masters(&self) -> Vec<EventId> {
        self.events
            .values()
            .filter(|e| e.parent.is_none())
            .map(|e| e.id)
            .collect()
    }

    // CALENDARS:

    pub fn add_calendar(&mut self, calendar: Calendar) {
        self.calendars.insert(calendar.id, calendar);
    }

    pub fn calendar(&self, id: CalendarId) -> Option<&Calendar> {
        self.calendars.get(&id)
    }
}
