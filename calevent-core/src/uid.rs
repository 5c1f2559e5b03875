//! UID spreading across recurring families.
//!
//! A recurring family (one master plus its instances) shares a single
//! iCalendar UID. UIDs are write-once: spreading never overwrites a UID that
//! is already set, it fails with `UidAlreadySet` instead. Spreading is not
//! transactional. Writes made before a conflict stay in place, and the caller
//! is expected to discard the store rather than persist it.

use uuid::Uuid;

use crate::error::{CalEventError, CalEventResult};
use crate::event::{CalendarEvent, EventId};
use crate::store::EventStore;

/// Set the UID of an event that has none yet.
pub fn set_or_fail(event: &mut CalendarEvent, uid: &str) -> CalEventResult<()> {
    if let Some(existing) = &event.uid {
        return Err(CalEventError::UidAlreadySet {
            uid: uid.to_string(),
            event_id: event.id,
            existing: existing.clone(),
        });
    }

    log::trace!("Setting UID {} on event {}", uid, event.id);
    event.uid = Some(uid.to_string());
    Ok(())
}

/// Spread the UID of an event to the rest of its recurring family.
///
/// From an instance, the UID goes to the master and then to every other
/// instance of that master. From a master, it goes to all its instances.
/// An event without a UID has nothing to spread.
pub fn spread_uid(store: &mut EventStore, id: EventId) -> CalEventResult<()> {
    let event = store.event(id)?;
    let Some(uid) = event.uid.clone() else {
        log::debug!("Event {} has no UID to spread", id);
        return Ok(());
    };

    let mut target = id;
    let mut excluded_child = None;

    if let Some(parent) = event.parent {
        set_or_fail(store.event_mut(parent)?, &uid)?;
        excluded_child = Some(id);
        target = parent;
    }

    let children = store.event(target)?.child_events.clone();
    for child in children {
        if excluded_child == Some(child) {
            continue;
        }
        set_or_fail(store.event_mut(child)?, &uid)?;
    }

    log::debug!("Spread UID {} across the family of {}", uid, target);
    Ok(())
}

/// Generate a fresh UID for the family of an event and spread it.
///
/// Fails with `UidAlreadySet` if the family master already carries a UID.
pub fn assign_uid(store: &mut EventStore, id: EventId) -> CalEventResult<String> {
    let master = store.family_of(id)?[0];
    let uid = generate_uid();

    set_or_fail(store.event_mut(master)?, &uid)?;
    spread_uid(store, master)?;

    Ok(uid)
}

pub fn generate_uid() -> String {
    format!("{}@calevent", Uuid::new_v4())
}
