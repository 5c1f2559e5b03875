//! Organizer resolution.
//!
//! Repairs the organizer identity of an event (linked user account and
//! display name) from its organizer email, using a `UserLookup`.

use std::collections::BTreeMap;

use crate::error::{CalEventError, CalEventResult};
use crate::event::{Calendar, CalendarEvent, CalendarId, EventId};
use crate::store::EventStore;
use crate::users::UserLookup;

/// Computes whether the current side is the organizer of an event.
pub trait IsOrganizer {
    fn calculate(&self, event: &CalendarEvent) -> bool;
}

impl<F> IsOrganizer for F
where
    F: Fn(&CalendarEvent) -> bool,
{
    fn calculate(&self, event: &CalendarEvent) -> bool {
        self(event)
    }
}

/// An event is organized by the owner of the calendar it lives in when the
/// owner's email is the organizer email.
pub struct CalendarOwnerPolicy<'a> {
    calendars: &'a BTreeMap<CalendarId, Calendar>,
}

impl<'a> CalendarOwnerPolicy<'a> {
    pub fn new(calendars: &'a BTreeMap<CalendarId, Calendar>) -> Self {
        CalendarOwnerPolicy { calendars }
    }
}

impl IsOrganizer for CalendarOwnerPolicy<'_> {
    fn calculate(&self, event: &CalendarEvent) -> bool {
        let Some(email) = event.organizer_email() else {
            return false;
        };

        event
            .calendar
            .and_then(|id| self.calendars.get(&id))
            .and_then(|calendar| calendar.owner.as_ref())
            .is_some_and(|owner| owner.email == email)
    }
}

/// Resolve the organizer of a single event in place.
///
/// System events are left alone. Lookup failures are returned as-is.
pub fn resolve_organizer<L, P>(
    event: &mut CalendarEvent,
    users: &L,
    is_organizer: &P,
) -> CalEventResult<()>
where
    L: UserLookup + ?Sized,
    P: IsOrganizer + ?Sized,
{
    if event.is_system_event {
        return Ok(());
    }

    let calculated = is_organizer.calculate(event);
    event.is_organizer = Some(calculated);

    let Some(email) = event.organizer_email().map(str::to_owned) else {
        return Ok(());
    };

    // An organizer that is us and already linked needs no lookup, even if
    // the linked user's email differs from organizer_email.
    if calculated && event.organizer_user.is_some() {
        return Ok(());
    }

    let mut display_name = email.clone();

    if let Some(user) = users.find_by_email(&email)? {
        log::debug!("Organizer {} of event {} is {}", email, event.id, user.id);
        event.organizer_user = Some(user.id);
        if !user.full_name.is_empty() {
            display_name = user.full_name;
        }
    }

    if event.organizer_display_name().is_none() {
        event.organizer_display_name = Some(display_name);
    }

    Ok(())
}

impl EventStore {
    /// Resolve the organizer of a stored event, deciding `is_organizer`
    /// from the owner of the event's calendar.
    pub fn resolve_organizer<L>(&mut self, id: EventId, users: &L) -> CalEventResult<()>
    where
        L: UserLookup + ?Sized,
    {
        let EventStore { events, calendars } = self;
        let event = events.get_mut(&id).ok_or(CalEventError::EventNotFound(id))?;

        resolve_organizer(event, users, &CalendarOwnerPolicy::new(calendars))
    }

    /// Resolve organizers of every stored event. Returns the ids of events
    /// whose organizer fields changed.
    pub fn resolve_all_organizers<L>(&mut self, users: &L) -> CalEventResult<Vec<EventId>>
    where
        L: UserLookup + ?Sized,
    {
        let EventStore { events, calendars } = self;
        let policy = CalendarOwnerPolicy::new(calendars);

        let mut changed = Vec::new();
        for event in events.values_mut() {
            let before = (
                event.organizer_user,
                event.organizer_display_name.clone(),
            );
            resolve_organizer(event, users, &policy)?;
            if before != (event.organizer_user, event.organizer_display_name.clone()) {
                changed.push(event.id);
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{User, UserId};
    use crate::users::UserDirectory;
    use std::cell::Cell;

    fn alice() -> User {
        User {
            id: UserId(1),
            email: "a@x.com".to_string(),
            full_name: "Alice A.".to_string(),
        }
    }

    fn directory() -> UserDirectory {
        [alice()].into_iter().collect()
    }

    fn event_with_email(email: &str) -> CalendarEvent {
        let mut event = CalendarEvent::new(EventId(1), "Review");
        event.organizer_email = Some(email.to_string());
        event
    }

    fn never(_: &CalendarEvent) -> bool {
        false
    }

    fn always(_: &CalendarEvent) -> bool {
        true
    }

    /// Counts lookups and delegates to a directory.
    struct CountingLookup {
        inner: UserDirectory,
        calls: Cell<usize>,
    }

    impl UserLookup for CountingLookup {
        fn find_by_email(&self, email: &str) -> CalEventResult<Option<User>> {
            self.calls.set(self.calls.get() + 1);
            self.inner.find_by_email(email)
        }
    }

    struct FailingLookup;

    impl UserLookup for FailingLookup {
        fn find_by_email(&self, _email: &str) -> CalEventResult<Option<User>> {
            Err(CalEventError::Lookup("connection refused".to_string()))
        }
    }

    #[test]
    fn test_system_event_is_untouched() {
        let mut event = event_with_email("a@x.com");
        event.is_system_event = true;
        let original = event.clone();

        let lookup = CountingLookup {
            inner: directory(),
            calls: Cell::new(0),
        };
        resolve_organizer(&mut event, &lookup, &always).unwrap();

        assert_eq!(event, original, "System event must not change");
        assert_eq!(lookup.calls.get(), 0);
    }

    #[test]
    fn test_missing_email_is_noop() {
        for email in [None, Some(String::new())] {
            let mut event = CalendarEvent::new(EventId(1), "Review");
            event.organizer_email = email.clone();

            let lookup = CountingLookup {
                inner: directory(),
                calls: Cell::new(0),
            };
            resolve_organizer(&mut event, &lookup, &never).unwrap();

            assert_eq!(event.organizer_email, email);
            assert_eq!(event.organizer_user, None);
            assert_eq!(event.organizer_display_name, None);
            assert_eq!(lookup.calls.get(), 0);
        }
    }

    #[test]
    fn test_already_resolved_organizer_skips_lookup() {
        let mut event = event_with_email("a@x.com");
        event.organizer_user = Some(UserId(42));

        let lookup = CountingLookup {
            inner: directory(),
            calls: Cell::new(0),
        };
        resolve_organizer(&mut event, &lookup, &always).unwrap();

        assert_eq!(event.organizer_user, Some(UserId(42)));
        assert_eq!(event.organizer_display_name, None);
        assert_eq!(event.is_organizer, Some(true));
        assert_eq!(lookup.calls.get(), 0);
    }

    #[test]
    fn test_linked_user_is_relinked_when_not_organizer() {
        let mut event = event_with_email("a@x.com");
        event.organizer_user = Some(UserId(42));

        resolve_organizer(&mut event, &directory(), &never).unwrap();

        assert_eq!(event.organizer_user, Some(UserId(1)));
        assert_eq!(event.is_organizer, Some(false));
    }

    #[test]
    fn test_unknown_email_falls_back_to_email() {
        let mut event = event_with_email("b@x.com");

        resolve_organizer(&mut event, &directory(), &never).unwrap();

        assert_eq!(event.organizer_display_name.as_deref(), Some("b@x.com"));
        assert_eq!(event.organizer_user, None);
    }

    #[test]
    fn test_known_email_falls_back_to_full_name() {
        let mut event = event_with_email("a@x.com");

        resolve_organizer(&mut event, &directory(), &never).unwrap();

        assert_eq!(event.organizer_user, Some(UserId(1)));
        assert_eq!(event.organizer_display_name.as_deref(), Some("Alice A."));
    }

    #[test]
    fn test_existing_display_name_is_preserved() {
        let mut event = event_with_email("a@x.com");
        event.organizer_display_name = Some("Custom Name".to_string());

        resolve_organizer(&mut event, &directory(), &never).unwrap();

        assert_eq!(event.organizer_user, Some(UserId(1)));
        assert_eq!(event.organizer_display_name.as_deref(), Some("Custom Name"));
    }

    #[test]
    fn test_user_without_full_name_falls_back_to_email() {
        let directory: UserDirectory = [User {
            full_name: String::new(),
            ..alice()
        }]
        .into_iter()
        .collect();
        let mut event = event_with_email("a@x.com");

        resolve_organizer(&mut event, &directory, &never).unwrap();

        assert_eq!(event.organizer_user, Some(UserId(1)));
        assert_eq!(event.organizer_display_name.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let mut event = event_with_email("a@x.com");
        let original_name = event.organizer_display_name.clone();

        let result = resolve_organizer(&mut event, &FailingLookup, &never);

        assert!(matches!(result, Err(CalEventError::Lookup(_))));
        assert_eq!(event.organizer_user, None);
        assert_eq!(event.organizer_display_name, original_name);
    }

    #[test]
    fn test_organizer_email_is_never_modified() {
        let mut event = event_with_email("a@x.com");
        resolve_organizer(&mut event, &directory(), &never).unwrap();
        assert_eq!(event.organizer_email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_calendar_owner_policy() {
        let mut calendars = BTreeMap::new();
        calendars.insert(
            CalendarId(1),
            Calendar {
                id: CalendarId(1),
                name: "Alice".to_string(),
                owner: Some(alice()),
            },
        );
        calendars.insert(
            CalendarId(2),
            Calendar {
                id: CalendarId(2),
                name: "Shared".to_string(),
                owner: None,
            },
        );
        let policy = CalendarOwnerPolicy::new(&calendars);

        let mut event = event_with_email("a@x.com");
        assert!(!policy.calculate(&event), "No calendar means not organizer");

        event.calendar = Some(CalendarId(1));
        assert!(policy.calculate(&event));

        event.calendar = Some(CalendarId(2));
        assert!(!policy.calculate(&event), "Ownerless calendar");

        event.calendar = Some(CalendarId(1));
        event.organizer_email = Some("b@x.com".to_string());
        assert!(!policy.calculate(&event));
    }

    #[test]
    fn test_store_resolves_all_organizers() {
        let mut store = EventStore::new();
        store.add_calendar(Calendar {
            id: CalendarId(1),
            name: "Alice".to_string(),
            owner: Some(alice()),
        });

        let mut owned = event_with_email("a@x.com");
        owned.calendar = Some(CalendarId(1));
        owned.organizer_user = Some(UserId(1));
        store.insert(owned);

        let mut external = event_with_email("b@x.com");
        external.id = EventId(2);
        store.insert(external);

        let mut system = event_with_email("a@x.com");
        system.id = EventId(3);
        system.is_system_event = true;
        store.insert(system);

        let changed = store.resolve_all_organizers(&directory()).unwrap();

        assert_eq!(changed, vec![EventId(2)]);
        assert_eq!(store.get(EventId(1)).unwrap().is_organizer, Some(true));
        assert_eq!(
            store.get(EventId(2)).unwrap().organizer_display_name.as_deref(),
            Some("b@x.com")
        );
        assert_eq!(store.get(EventId(3)).unwrap().organizer_user, None);

        assert!(matches!(
            store.resolve_organizer(EventId(9), &directory()),
            Err(CalEventError::EventNotFound(EventId(9)))
        ));
    }
}
