use std::path::Path;

use anyhow::{Context, Result};
use calevent_core::EventId;
use calevent_core::store::EventStore;
use calevent_core::users::UserDirectory;
use owo_colors::OwoColorize;

use crate::render::Render;

/// Resolve organizers of one event, or of every event when `event` is None.
pub fn run(store_path: &Path, users_path: &Path, event: Option<EventId>) -> Result<()> {
    let mut store = EventStore::load(store_path)?;
    let users = UserDirectory::load(users_path)
        .with_context(|| format!("Could not load users from {}", users_path.display()))?;

    let changed = resolve(&mut store, &users, event)?;

    if changed.is_empty() {
        println!("{}", "No organizer changes".dimmed());
        return Ok(());
    }

    store.save(store_path)?;
    for id in changed {
        println!("{} {}", "~".yellow(), store.event(id)?.render());
    }

    Ok(())
}

fn resolve(
    store: &mut EventStore,
    users: &UserDirectory,
    event: Option<EventId>,
) -> Result<Vec<EventId>> {
    match event {
        Some(id) => {
            let before = store.event(id)?.clone();
            store.resolve_organizer(id, users)?;
            let after = store.event(id)?;
            let changed = before.organizer_user != after.organizer_user
                || before.organizer_display_name != after.organizer_display_name;
            Ok(if changed { vec![id] } else { Vec::new() })
        }
        None => Ok(store.resolve_all_organizers(users)?),
    }
}
