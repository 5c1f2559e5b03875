use std::path::Path;

use anyhow::{Result, bail};
use calevent_core::store::EventStore;
use calevent_core::{CalEventError, EventId, uid};
use owo_colors::OwoColorize;

use crate::render::render_family;

/// Spread an event's UID across its family. The store is only saved when
/// every event in the family accepted the UID.
pub fn spread(store_path: &Path, event: EventId) -> Result<()> {
    let mut store = EventStore::load(store_path)?;

    reject_conflicts(uid::spread_uid(&mut store, event))?;
    store.save(store_path)?;

    print_family(&store, event)
}

/// Generate a UID for an event's family and spread it.
pub fn assign(store_path: &Path, event: EventId) -> Result<()> {
    let mut store = EventStore::load(store_path)?;

    let new_uid = reject_conflicts(uid::assign_uid(&mut store, event))?;
    store.save(store_path)?;

    println!("{} {}", "Assigned".green(), new_uid);
    print_family(&store, event)
}

fn reject_conflicts<T>(result: Result<T, CalEventError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e @ CalEventError::UidAlreadySet { .. }) => {
            bail!("Conflicting UIDs, nothing saved: {}", e)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_family(store: &EventStore, event: EventId) -> Result<()> {
    let family = store.family_of(event)?;
    let master = store.event(family[0])?;
    let instances = family[1..]
        .iter()
        .map(|id| store.event(*id))
        .collect::<Result<Vec<_>, _>>()?;

    println!("{}", render_family(master, &instances));
    Ok(())
}
