use std::path::Path;

use anyhow::Result;
use calevent_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::render::render_family;

pub fn run(store_path: &Path) -> Result<()> {
    let store = EventStore::load(store_path)?;

    if store.is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    for master_id in store.masters() {
        let master = store.event(master_id)?;
        let instances = master
            .child_events
            .iter()
            .map(|id| store.event(*id))
            .collect::<Result<Vec<_>, _>>()?;

        println!("{}", render_family(master, &instances));
    }

    Ok(())
}
