use service_zones::lifecycle::ZoneEvent;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{DatabaseError, PgDatabase};

/// Mirrors registry mutations into the database until the sending side is
/// dropped. Failed writes are logged and skipped.
pub async fn run_zone_writer(database: PgDatabase, mut events: UnboundedReceiver<ZoneEvent>) {
    log::info!("Zone writer started.");
    while let Some(event) = events.recv().await {
        let id = event.zone_id();
        let result = match event {
            ZoneEvent::Created(zone) | ZoneEvent::Updated(zone) => {
                database.upsert_zone(&zone).await.map(|_| ())
            }
            ZoneEvent::Deleted(id) => match database.delete_zone(id).await {
                // never persisted, nothing to remove
                Err(DatabaseError::NotFound) => Ok(()),
                other => other,
            },
        };
        if let Err(why) = result {
            log::error!("Failed to persist zone {id}: {why}");
        }
    }
    log::info!("Zone writer stopped.");
}
