//! Ticks a party's wheel on a timer until the spin resolves.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::SharedParty;
use crate::store::{partition, BlobStore};
use crate::wheel::Tick;

/// Runs spin number `spin_id` of `party`. The task exits on its own once the
/// spin resolves, is aborted, or is replaced by a newer spin.
pub fn spawn_spin<S>(party: SharedParty, store: Arc<S>, spin_id: u64, every: Duration) -> JoinHandle<()>
where
    S: BlobStore + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let (party_id, outcome) = {
                let mut p = party.lock();
                if p.spin_id() != spin_id {
                    return;
                }
                let now = p.now_ms();
                (p.id().to_string(), p.tick(now))
            };
            match outcome {
                Ok(Tick::Continue) => continue,
                Ok(Tick::Idle) => {
                    tracing::debug!(%party_id, spin_id, "spin no longer running");
                    return;
                }
                Ok(Tick::Selected(selection)) => {
                    let file = selection.occupant.file_name.clone();
                    tracing::info!(%party_id, seat = selection.seat_index, %file, "winner selected");
                    let parts = party.lock().partitions().clone();
                    if let Err(err) = partition::complete(store.as_ref(), &parts, &file).await {
                        tracing::warn!(%party_id, %file, %err, "could not move photo to completed");
                    }
                    return;
                }
                Err(err) => {
                    tracing::warn!(%party_id, spin_id, %err, "spin ended without a winner");
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::{Participant, Party, Track};
    use crate::store::{MemoryStore, Partitions};
    use crate::wheel::SpinConfig;
    use axum::body::Bytes;
    use parking_lot::Mutex;

    #[tokio::test]
    async fn driver_resolves_and_moves_photo() {
        let store = Arc::new(MemoryStore::new());
        let parts = Partitions::new("p");
        store.put(&parts.incoming_key("Ann.jpg"), Bytes::from_static(b"ann")).await.unwrap();

        let config = SpinConfig { accel_ms: 20.0, decel_ms: 20.0, ..SpinConfig::default() };
        let party = Arc::new(Mutex::new(Party::new("p", parts.clone(), config)));
        let spin_id = {
            let mut p = party.lock();
            p.enqueue(Participant::from_file("Ann.jpg")).unwrap();
            p.seat_from_queue(0).unwrap();
            let now = p.now_ms();
            p.start_spin(now, Some(Track { file: "m1.mp3".into(), duration_ms: Some(60.0) })).unwrap()
        };

        spawn_spin(party.clone(), store.clone(), spin_id, Duration::from_millis(5)).await.unwrap();

        let pending = party.lock().pending().map(|s| s.seat_index);
        assert_eq!(pending, Some(0));
        assert!(store.list(&parts.incoming_prefix()).await.unwrap().is_empty());
        assert_eq!(store.list(&parts.completed_prefix()).await.unwrap(), vec![parts.completed_key("Ann.jpg")]);
    }

    #[tokio::test]
    async fn stale_driver_exits() {
        let store = Arc::new(MemoryStore::new());
        let party = Arc::new(Mutex::new(Party::new("p", Partitions::new("p"), SpinConfig::default())));
        spawn_spin(party.clone(), store, 3, Duration::from_millis(1)).await.unwrap();
        assert!(!party.lock().is_spinning());
    }
}
