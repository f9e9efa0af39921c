// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Single-writer snapshot store task

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::{HealthSnapshot, SnapshotUpdate};

/// Update channel capacity; four fetches emit at most two messages each per cycle
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Owns the snapshot; applies updates in arrival order and publishes each change
pub struct SnapshotStore {
    snapshot: HealthSnapshot,
    updates: mpsc::Receiver<SnapshotUpdate>,
    publisher: watch::Sender<HealthSnapshot>,
}

/// Sending half of the store's update channel
#[derive(Clone)]
pub struct SnapshotUpdater {
    tx: mpsc::Sender<SnapshotUpdate>,
}

impl SnapshotUpdater {
    /// Delivers `update` to the store.
    ///
    /// Returns `false` when the store has already shut down; the update is dropped.
    pub async fn send(&self, update: SnapshotUpdate) -> bool {
        if self.tx.send(update).await.is_err() {
            tracing::debug!("Snapshot store is gone, dropping update");
            return false;
        }
        true
    }

    /// Whether the store is still accepting updates
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.tx.is_closed()
    }
}

impl SnapshotStore {
    /// Creates a store with a default snapshot.
    ///
    /// Returns the store, the updater for fetch completions, and a subscription
    /// for renderers.
    #[must_use]
    pub fn new() -> (Self, SnapshotUpdater, watch::Receiver<HealthSnapshot>) {
        let (tx, updates) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let (publisher, subscription) = watch::channel(HealthSnapshot::default());
        let store = Self {
            snapshot: HealthSnapshot::default(),
            updates,
            publisher,
        };
        (store, SnapshotUpdater { tx }, subscription)
    }

    /// Runs the store until shutdown or until every updater is dropped.
    ///
    /// The returned handle resolves to the final snapshot.
    pub fn spawn(self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<HealthSnapshot> {
        tokio::spawn(self.run(shutdown_rx))
    }

    async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> HealthSnapshot {
        tracing::debug!("Snapshot store started");
        loop {
            tokio::select! {
                update = self.updates.recv() => {
                    let Some(update) = update else {
                        tracing::debug!("All snapshot updaters dropped");
                        break;
                    };
                    tracing::trace!("Applying snapshot update: {:?}", update);
                    if self.snapshot.apply(update) {
                        self.publisher.send_replace(self.snapshot.clone());
                    }
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        tracing::debug!("Stopping snapshot store");
                        break;
                    }
                }
            }
        }
        // Late completions now fail to send instead of touching the snapshot
        self.updates.close();
        self.snapshot
    }
}
