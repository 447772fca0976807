use forcecue_core::{Settings, SettingsUpdate};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Owner of the current settings. Every update publishes a new immutable
/// snapshot to all live subscriptions.
pub struct SettingsStore {
    current: Arc<Settings>,
    subscribers: Vec<Sender<Arc<Settings>>>,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            current: Arc::new(initial),
            subscribers: Vec::new(),
        }
    }

    pub fn current(&self) -> Arc<Settings> {
        Arc::clone(&self.current)
    }

    pub fn subscribe(&mut self) -> SettingsSubscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        SettingsSubscription {
            rx,
            current: self.current(),
            closed: false,
        }
    }

    /// Shallow merge with no validation. Subscriptions that were dropped are
    /// forgotten.
    pub fn update(&mut self, update: SettingsUpdate) -> Arc<Settings> {
        if update.is_empty() {
            return self.current();
        }
        let next = Arc::new(self.current.merged(&update));
        tracing::debug!(?update, "settings updated");
        self.current = Arc::clone(&next);
        self.subscribers
            .retain(|tx| tx.send(Arc::clone(&next)).is_ok());
        next
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

pub struct SettingsSubscription {
    rx: Receiver<Arc<Settings>>,
    current: Arc<Settings>,
    closed: bool,
}

impl SettingsSubscription {
    pub fn current(&self) -> Arc<Settings> {
        Arc::clone(&self.current)
    }

    /// Drains pending snapshots and returns the newest one, if any arrived.
    pub fn latest(&mut self) -> Option<Arc<Settings>> {
        let mut newest = None;
        loop {
            match self.rx.try_recv() {
                Ok(snapshot) => newest = Some(snapshot),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        tracing::debug!("settings store dropped; keeping last snapshot");
                    }
                    self.closed = true;
                    break;
                }
            }
        }
        if let Some(snapshot) = &newest {
            self.current = Arc::clone(snapshot);
        }
        newest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_sees_only_newest_snapshot() {
        let mut store = SettingsStore::default();
        let mut sub = store.subscribe();
        assert!(sub.latest().is_none());

        store.update(SettingsUpdate::volume(0.2));
        store.update(SettingsUpdate::audio(true));

        let latest = sub.latest().unwrap();
        assert_eq!(latest.volume, 0.2);
        assert!(latest.audio);
        assert!(sub.latest().is_none());
        assert_eq!(sub.current(), latest);
    }

    #[test]
    fn snapshots_are_immutable() {
        let mut store = SettingsStore::default();
        let before = store.current();
        store.update(SettingsUpdate::vibration(false));
        assert!(before.vibration);
        assert!(!store.current().vibration);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut store = SettingsStore::default();
        let sub = store.subscribe();
        let mut kept = store.subscribe();
        drop(sub);
        store.update(SettingsUpdate::sound("GTA"));
        assert_eq!(store.subscribers.len(), 1);
        assert_eq!(kept.latest().unwrap().sound, "GTA");
    }

    #[test]
    fn closed_store_keeps_last_snapshot() {
        let mut store = SettingsStore::default();
        let mut sub = store.subscribe();
        store.update(SettingsUpdate::volume(0.9));
        drop(store);
        assert_eq!(sub.latest().unwrap().volume, 0.9);
        assert!(sub.latest().is_none());
        assert!(sub.closed);
        assert_eq!(sub.current().volume, 0.9);
    }
}
