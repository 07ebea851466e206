//! Transient notifications
//!
//! Each tool invocation posts a short "toast" for the user. Toasts expire on
//! their own after a fixed time to live; nothing waits for them.

use dashmap::DashMap;
use serde::Serialize;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use uuid::Uuid;

/// Default time a notification stays visible
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Fire-and-forget sink for user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// One visible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
}

/// Active notifications, each removed after the configured TTL
pub struct Notifications {
    active: Arc<DashMap<Uuid, (u64, Notification)>>,
    sequence: AtomicU64,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            active: Arc::new(DashMap::new()),
            sequence: AtomicU64::new(0),
            ttl,
        }
    }

    /// Posts a notification and schedules its removal.
    ///
    /// Outside a tokio runtime the notification is kept until [`Self::dismiss`].
    pub fn push(&self, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
        };
        let id = notification.id;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);

        tracing::info!(%id, message = %notification.message, "Notification");
        self.active.insert(id, (seq, notification));

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let active = Arc::clone(&self.active);
                let ttl = self.ttl;
                runtime.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    active.remove(&id);
                });
            }
            Err(_) => tracing::debug!(%id, "No runtime; notification will not expire"),
        }

        id
    }

    pub fn dismiss(&self, id: &Uuid) -> bool {
        self.active.remove(id).is_some()
    }

    /// Visible notifications, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let mut entries: Vec<(u64, Notification)> = self
            .active
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, n)| n).collect()
    }
}

impl Notifier for Notifications {
    fn notify(&self, message: &str) {
        self.push(message);
    }
}
