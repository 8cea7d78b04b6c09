//! Transient user-facing messages with timed dismissal.
//!
//! Every posted notification owns one timer task: after the display
//! duration it is flagged `exiting`, after the exit duration it is removed.
//! [`Notifier::dismiss`] removes it at once and aborts the timer.
//!
//! Timers run on the Tokio runtime the notifier was created in, or the one
//! current at posting time. Without either, notifications are still queued
//! but stay until dismissed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pocketshop_core::NotificationId;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::ShopConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub exiting: bool,
}

#[derive(Default)]
struct Queue {
    items: Vec<Notification>,
    timers: HashMap<NotificationId, JoinHandle<()>>,
}

impl Queue {
    fn mark_exiting(&mut self, id: NotificationId) {
        if let Some(n) = self.items.iter_mut().find(|n| n.id == id) {
            n.exiting = true;
        }
    }

    fn remove(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }
}

#[derive(Clone)]
pub struct Notifier {
    queue: Arc<Mutex<Queue>>,
    display: Duration,
    exit: Duration,
    runtime: Option<Handle>,
}

fn lock(queue: &Mutex<Queue>) -> MutexGuard<'_, Queue> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Notifier {
    pub fn new(display: Duration, exit: Duration) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Queue::default())),
            display,
            exit,
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn from_config(config: &ShopConfig) -> Self {
        Self::new(config.toast_display, config.toast_exit)
    }

    /// Queue a message and start its timer.
    pub fn post(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let id = NotificationId::new();
        let message = message.into();
        debug!(%id, kind = kind.as_str(), %message, "notification posted");

        let runtime = self.runtime.clone().or_else(|| Handle::try_current().ok());
        let mut queue = lock(&self.queue);
        queue.items.push(Notification {
            id,
            message,
            kind,
            exiting: false,
        });
        match runtime {
            Some(runtime) => {
                let timer = runtime.spawn(expire(Arc::clone(&self.queue), id, self.display, self.exit));
                queue.timers.insert(id, timer);
            }
            None => warn!(%id, "no tokio runtime, notification kept until dismissed"),
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.post(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.post(message, NotificationKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.post(message, NotificationKind::Info)
    }

    /// Remove immediately, skipping the exit phase. Returns whether the
    /// notification was still queued.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut queue = lock(&self.queue);
        if let Some(timer) = queue.timers.remove(&id) {
            timer.abort();
        }
        queue.remove(id)
    }

    /// Current queue in posting order.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.queue).items.clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.queue).items.is_empty()
    }
}

async fn expire(queue: Arc<Mutex<Queue>>, id: NotificationId, display: Duration, exit: Duration) {
    tokio::time::sleep(display).await;
    lock(&queue).mark_exiting(id);

    tokio::time::sleep(exit).await;
    let mut queue = lock(&queue);
    queue.remove(id);
    queue.timers.remove(&id);
}
