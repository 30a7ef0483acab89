//! Event logging capability.
//!
//! Share components report what happened (validation outcomes, submissions)
//! through the narrow [`EventLogging`] trait and never through a concrete
//! analytics type. [`AppEvents`], the in-process app events facility,
//! implements the capability; hosts can plug in their own.

use crate::config::ShareConfig;
use crate::types::{Metadata, UniqueId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Log a named event, with optional parameters and value to sum,
/// attributable to an application.
pub trait EventLogging: Send + Sync {
    /// Log an event.
    ///
    /// `app_id` overrides the logger's own application id when given.
    fn log_event(
        &self,
        name: &str,
        parameters: Option<&Metadata>,
        value_to_sum: Option<f64>,
        app_id: Option<&str>,
    );

    /// Log an event with no parameters or value.
    fn log(&self, name: &str) {
        self.log_event(name, None, None, None);
    }

    /// Push buffered events downstream. No-op by default.
    ///
    /// Returns nothing: a logger that needs to hand events back exposes
    /// that separately (see [`AppEvents::drain`]).
    fn flush(&self) {}
}

/// Unique event identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub UniqueId);

impl EventId {
    pub fn new() -> Self {
        Self(UniqueId::new())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt_{}", self.0)
    }
}

/// An event recorded by [`AppEvents`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEvent {
    pub id: EventId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub parameters: Metadata,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_to_sum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    pub timestamp: DateTime<Utc>,
}

/// Event receiver (broadcast channel).
pub type AppEventReceiver = broadcast::Receiver<AppEvent>;

/// In-process app events facility.
///
/// Keeps the most recent events in a bounded buffer and broadcasts each one
/// to live subscribers. Logging never waits on subscribers; slow receivers
/// observe `RecvError::Lagged`.
pub struct AppEvents {
    sender: broadcast::Sender<AppEvent>,
    recent: Mutex<VecDeque<AppEvent>>,
    max_recent: usize,
    app_id: Option<String>,
}

impl AppEvents {
    /// Create a facility with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            recent: Mutex::new(VecDeque::new()),
            max_recent: 100,
            app_id: None,
        }
    }

    /// Create a facility attributed to the configured application.
    pub fn from_config(config: &ShareConfig) -> Self {
        let mut events = Self::new(config.event_capacity);
        events.app_id = config.app_id.clone();
        events
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> AppEventReceiver {
        self.sender.subscribe()
    }

    /// Most recent events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<AppEvent> {
        self.buffer().iter().rev().take(limit).cloned().collect()
    }

    /// Remove and return every buffered event, oldest first.
    pub fn drain(&self) -> Vec<AppEvent> {
        self.buffer().drain(..).collect()
    }

    fn buffer(&self) -> MutexGuard<'_, VecDeque<AppEvent>> {
        self.recent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, event: AppEvent) {
        {
            let mut recent = self.buffer();
            recent.push_back(event.clone());
            while recent.len() > self.max_recent {
                recent.pop_front();
            }
        }

        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}

impl Default for AppEvents {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventLogging for AppEvents {
    fn log_event(
        &self,
        name: &str,
        parameters: Option<&Metadata>,
        value_to_sum: Option<f64>,
        app_id: Option<&str>,
    ) {
        if name.trim().is_empty() {
            debug!("dropping app event with an empty name");
            return;
        }

        let event = AppEvent {
            id: EventId::new(),
            name: name.to_string(),
            parameters: parameters.cloned().unwrap_or_default(),
            value_to_sum,
            app_id: app_id.map(str::to_string).or_else(|| self.app_id.clone()),
            timestamp: Utc::now(),
        };
        trace!(event = %event.name, id = %event.id, "logged app event");
        self.record(event);
    }

    /// There is no upload target, so the buffer is emptied and its events
    /// discarded. Subscribers already saw them at log time. Call
    /// [`AppEvents::drain`] to take the events instead.
    fn flush(&self) {
        let flushed = self.drain();
        debug!(count = flushed.len(), "flushed app events");
    }
}
