#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in artsync
//!
//! Pipeline tasks report user-facing progress through an event channel; the
//! CLI is the only component that prints. Events are fire-and-forget: a task
//! never blocks on (or fails because of) a slow or absent consumer.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Events emitted by the synchronization pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    // Discovery
    ProjectsDiscovered {
        projects: Vec<String>,
    },

    // Validation
    PackageValidated {
        project: String,
    },
    PackageInvalid {
        project: String,
        reason: String,
    },

    // Update-need assessment
    ClusterCurrent {
        project: String,
        cluster: String,
    },
    ClusterStale {
        project: String,
        cluster: String,
    },

    // Download
    DownloadStarted {
        project: String,
        url: String,
    },
    DownloadCompleted {
        project: String,
        bytes: u64,
    },
    DownloadFailed {
        project: String,
        url: String,
        reason: String,
    },

    // Upload
    UploadStarted {
        project: String,
        cluster: String,
    },
    UploadCompleted {
        project: String,
        cluster: String,
    },
    UploadFailed {
        project: String,
        cluster: String,
        reason: String,
    },

    // General
    OperationStarted {
        operation: String,
    },
    OperationCompleted {
        operation: String,
        success: bool,
    },
    Warning {
        message: String,
    },
    DebugLog {
        message: String,
    },
}

/// Type alias for event sender
pub type EventSender = UnboundedSender<Event>;

/// Type alias for event receiver
pub type EventReceiver = UnboundedReceiver<Event>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Extension trait for sending events without caring whether anyone listens
pub trait EventSenderExt {
    fn emit(&self, event: Event);
}

impl EventSenderExt for EventSender {
    fn emit(&self, event: Event) {
        // Receiver may already be gone during shutdown; that is fine.
        let _ = self.send(event);
    }
}

/// Types that can emit events when a sender is attached
pub trait EventEmitter {
    fn event_sender(&self) -> Option<&EventSender>;

    fn emit_event(&self, event: Event) {
        if let Some(tx) = self.event_sender() {
            tx.emit(event);
        }
    }
}
