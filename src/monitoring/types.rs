//! Monitoring event types and configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::util::{MessageId, ProcessId};

/// Configuration for monitoring behavior.
///
/// Controls how events are recorded, filtered, and stored in the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    /// Whether monitoring is enabled
    pub enabled: bool,

    /// Maximum number of events to keep in history
    pub max_history_size: usize,

    /// Minimum severity level to record (events below this are filtered)
    pub severity_filter: EventSeverity,

    /// Interval for snapshot generation (if using background snapshots)
    #[serde(with = "crate::util::duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Snapshot of monitoring state at a point in time.
///
/// Provides queryable access to monitoring counters and recent event history.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    /// Timestamp when snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded
    pub total_events: u64,

    /// Number of trace-level events
    pub trace_count: u64,

    /// Number of debug-level events
    pub debug_count: u64,

    /// Number of info-level events
    pub info_count: u64,

    /// Number of warning-level events
    pub warning_count: u64,

    /// Number of error-level events
    pub error_count: u64,

    /// Number of critical-level events
    pub critical_count: u64,

    /// Recent events (up to max_history_size)
    pub recent_events: Vec<E>,
}

/// Events emitted by the Dispatcher, SendCoordinator and SubscriptionRegistry
/// at the transitions named in §6 EXTERNAL INTERFACES Monitoring.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentEvent {
    /// Timestamp when event occurred (§3.2 chrono DateTime<Utc>)
    pub timestamp: DateTime<Utc>,

    /// Specific event type
    pub event_kind: ComponentEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for ComponentEvent {
    const EVENT_TYPE: &'static str = "component";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            ComponentEventKind::DispatchStarted { .. } => EventSeverity::Debug,
            ComponentEventKind::DispatchAccepted { .. } => EventSeverity::Info,
            ComponentEventKind::DispatchRejectedByAll { .. } => EventSeverity::Warning,
            ComponentEventKind::SendReserved { .. } => EventSeverity::Debug,
            ComponentEventKind::SendCleared { .. } => EventSeverity::Debug,
            ComponentEventKind::SendCommitted { .. } => EventSeverity::Info,
            ComponentEventKind::SendSentinel { .. } => EventSeverity::Warning,
            ComponentEventKind::ProcessSubscribed { .. } => EventSeverity::Info,
            ComponentEventKind::ProcessUnsubscribed { .. } => EventSeverity::Info,
            ComponentEventKind::TransportError { .. } => EventSeverity::Error,
        }
    }
}

/// Specific types of component events, one per §6 Logging transition.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ComponentEventKind {
    /// A dispatch cycle began for an inbound message.
    DispatchStarted {
        /// The message being dispatched.
        message_id: MessageId,
    },
    /// A dispatch cycle ended with a process accepting the message.
    DispatchAccepted {
        /// The message that was accepted.
        message_id: MessageId,
        /// The process that accepted it.
        process_id: ProcessId,
    },
    /// A dispatch cycle ended with every subscribed process rejecting.
    DispatchRejectedByAll {
        /// The message that was rejected by all.
        message_id: MessageId,
    },
    /// A process reserved an id for a send.
    SendReserved {
        /// The reserved id.
        message_id: MessageId,
        /// The requesting process.
        process_id: ProcessId,
    },
    /// Clearance to send was granted for a reserved id.
    SendCleared {
        /// The cleared id.
        message_id: MessageId,
    },
    /// A real send was committed.
    SendCommitted {
        /// The sent id.
        message_id: MessageId,
    },
    /// A sentinel (invalid) send was transmitted.
    SendSentinel {
        /// The consumed id.
        message_id: MessageId,
    },
    /// A process subscribed to the component.
    ProcessSubscribed {
        /// The subscribing process.
        process_id: ProcessId,
    },
    /// A process unsubscribed from the component.
    ProcessUnsubscribed {
        /// The unsubscribing process.
        process_id: ProcessId,
    },
    /// The transport reported a recv or send failure.
    TransportError {
        /// The transport's error message.
        message: String,
    },
}
