//! Session audit events.
//!
//! Every processed intent (and the startup drain) emits one event that can
//! be stored for later inspection.

use chrono::{DateTime, Utc};

/// The kind of session activity that generated an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    Startup,
    TabSelected,
    QuerySubmitted,
    DocumentItemSelected,
    EmailItemSelected,
    AttachmentNotificationAcked,
    EmailNotificationAcked,
}

impl std::fmt::Display for SessionEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Startup => "startup",
            Self::TabSelected => "tab_selected",
            Self::QuerySubmitted => "query_submitted",
            Self::DocumentItemSelected => "document_item_selected",
            Self::EmailItemSelected => "email_item_selected",
            Self::AttachmentNotificationAcked => "attachment_notification_acked",
            Self::EmailNotificationAcked => "email_notification_acked",
        };
        f.write_str(s)
    }
}

/// Outcome of one processed intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEventOutcome {
    Success,
    Error(String),
}

impl std::fmt::Display for SessionEventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// An audit record for one session transition.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: SessionEventKind,
    pub outcome: SessionEventOutcome,
    pub detail: String,
}

impl SessionEvent {
    pub fn new(
        kind: SessionEventKind,
        outcome: SessionEventOutcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            outcome,
            detail: detail.into(),
        }
    }
}

/// Receives session events. Implementations may log, store, or discard.
pub trait SessionEventSink: Send + Sync {
    fn record(&self, event: SessionEvent);
}

/// Sink that drops every event.
pub struct DiscardEvents;

impl SessionEventSink for DiscardEvents {
    fn record(&self, _event: SessionEvent) {}
}

/// In-memory sink for tests and debugging.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: std::sync::Mutex<Vec<SessionEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self) -> usize {
        match self.events.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl SessionEventSink for InMemoryEventSink {
    fn record(&self, event: SessionEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_names_are_stable() {
        let kinds = [
            SessionEventKind::Startup,
            SessionEventKind::TabSelected,
            SessionEventKind::QuerySubmitted,
            SessionEventKind::DocumentItemSelected,
            SessionEventKind::EmailItemSelected,
            SessionEventKind::AttachmentNotificationAcked,
            SessionEventKind::EmailNotificationAcked,
        ];
        let names: Vec<String> = kinds.iter().map(ToString::to_string).collect();
        assert_eq!(
            names.join("|"),
            "startup|tab_selected|query_submitted|document_item_selected|email_item_selected|attachment_notification_acked|email_notification_acked"
        );
    }

    #[test]
    fn in_memory_sink_records_in_order() {
        let sink = InMemoryEventSink::new();
        sink.record(SessionEvent::new(
            SessionEventKind::Startup,
            SessionEventOutcome::Success,
            "2 notifications",
        ));
        sink.record(SessionEvent::new(
            SessionEventKind::TabSelected,
            SessionEventOutcome::Success,
            "Documents",
        ));
        assert_eq!(sink.count(), 2);
        let events = sink.events();
        assert_eq!(events[0].kind, SessionEventKind::Startup);
        assert_eq!(events[1].kind, SessionEventKind::TabSelected);
    }

    #[test]
    fn error_outcome_displays_message() {
        let outcome = SessionEventOutcome::Error("invalid index".to_owned());
        assert_eq!(outcome.to_string(), "error: invalid index");
    }
}
