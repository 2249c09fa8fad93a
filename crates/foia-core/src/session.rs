//! Notification/list reconciliation session.
//!
//! Owns the two pending trays, the two committed lists, and the selection
//! state. Each intent is one atomic transition from idle back to idle,
//! producing a batch of view commands; a rejected intent produces an error
//! and leaves every collection untouched.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::ViewCommand;
use crate::engine::QueryEngine;
use crate::error::{IndexedList, SessionError};
use crate::event::{
    DiscardEvents, SessionEvent, SessionEventKind, SessionEventOutcome, SessionEventSink,
};
use crate::intent::{Intent, Tab};
use crate::record::{Document, Email};
use crate::tray::NotificationTray;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The reconciliation core behind the two tabbed lists and the tray.
pub struct Session<E> {
    engine: E,

    pending_emails: NotificationTray<Email>,
    pending_attachments: NotificationTray<Document>,
    emails: Vec<Email>,
    documents: Vec<Document>,

    active_tab: Tab,
    active_email: Option<usize>,
    active_document: Option<usize>,

    events: Arc<dyn SessionEventSink>,
}

impl<E: QueryEngine> Session<E> {
    /// Create an idle session around an initialized engine handle.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self::with_event_sink(engine, Arc::new(DiscardEvents))
    }

    /// Create a session that reports each transition to `events`.
    #[must_use]
    pub fn with_event_sink(engine: E, events: Arc<dyn SessionEventSink>) -> Self {
        Self {
            engine,
            pending_emails: NotificationTray::new(),
            pending_attachments: NotificationTray::new(),
            emails: Vec::new(),
            documents: Vec::new(),
            active_tab: Tab::Emails,
            active_email: None,
            active_document: None,
            events,
        }
    }

    // -- startup -------------------------------------------------------------

    /// Run startup reconciliation, once, before any intents.
    ///
    /// Makes Emails the visible tab, then drains the engine backlog into
    /// pending email notifications, preserving event order then per-event
    /// email order. Startup never creates attachment notifications.
    pub fn start(&mut self) -> Result<Vec<ViewCommand>, SessionError> {
        let drained = match self.engine.drain_events() {
            Ok(events) => events,
            Err(err) => {
                self.record(
                    SessionEventKind::Startup,
                    SessionEventOutcome::Error(err.to_string()),
                    "drain failed",
                );
                return Err(err.into());
            }
        };

        let mut commands = vec![ViewCommand::SetActiveTab(self.active_tab)];
        for event in drained {
            for email in event.emails {
                let index = self.pending_emails.push(email);
                commands.push(ViewCommand::AppendEmailNotification(index));
            }
        }

        let pending = self.pending_emails.pending_len();
        debug!(pending, "session started");
        self.record(
            SessionEventKind::Startup,
            SessionEventOutcome::Success,
            format!("{pending} email notifications"),
        );
        Ok(commands)
    }

    // -- intent dispatch -----------------------------------------------------

    /// Process one intent to completion.
    pub fn handle_intent(&mut self, intent: Intent) -> Result<Vec<ViewCommand>, SessionError> {
        let kind = event_kind(&intent);
        let detail = format!("{intent:?}");

        let result = self.dispatch(intent);
        match &result {
            Ok(commands) => {
                debug!(kind = %kind, commands = commands.len(), "intent applied");
                self.record(kind, SessionEventOutcome::Success, detail);
            }
            Err(err) => {
                warn!(kind = %kind, %err, "intent rejected");
                self.record(kind, SessionEventOutcome::Error(err.to_string()), detail);
            }
        }
        result
    }

    fn dispatch(&mut self, intent: Intent) -> Result<Vec<ViewCommand>, SessionError> {
        match intent {
            Intent::TabSelected(tab) => Ok(self.select_tab(tab)),
            Intent::QuerySubmitted { input, year } => self.submit_query(&input, year),
            Intent::DocumentItemSelected(index) => self.select_document(index),
            Intent::EmailItemSelected(index) => self.select_email(index),
            Intent::AttachmentNotificationAcked(index) => self.ack_attachment(index),
            Intent::EmailNotificationAcked(index) => self.ack_email(index),
        }
    }

    // -- transitions ---------------------------------------------------------

    fn select_tab(&mut self, tab: Tab) -> Vec<ViewCommand> {
        self.active_tab = tab;
        vec![ViewCommand::SetActiveTab(tab)]
    }

    fn submit_query(&mut self, input: &str, year: i32) -> Result<Vec<ViewCommand>, SessionError> {
        let result = self.engine.submit_query(input, year)?;

        let mut commands = Vec::with_capacity(1 + result.docs.len());
        let email_index = self.pending_emails.push(result.email);
        commands.push(ViewCommand::AppendEmailNotification(email_index));
        for doc in result.docs {
            let index = self.pending_attachments.push(doc);
            commands.push(ViewCommand::AppendAttachmentNotification(index));
        }
        Ok(commands)
    }

    fn select_document(&mut self, index: usize) -> Result<Vec<ViewCommand>, SessionError> {
        let doc = self
            .documents
            .get(index)
            .ok_or(SessionError::InvalidIndex {
                list: IndexedList::CommittedDocuments,
                index,
                len: self.documents.len(),
            })?
            .clone();
        self.active_document = Some(index);
        Ok(vec![
            ViewCommand::SetActiveDocumentSelection(index),
            ViewCommand::ShowDocumentContents(doc),
        ])
    }

    fn select_email(&mut self, index: usize) -> Result<Vec<ViewCommand>, SessionError> {
        let email = self
            .emails
            .get(index)
            .ok_or(SessionError::InvalidIndex {
                list: IndexedList::CommittedEmails,
                index,
                len: self.emails.len(),
            })?
            .clone();
        self.active_email = Some(index);
        Ok(vec![
            ViewCommand::SetActiveEmailSelection(index),
            ViewCommand::ShowEmailContents(email),
        ])
    }

    fn ack_attachment(&mut self, index: usize) -> Result<Vec<ViewCommand>, SessionError> {
        let doc =
            self.pending_attachments
                .take(index)
                .ok_or(SessionError::InvalidIndex {
                    list: IndexedList::PendingAttachments,
                    index,
                    len: self.pending_attachments.slot_count(),
                })?;

        // Head insertion is the committed ordering contract for documents.
        self.documents.insert(0, doc.clone());
        // A stored selection keeps denoting the same document.
        self.active_document = self.active_document.map(|active| active + 1);
        self.active_tab = Tab::Documents;

        Ok(vec![
            ViewCommand::SetActiveTab(Tab::Documents),
            ViewCommand::RemoveAttachmentNotification(index),
            ViewCommand::InsertDocumentIntoList(doc, 0),
        ])
    }

    fn ack_email(&mut self, index: usize) -> Result<Vec<ViewCommand>, SessionError> {
        let email = self
            .pending_emails
            .take(index)
            .ok_or(SessionError::InvalidIndex {
                list: IndexedList::PendingEmails,
                index,
                len: self.pending_emails.slot_count(),
            })?;

        self.emails.push(email.clone());
        self.active_tab = Tab::Emails;

        Ok(vec![
            ViewCommand::SetActiveTab(Tab::Emails),
            ViewCommand::RemoveEmailNotification(index),
            ViewCommand::AppendEmailToList(email),
        ])
    }

    // -- accessors -----------------------------------------------------------

    #[must_use]
    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    #[must_use]
    pub fn active_email(&self) -> Option<usize> {
        self.active_email
    }

    #[must_use]
    pub fn active_document(&self) -> Option<usize> {
        self.active_document
    }

    /// Committed emails, acknowledgment order.
    #[must_use]
    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    /// Committed documents, most recently acknowledged first.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Pending email notifications with their stable tray indices.
    pub fn pending_emails(&self) -> impl Iterator<Item = (usize, &Email)> {
        self.pending_emails.pending()
    }

    /// Pending attachment notifications with their stable tray indices.
    pub fn pending_attachments(&self) -> impl Iterator<Item = (usize, &Document)> {
        self.pending_attachments.pending()
    }

    #[must_use]
    pub fn pending_email_count(&self) -> usize {
        self.pending_emails.pending_len()
    }

    #[must_use]
    pub fn pending_attachment_count(&self) -> usize {
        self.pending_attachments.pending_len()
    }

    fn record(&self, kind: SessionEventKind, outcome: SessionEventOutcome, detail: impl Into<String>) {
        self.events.record(SessionEvent::new(kind, outcome, detail));
    }
}

fn event_kind(intent: &Intent) -> SessionEventKind {
    match intent {
        Intent::TabSelected(_) => SessionEventKind::TabSelected,
        Intent::QuerySubmitted { .. } => SessionEventKind::QuerySubmitted,
        Intent::DocumentItemSelected(_) => SessionEventKind::DocumentItemSelected,
        Intent::EmailItemSelected(_) => SessionEventKind::EmailItemSelected,
        Intent::AttachmentNotificationAcked(_) => SessionEventKind::AttachmentNotificationAcked,
        Intent::EmailNotificationAcked(_) => SessionEventKind::EmailNotificationAcked,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
