//! Terminal view adapter.
//!
//! Applies the session's view commands to a view-side mirror (lists, tray,
//! selections, detail panes), decodes key presses into intents, and renders
//! the whole screen as plain text lines. Commands are applied without
//! replying; every state change the session cares about travels back as an
//! intent.

use foia_core::command::ViewCommand;
use foia_core::intent::{Intent, Tab};
use foia_core::record::{Document, Email};

use crate::input::{parse_query_line, Key};

// ---------------------------------------------------------------------------
// View-side rows and tray entries
// ---------------------------------------------------------------------------

/// Which pending tray a notification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Email,
    Attachment,
}

/// A tray entry, keyed by the stable index the session announced.
///
/// Removal matches on `(kind, index)`; entries are never renumbered, so an
/// index stays addressable until its own remove command arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayEntry {
    pub kind: NotificationKind,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EmailRow {
    email: Email,
    unread: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DocumentRow {
    doc: Document,
    unread: bool,
}

/// Input focus areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    List,
    Tray,
    Query,
}

/// Result of one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed by the view itself (focus change, cursor move, typing).
    None,
    /// Decoded into an intent for the session.
    Intent(Intent),
    /// Quit requested.
    Quit,
}

// ---------------------------------------------------------------------------
// BrowserApp
// ---------------------------------------------------------------------------

/// The view-side state of the browser screen.
#[derive(Debug, Default)]
pub struct BrowserApp {
    active_tab: Option<Tab>,

    emails: Vec<EmailRow>,
    documents: Vec<DocumentRow>,
    tray: Vec<TrayEntry>,

    email_selection: Option<usize>,
    document_selection: Option<usize>,
    email_detail: Option<Email>,
    document_detail: Option<Document>,

    focus: Focus,
    tray_cursor: usize,
    query_line: String,
    status: String,
}

impl BrowserApp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- command application -------------------------------------------------

    /// Apply one batch of view commands, in order.
    pub fn apply(&mut self, commands: Vec<ViewCommand>) {
        for command in commands {
            self.apply_one(command);
        }
    }

    fn apply_one(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::AppendEmailNotification(index) => self.tray.push(TrayEntry {
                kind: NotificationKind::Email,
                index,
            }),
            ViewCommand::AppendAttachmentNotification(index) => self.tray.push(TrayEntry {
                kind: NotificationKind::Attachment,
                index,
            }),
            ViewCommand::RemoveEmailNotification(index) => {
                self.remove_tray_entry(NotificationKind::Email, index);
            }
            ViewCommand::RemoveAttachmentNotification(index) => {
                self.remove_tray_entry(NotificationKind::Attachment, index);
            }
            ViewCommand::AppendEmailToList(email) => self.emails.push(EmailRow {
                email,
                unread: true,
            }),
            ViewCommand::InsertDocumentIntoList(doc, position) => {
                let position = position.min(self.documents.len());
                self.documents.insert(position, DocumentRow { doc, unread: true });
                if let Some(selected) = self.document_selection {
                    if selected >= position {
                        self.document_selection = Some(selected + 1);
                    }
                }
            }
            ViewCommand::SetActiveTab(tab) => self.active_tab = Some(tab),
            ViewCommand::SetActiveEmailSelection(index) => {
                self.email_selection = Some(index);
                if let Some(row) = self.emails.get_mut(index) {
                    row.unread = false;
                }
            }
            ViewCommand::SetActiveDocumentSelection(index) => {
                self.document_selection = Some(index);
                if let Some(row) = self.documents.get_mut(index) {
                    row.unread = false;
                }
            }
            ViewCommand::ShowEmailContents(email) => self.email_detail = Some(email),
            ViewCommand::ShowDocumentContents(doc) => self.document_detail = Some(doc),
        }
    }

    fn remove_tray_entry(&mut self, kind: NotificationKind, index: usize) {
        self.tray
            .retain(|entry| !(entry.kind == kind && entry.index == index));
        if self.tray.is_empty() {
            self.tray_cursor = 0;
            if self.focus == Focus::Tray {
                self.focus = Focus::List;
            }
        } else {
            self.tray_cursor = self.tray_cursor.min(self.tray.len() - 1);
        }
    }

    /// Show a transient message on the status line (e.g. a rejected intent).
    pub fn set_status(&mut self, message: &str) {
        self.status = message.to_owned();
    }

    // -- key handling --------------------------------------------------------

    /// Route one key press through the focused input area.
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        self.status.clear();
        match self.focus {
            Focus::List => self.handle_browse_key(key),
            Focus::Tray => self.handle_tray_key(key),
            Focus::Query => self.handle_query_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Char('q') => KeyOutcome::Quit,
            Key::Char('1') => KeyOutcome::Intent(Intent::TabSelected(Tab::Emails)),
            Key::Char('2') => KeyOutcome::Intent(Intent::TabSelected(Tab::Documents)),
            Key::Tab => KeyOutcome::Intent(Intent::TabSelected(match self.visible_tab() {
                Tab::Emails => Tab::Documents,
                Tab::Documents => Tab::Emails,
            })),
            Key::Char('j') | Key::Down => self.move_selection(1),
            Key::Char('k') | Key::Up => self.move_selection(-1),
            Key::Enter => self.reselect(),
            Key::Char('n') => {
                if self.tray.is_empty() {
                    self.status = "tray is empty".to_owned();
                } else {
                    self.focus = Focus::Tray;
                    self.tray_cursor = 0;
                }
                KeyOutcome::None
            }
            Key::Char('/') => {
                self.focus = Focus::Query;
                self.query_line.clear();
                KeyOutcome::None
            }
            _ => KeyOutcome::None,
        }
    }

    fn move_selection(&mut self, delta: isize) -> KeyOutcome {
        let (len, current) = match self.visible_tab() {
            Tab::Emails => (self.emails.len(), self.email_selection),
            Tab::Documents => (self.documents.len(), self.document_selection),
        };
        if len == 0 {
            return KeyOutcome::None;
        }
        let next = match current {
            None => 0,
            Some(index) => index.saturating_add_signed(delta).min(len - 1),
        };
        KeyOutcome::Intent(self.selection_intent(next))
    }

    fn reselect(&mut self) -> KeyOutcome {
        let (len, current) = match self.visible_tab() {
            Tab::Emails => (self.emails.len(), self.email_selection),
            Tab::Documents => (self.documents.len(), self.document_selection),
        };
        if len == 0 {
            return KeyOutcome::None;
        }
        KeyOutcome::Intent(self.selection_intent(current.unwrap_or(0)))
    }

    fn selection_intent(&self, index: usize) -> Intent {
        match self.visible_tab() {
            Tab::Emails => Intent::EmailItemSelected(index),
            Tab::Documents => Intent::DocumentItemSelected(index),
        }
    }

    fn handle_tray_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Escape => {
                self.focus = Focus::List;
                KeyOutcome::None
            }
            Key::Char('j') | Key::Down => {
                if !self.tray.is_empty() {
                    self.tray_cursor = (self.tray_cursor + 1).min(self.tray.len() - 1);
                }
                KeyOutcome::None
            }
            Key::Char('k') | Key::Up => {
                self.tray_cursor = self.tray_cursor.saturating_sub(1);
                KeyOutcome::None
            }
            Key::Enter => match self.tray.get(self.tray_cursor) {
                Some(entry) => {
                    let intent = match entry.kind {
                        NotificationKind::Email => Intent::EmailNotificationAcked(entry.index),
                        NotificationKind::Attachment => {
                            Intent::AttachmentNotificationAcked(entry.index)
                        }
                    };
                    self.focus = Focus::List;
                    KeyOutcome::Intent(intent)
                }
                None => {
                    self.focus = Focus::List;
                    KeyOutcome::None
                }
            },
            _ => KeyOutcome::None,
        }
    }

    fn handle_query_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Escape => {
                self.focus = Focus::List;
                self.query_line.clear();
                KeyOutcome::None
            }
            Key::Backspace => {
                self.query_line.pop();
                KeyOutcome::None
            }
            Key::Enter => match parse_query_line(&self.query_line) {
                Some((input, year)) => {
                    self.focus = Focus::List;
                    self.query_line.clear();
                    KeyOutcome::Intent(Intent::QuerySubmitted { input, year })
                }
                None => {
                    self.status = "query needs text and a trailing year".to_owned();
                    KeyOutcome::None
                }
            },
            Key::Char(c) => {
                self.query_line.push(c);
                KeyOutcome::None
            }
            _ => KeyOutcome::None,
        }
    }

    // -- accessors -----------------------------------------------------------

    /// The tab currently shown. Defaults to Emails until the session's first
    /// `SetActiveTab` arrives.
    #[must_use]
    pub fn visible_tab(&self) -> Tab {
        self.active_tab.unwrap_or(Tab::Emails)
    }

    /// Tray entries in arrival order.
    #[must_use]
    pub fn tray_entries(&self) -> &[TrayEntry] {
        &self.tray
    }

    #[must_use]
    pub fn email_row_count(&self) -> usize {
        self.emails.len()
    }

    #[must_use]
    pub fn document_row_count(&self) -> usize {
        self.documents.len()
    }

    // -- rendering -----------------------------------------------------------

    /// Render the whole screen as plain text lines.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(self.header_line());
        lines.push(self.tray_line());
        lines.push(String::new());
        match self.visible_tab() {
            Tab::Emails => self.render_email_list(&mut lines),
            Tab::Documents => self.render_document_list(&mut lines),
        }
        lines.push(String::new());
        self.render_detail(&mut lines);
        lines.push(String::new());
        lines.push(self.status_line());
        lines
    }

    fn header_line(&self) -> String {
        let (emails, documents) = match self.visible_tab() {
            Tab::Emails => ("[Emails]", " Documents "),
            Tab::Documents => (" Emails ", "[Documents]"),
        };
        format!(" FOIA records   {emails} {documents}")
    }

    fn tray_line(&self) -> String {
        if self.tray.is_empty() {
            return " tray: empty".to_owned();
        }
        let mut parts = Vec::with_capacity(self.tray.len());
        for (position, entry) in self.tray.iter().enumerate() {
            let tag = match entry.kind {
                NotificationKind::Email => "mail",
                NotificationKind::Attachment => "doc",
            };
            let cursor = if self.focus == Focus::Tray && position == self.tray_cursor {
                ">"
            } else {
                ""
            };
            parts.push(format!("{cursor}[{tag}#{}]", entry.index));
        }
        format!(" tray ({}): {}", self.tray.len(), parts.join(" "))
    }

    fn render_email_list(&self, lines: &mut Vec<String>) {
        if self.emails.is_empty() {
            lines.push(" (no emails yet)".to_owned());
            return;
        }
        for (index, row) in self.emails.iter().enumerate() {
            lines.push(list_row(
                self.email_selection == Some(index),
                row.unread,
                &row.email.subject,
            ));
        }
    }

    fn render_document_list(&self, lines: &mut Vec<String>) {
        if self.documents.is_empty() {
            lines.push(" (no documents yet)".to_owned());
            return;
        }
        for (index, row) in self.documents.iter().enumerate() {
            lines.push(list_row(
                self.document_selection == Some(index),
                row.unread,
                &row.doc.header_line(),
            ));
        }
    }

    fn render_detail(&self, lines: &mut Vec<String>) {
        match self.visible_tab() {
            Tab::Emails => match &self.email_detail {
                Some(email) => {
                    lines.push(format!(" {}", email.subject));
                    lines.push(String::new());
                    lines.extend(email.body.lines().map(|line| format!(" {line}")));
                }
                None => lines.push(" (nothing selected)".to_owned()),
            },
            Tab::Documents => match &self.document_detail {
                Some(doc) => {
                    lines.push(format!(" {}", doc.header_line()));
                    lines.push(String::new());
                    lines.extend(doc.body_redacted.lines().map(|line| format!(" {line}")));
                }
                None => lines.push(" (nothing selected)".to_owned()),
            },
        }
    }

    fn status_line(&self) -> String {
        if !self.status.is_empty() {
            return format!(" {}", self.status);
        }
        if self.focus == Focus::Query {
            return format!(" query> {}_", self.query_line);
        }
        match self.focus {
            Focus::List => " j/k select  tab switch  n tray  / query  q quit".to_owned(),
            Focus::Tray => " j/k move  enter acknowledge  esc back".to_owned(),
            Focus::Query => String::new(),
        }
    }
}

fn list_row(selected: bool, unread: bool, text: &str) -> String {
    let cursor = if selected { ">" } else { " " };
    let marker = if unread { "*" } else { " " };
    format!("{cursor}{marker} {text}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn email(tag: &str) -> Email {
        Email::new(tag, "body")
    }

    fn doc(tag: &str) -> Document {
        Document::new(tag, "1983-01-01", "body")
    }

    fn app_with_tray() -> BrowserApp {
        let mut app = BrowserApp::new();
        app.apply(vec![
            ViewCommand::SetActiveTab(Tab::Emails),
            ViewCommand::AppendEmailNotification(0),
            ViewCommand::AppendAttachmentNotification(0),
            ViewCommand::AppendEmailNotification(1),
        ]);
        app
    }

    // -- command application -------------------------------------------------

    #[test]
    fn tray_entries_are_removed_by_stable_key_not_position() {
        let mut app = app_with_tray();
        app.apply(vec![ViewCommand::RemoveEmailNotification(0)]);
        assert_eq!(
            app.tray_entries(),
            &[
                TrayEntry {
                    kind: NotificationKind::Attachment,
                    index: 0
                },
                TrayEntry {
                    kind: NotificationKind::Email,
                    index: 1
                },
            ]
        );
        // The surviving email entry is still addressable under its
        // original index.
        app.apply(vec![ViewCommand::RemoveEmailNotification(1)]);
        assert_eq!(
            app.tray_entries(),
            &[TrayEntry {
                kind: NotificationKind::Attachment,
                index: 0
            }]
        );
    }

    #[test]
    fn committed_rows_start_unread_and_clear_on_selection() {
        let mut app = BrowserApp::new();
        app.apply(vec![
            ViewCommand::SetActiveTab(Tab::Emails),
            ViewCommand::AppendEmailToList(email("hello")),
        ]);
        let lines = app.render();
        assert!(lines.iter().any(|line| line.contains("* hello")));

        app.apply(vec![
            ViewCommand::SetActiveEmailSelection(0),
            ViewCommand::ShowEmailContents(email("hello")),
        ]);
        let lines = app.render();
        assert!(lines.iter().any(|line| line.starts_with(">  hello")));
    }

    #[test]
    fn head_insertion_shifts_the_stored_document_selection() {
        let mut app = BrowserApp::new();
        app.apply(vec![
            ViewCommand::SetActiveTab(Tab::Documents),
            ViewCommand::InsertDocumentIntoList(doc("first"), 0),
            ViewCommand::SetActiveDocumentSelection(0),
            ViewCommand::InsertDocumentIntoList(doc("second"), 0),
        ]);
        let lines = app.render();
        // "second" sits at the head, unread; "first" keeps the cursor.
        assert!(lines.iter().any(|line| line.contains("* second")));
        assert!(lines.iter().any(|line| line.starts_with(">  first")));
    }

    // -- key handling --------------------------------------------------------

    #[test]
    fn tab_keys_emit_tab_selection_intents() {
        let mut app = BrowserApp::new();
        assert_eq!(
            app.handle_key(Key::Char('2')),
            KeyOutcome::Intent(Intent::TabSelected(Tab::Documents))
        );
        assert_eq!(
            app.handle_key(Key::Tab),
            KeyOutcome::Intent(Intent::TabSelected(Tab::Documents))
        );
        app.apply(vec![ViewCommand::SetActiveTab(Tab::Documents)]);
        assert_eq!(
            app.handle_key(Key::Tab),
            KeyOutcome::Intent(Intent::TabSelected(Tab::Emails))
        );
    }

    #[test]
    fn list_navigation_emits_selection_intents_within_bounds() {
        let mut app = BrowserApp::new();
        assert_eq!(app.handle_key(Key::Char('j')), KeyOutcome::None);

        app.apply(vec![
            ViewCommand::AppendEmailToList(email("a")),
            ViewCommand::AppendEmailToList(email("b")),
        ]);
        assert_eq!(
            app.handle_key(Key::Char('j')),
            KeyOutcome::Intent(Intent::EmailItemSelected(0))
        );
        app.apply(vec![ViewCommand::SetActiveEmailSelection(0)]);
        assert_eq!(
            app.handle_key(Key::Char('j')),
            KeyOutcome::Intent(Intent::EmailItemSelected(1))
        );
        app.apply(vec![ViewCommand::SetActiveEmailSelection(1)]);
        // Clamped at the tail.
        assert_eq!(
            app.handle_key(Key::Char('j')),
            KeyOutcome::Intent(Intent::EmailItemSelected(1))
        );
        assert_eq!(
            app.handle_key(Key::Char('k')),
            KeyOutcome::Intent(Intent::EmailItemSelected(0))
        );
    }

    #[test]
    fn tray_focus_acks_the_entry_under_the_cursor() {
        let mut app = app_with_tray();
        assert_eq!(app.handle_key(Key::Char('n')), KeyOutcome::None);
        assert_eq!(app.handle_key(Key::Char('j')), KeyOutcome::None);
        assert_eq!(
            app.handle_key(Key::Enter),
            KeyOutcome::Intent(Intent::AttachmentNotificationAcked(0))
        );
    }

    #[test]
    fn tray_focus_on_empty_tray_is_refused() {
        let mut app = BrowserApp::new();
        assert_eq!(app.handle_key(Key::Char('n')), KeyOutcome::None);
        assert!(app.render().iter().any(|line| line.contains("tray is empty")));
    }

    #[test]
    fn query_mode_collects_text_and_submits_on_enter() {
        let mut app = BrowserApp::new();
        assert_eq!(app.handle_key(Key::Char('/')), KeyOutcome::None);
        for c in "memo 1983".chars() {
            assert_eq!(app.handle_key(Key::Char(c)), KeyOutcome::None);
        }
        assert_eq!(
            app.handle_key(Key::Enter),
            KeyOutcome::Intent(Intent::QuerySubmitted {
                input: "memo".to_owned(),
                year: 1983,
            })
        );
    }

    #[test]
    fn query_mode_rejects_a_line_without_a_year() {
        let mut app = BrowserApp::new();
        app.handle_key(Key::Char('/'));
        for c in "memo".chars() {
            app.handle_key(Key::Char(c));
        }
        assert_eq!(app.handle_key(Key::Enter), KeyOutcome::None);
        assert!(app
            .render()
            .iter()
            .any(|line| line.contains("trailing year")));
    }

    #[test]
    fn q_quits_only_outside_query_mode() {
        let mut app = BrowserApp::new();
        assert_eq!(app.handle_key(Key::Char('q')), KeyOutcome::Quit);
        app.handle_key(Key::Char('/'));
        assert_eq!(app.handle_key(Key::Char('q')), KeyOutcome::None);
    }

    // -- rendering -----------------------------------------------------------

    #[test]
    fn render_marks_the_active_tab() {
        let mut app = BrowserApp::new();
        app.apply(vec![ViewCommand::SetActiveTab(Tab::Documents)]);
        let lines = app.render();
        assert!(lines[0].contains("[Documents]"));
        assert!(!lines[0].contains("[Emails]"));
    }

    #[test]
    fn render_shows_detail_for_the_visible_tab_only() {
        let mut app = BrowserApp::new();
        app.apply(vec![
            ViewCommand::SetActiveTab(Tab::Emails),
            ViewCommand::AppendEmailToList(email("covering letter")),
            ViewCommand::SetActiveEmailSelection(0),
            ViewCommand::ShowEmailContents(Email::new("covering letter", "line one\nline two")),
        ]);
        let lines = app.render();
        assert!(lines.iter().any(|line| line.contains("line two")));

        app.apply(vec![ViewCommand::SetActiveTab(Tab::Documents)]);
        let lines = app.render();
        assert!(lines.iter().any(|line| line.contains("(nothing selected)")));
    }

    #[test]
    fn render_tray_line_counts_and_keys() {
        let app = app_with_tray();
        let lines = app.render();
        assert_eq!(lines[1], " tray (3): [mail#0] [doc#0] [mail#1]");
    }
}
