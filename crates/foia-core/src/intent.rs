//! UI intents delivered to the session core.

/// The two sidebar tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Emails,
    Documents,
}

impl Tab {
    /// Display label used in headers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Emails => "Emails",
            Self::Documents => "Documents",
        }
    }
}

/// A discrete user action, decoded by the view adapter and processed by the
/// session one at a time, each to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Switch the visible tab. No list mutation.
    TabSelected(Tab),
    /// Submit a query to the engine.
    QuerySubmitted { input: String, year: i32 },
    /// Select a row in the committed document list.
    DocumentItemSelected(usize),
    /// Select a row in the committed email list.
    EmailItemSelected(usize),
    /// Acknowledge the pending attachment notification at a tray index.
    AttachmentNotificationAcked(usize),
    /// Acknowledge the pending email notification at a tray index.
    EmailNotificationAcked(usize),
}
