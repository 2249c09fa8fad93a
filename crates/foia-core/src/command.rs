//! View-update commands emitted by the session core.

use crate::intent::Tab;
use crate::record::{Document, Email};

/// One-way instructions the view adapter applies without replying.
///
/// Notification indices are tray slot indices: an index announced by an
/// append command stays valid until the same index appears in the matching
/// remove command. Selection indices address the committed lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    AppendEmailNotification(usize),
    AppendAttachmentNotification(usize),
    RemoveEmailNotification(usize),
    RemoveAttachmentNotification(usize),
    AppendEmailToList(Email),
    /// Insert a document row at the given position, shifting later rows
    /// down.
    InsertDocumentIntoList(Document, usize),
    SetActiveTab(Tab),
    SetActiveEmailSelection(usize),
    SetActiveDocumentSelection(usize),
    ShowEmailContents(Email),
    ShowDocumentContents(Document),
}
