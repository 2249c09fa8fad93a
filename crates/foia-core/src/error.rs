//! Session error taxonomy.

use crate::engine::EngineError;

/// The index-addressed collection an intent referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexedList {
    CommittedEmails,
    CommittedDocuments,
    PendingEmails,
    PendingAttachments,
}

impl std::fmt::Display for IndexedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CommittedEmails => "committed emails",
            Self::CommittedDocuments => "committed documents",
            Self::PendingEmails => "pending email notifications",
            Self::PendingAttachments => "pending attachment notifications",
        };
        f.write_str(s)
    }
}

/// Error produced by session intent handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The intent addressed a position that is out of bounds or already
    /// acknowledged. Session state is left untouched. For pending trays,
    /// `len` is the number of slot indices ever assigned.
    #[error("invalid index {index} into {list} (len {len})")]
    InvalidIndex {
        list: IndexedList,
        index: usize,
        len: usize,
    },

    /// The engine boundary call itself failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
