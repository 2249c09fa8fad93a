//! Engine boundary: the query-resolution collaborator behind a trait.
//!
//! The engine's corpus, matching, and redaction internals are opaque. The
//! session only sees the two operations below plus the record types they
//! hand over. Construction (including any asynchronous bootstrap) happens
//! before the session starts; from the session's perspective both
//! operations are synchronous.

use serde::{Deserialize, Serialize};

use crate::record::{Document, Email};

/// Normalized error for engine boundary calls.
///
/// Surfaced to the caller as-is; the session never retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("drain events: {0}")]
    Drain(String),
    #[error("submit query: {0}")]
    Query(String),
}

/// An engine-originated event carrying newly released emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub emails: Vec<Email>,
}

/// Result of one query submission: a cover email plus the released
/// documents, in the order the engine returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub email: Email,
    pub docs: Vec<Document>,
}

/// The raw corpus seed handed to an engine at construction: a sequence of
/// opaque text blocks. This side of the boundary passes it through
/// unmodified and never parses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSeed {
    pub blocks: Vec<String>,
}

impl CorpusSeed {
    #[must_use]
    pub fn new(blocks: Vec<String>) -> Self {
        Self { blocks }
    }
}

/// The query engine interface.
pub trait QueryEngine {
    /// Empty whatever backlog the engine holds. Called once at session
    /// start.
    fn drain_events(&mut self) -> Result<Vec<EngineEvent>, EngineError>;

    /// Resolve one query. Every submission produces a fresh result; the
    /// session does not dedup against prior queries.
    fn submit_query(&mut self, input: &str, year: i32) -> Result<QueryResult, EngineError>;
}
