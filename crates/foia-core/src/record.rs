//! Data carriers handed over by the engine boundary.
//!
//! Both records are immutable once they cross into the session: the engine
//! has already done its redaction, and this side never edits them.

use serde::{Deserialize, Serialize};

/// A released document, redacted by the engine.
///
/// The date is display text, formatted on the engine side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title_redacted: String,
    pub date: String,
    pub body_redacted: String,
}

impl Document {
    #[must_use]
    pub fn new(title_redacted: &str, date: &str, body_redacted: &str) -> Self {
        Self {
            title_redacted: title_redacted.to_owned(),
            date: date.to_owned(),
            body_redacted: body_redacted.to_owned(),
        }
    }

    /// One-line header used for list rows and the detail pane title.
    #[must_use]
    pub fn header_line(&self) -> String {
        format!("{} - {}", self.title_redacted, self.date)
    }
}

/// An email message released by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub subject: String,
    pub body: String,
}

impl Email {
    #[must_use]
    pub fn new(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.to_owned(),
            body: body.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_header_line_joins_title_and_date() {
        let doc = Document::new("case file ███", "1983-06-14", "body");
        assert_eq!(doc.header_line(), "case file ███ - 1983-06-14");
    }
}
