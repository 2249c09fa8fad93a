//! foia-tui: terminal presentation adapter for the FOIA browser.
//!
//! The adapter owns no reconciliation logic: it mirrors the session's view
//! commands, decodes keys into intents, and renders text lines. See
//! [`app::BrowserApp`].

pub mod app;
pub mod input;
