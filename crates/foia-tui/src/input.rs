//! Key input primitives and query-line parsing.

/// A pressed key, reduced to the set the browser reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Up,
    Down,
    Tab,
}

/// Parse a submitted query line into `(input, year)`.
///
/// The last whitespace-separated token is the request year; everything
/// before it is the free-text input. `"helios effect 1983"` becomes
/// `("helios effect", 1983)`. Returns `None` when the year token is
/// missing or unparseable, or when no input precedes it.
#[must_use]
pub fn parse_query_line(line: &str) -> Option<(String, i32)> {
    let trimmed = line.trim();
    let (input, year_token) = trimmed.rsplit_once(char::is_whitespace)?;
    let year: i32 = year_token.parse().ok()?;
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Some((input.to_owned(), year))
}
