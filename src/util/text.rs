//! Text helpers for diagnostics.

use std::borrow::Cow;

/// Default number of characters of synthesis text echoed into diagnostics.
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// Bounded, char-boundary-safe prefix of `text` for log output.
///
/// Returns at most `max_chars` characters, followed by `...` when the text
/// was cut.
pub fn preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => Cow::Owned(format!("{}...", &text[..end])),
        None => Cow::Borrowed(text),
    }
}
