//! Document context extraction.
//!
//! An uploaded contract or supplier document is read as plain text and
//! truncated to a fixed character budget before it is allowed anywhere near
//! a prompt. The budget is a safety/cost bound, not an engine concern.

use std::path::Path;

/// Maximum characters of document text fed to the assistant.
pub const MAX_CONTEXT_CHARS: usize = 10_000;

/// Read a document and bound it to the context budget.
///
/// Unreadable files degrade to a bracketed note rather than an error; a
/// broken attachment should not kill the consultation.
pub fn read_context(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => truncate_chars(&String::from_utf8_lossy(&bytes), MAX_CONTEXT_CHARS),
        Err(e) => format!("[could not read document {}: {}]", path.display(), e),
    }
}

/// Truncate on a character boundary, never mid-codepoint.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through() {
        assert_eq!(truncate_chars("halo gudang", 100), "halo gudang");
    }

    #[test]
    fn long_text_is_bounded() {
        let long = "a".repeat(MAX_CONTEXT_CHARS + 500);
        assert_eq!(truncate_chars(&long, MAX_CONTEXT_CHARS).len(), MAX_CONTEXT_CHARS);
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let text = "é".repeat(10);
        let truncated = truncate_chars(&text, 5);
        assert_eq!(truncated.chars().count(), 5);
        assert_eq!(truncated, "ééééé");
    }

    #[test]
    fn missing_file_degrades_to_a_note() {
        let note = read_context(Path::new("/definitely/not/here.txt"));
        assert!(note.starts_with("[could not read document"));
    }
}
