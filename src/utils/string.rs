use std::borrow::Cow;
use lazy_static::lazy_static;
use regex::Regex;

/// Longest symbol the downstream model writers accept.
pub const MAX_SYMBOL_LEN: usize = 64;

lazy_static! {
    static ref UNSAFE_SYMBOL_CHARS: Regex = Regex::new(r"[^A-Za-z0-9 _\-\[\],.()+&/:#]").unwrap();
}

/// Removes characters that are not valid inside an optimization-model set element.
pub fn clean_symbol(text: &str) -> Cow<'_, str> {
    UNSAFE_SYMBOL_CHARS.replace_all(text, "")
}

/// Truncates to at most `max_len` characters.
pub fn shrink_to(text: &str, max_len: usize) -> &str {
    match text.char_indices().nth(max_len) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Clean, cap at [`MAX_SYMBOL_LEN`] and drop trailing whitespace, which model writers
/// silently strip and would otherwise make two names collide.
pub fn sanitize_symbol(text: &str) -> String {
    let cleaned = clean_symbol(text);
    shrink_to(&cleaned, MAX_SYMBOL_LEN).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsafe_characters_are_removed() {
        assert_eq!(clean_symbol("[3] - O'Brien \"GT\"; unit"), "[3] - OBrien GT unit");
        assert_eq!(clean_symbol("Centrale électrique"), "Centrale lectrique");
        assert_eq!(clean_symbol("[0, 1] - BE - COMC - GAS - "), "[0, 1] - BE - COMC - GAS - ");
    }

    #[test]
    fn long_names_are_capped_and_right_trimmed() {
        let long = format!("[12] - {}", "x".repeat(100));
        let symbol = sanitize_symbol(&long);
        assert_eq!(symbol.chars().count(), MAX_SYMBOL_LEN);
        assert!(symbol.starts_with("[12] - xxx"));

        // Truncation landing right after a space must not leave it dangling.
        let padded = format!("{} tail", "y".repeat(63));
        assert_eq!(sanitize_symbol(&padded), "y".repeat(63));
    }

    #[test]
    fn trailing_separator_whitespace_is_dropped() {
        assert_eq!(sanitize_symbol("[0, 1] - BE - HDAM - WAT - "), "[0, 1] - BE - HDAM - WAT -");
        assert_eq!(shrink_to("abc", 10), "abc");
    }
}
