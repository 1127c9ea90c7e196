// Output formatting — terminal display for the CLI subcommands.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character
/// boundaries and will never panic on umlauts or other multi-byte characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate_chars("Datenbanken", 20), "Datenbanken");
    }

    #[test]
    fn truncate_long_string_appends_ellipsis() {
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
    }

    #[test]
    fn truncate_respects_multibyte_chars() {
        // "Verschlüsselung" has a multi-byte 'ü' at index 7
        let truncated = truncate_chars("Verschlüsselung", 8);
        assert_eq!(truncated, "Verschlü...");
    }
}
