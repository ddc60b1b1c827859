//! Mention extraction from notification text

use registry_shared::constants::MENTION_DELIMITER;

/// Lazily yields every fragment of `text` that looks like a mentioned
/// address: the text is split on `" @"` and fragments containing `@` are
/// kept as-is. Existence lookups downstream do the real filtering.
pub fn mentions(text: &str) -> impl Iterator<Item = &str> {
    text.split(MENTION_DELIMITER)
        .filter(|fragment| fragment.contains('@'))
}

pub fn parse_mentions(text: &str) -> Vec<String> {
    mentions(text).map(str::to_string).collect()
}
