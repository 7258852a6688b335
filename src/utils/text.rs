//! Text utilities for show titles.

/// Normalize a string for comparison.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Similarity of two titles in `[0, 1]`.
///
/// Sørensen–Dice over character bigrams of the normalized strings, so
/// punctuation and case drift ("Star Trek: Picard" vs "Star Trek Picard")
/// costs little while unrelated titles score low.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&normalize(a), &normalize(b))
}

/// Upper-case the first letter of each word and lower-case the rest.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-case, dot-joined form of a title for use in file names.
///
/// Characters that are illegal in file names on common filesystems are dropped.
pub fn dotted(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '.')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}
