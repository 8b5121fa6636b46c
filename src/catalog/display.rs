//! Display formatting for canonical artist names.
//!
//! Canonical names are stored trimmed and lower-cased; the display form
//! upper-cases only the first character of each whitespace-separated token
//! and rejoins with single spaces. This is a presentation-only transform,
//! it never mutates stored data.

use serde::Serializer;

/// Map a stored canonical name to its human-display form.
pub fn format_display_name(canonical: &str) -> String {
    canonical
        .split_whitespace()
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character of a token, leaving the rest unchanged.
fn capitalize_first(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Serde helper applying the display transform on outgoing artist names.
pub fn serialize_display_name<S: Serializer>(
    name: &str,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_display_name(name))
}
