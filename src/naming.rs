//! Identifier conventions shared by storage and the wire.
//!
//! Entity type names map to table names with [`snake_case`], internal field
//! names map to external JSON keys with [`camel_case`].

/// Converts `CapitalizedWords` to `capitalized_words`.
///
/// An underscore is inserted only between a lowercase letter and the
/// uppercase letter that follows it, so runs of capitals stay together
/// (`"HTTPServer"` becomes `"httpserver"`).
#[must_use]
pub fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev_lower = false;
    for ch in ident.chars() {
        if prev_lower && ch.is_ascii_uppercase() {
            out.push('_');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Converts `lower_words` to `lowerWords`.
///
/// Only an underscore followed by a lowercase ASCII letter is folded; any
/// other underscore is kept as is.
#[must_use]
pub fn camel_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let mut chars = ident.chars().peekable();
    while let Some(ch) = chars.next() {
        match (ch, chars.peek()) {
            ('_', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Like [`camel_case`] but with the first character uppercased.
#[must_use]
pub fn pascal_case(ident: &str) -> String {
    let camel = camel_case(ident);
    let mut chars = camel.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}
