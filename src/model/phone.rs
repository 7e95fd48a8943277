//! Phone number sanitizing and validation.
//!
//! Numbers are stored in sanitized form (digits only); display formatting
//! is left to callers.

/// Strip the usual separator characters from a phone number.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')' | '-' | '.'))
        .collect()
}

/// A number is valid when it sanitizes to exactly ten digits.
pub fn is_valid(raw: &str) -> bool {
    let digits = sanitize(raw);
    digits.len() == 10 && digits.bytes().all(|b| b.is_ascii_digit())
}
