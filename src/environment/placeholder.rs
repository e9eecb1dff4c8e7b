//! Placeholder substitution in declared values

/// Replace every occurrence of `token` in `value` with `replacement`.
///
/// Matches are found leftmost-first and never overlap. The inserted text is not
/// scanned again, so a replacement that itself contains `token` stays literal.
/// An empty token leaves the value unchanged.
pub fn substitute(value: &str, token: &str, replacement: &str) -> String {
    if token.is_empty() {
        return value.to_string();
    }
    value.replace(token, replacement)
}
