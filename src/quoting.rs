//! Quoting decisions for emitted scalars.
//!
//! A string value may only be written plain when re-reading it yields the
//! same string: nothing that resolves as null, boolean (including the
//! YAML 1.1 literal set, so strict re-parsing never trips on our own
//! output), or number, and nothing that collides with YAML syntax.

use crate::node::ScalarStyle;

/// Characters that must not open a plain scalar.
fn is_unsafe_first(b: u8) -> bool {
    b.is_ascii_whitespace()
        || matches!(
            b,
            b'-' | b'?'
                | b':'
                | b'['
                | b']'
                | b'{'
                | b'}'
                | b'#'
                | b'&'
                | b'*'
                | b'!'
                | b'|'
                | b'>'
                | b'\''
                | b'"'
                | b'%'
                | b'@'
                | b'`'
        )
}

/// True when a string survives a round trip as a plain scalar in value
/// position.
pub(crate) fn is_plain_value_safe(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    // Null and boolean literals, YAML 1.2 and the 1.1 legacy set alike.
    if crate::scalars::is_null_literal(s)
        || crate::scalars::parse_bool_strict(s).is_some()
        || crate::scalars::is_ambiguous_bool(s)
    {
        return false;
    }
    // Number look-alikes must be quoted to stay strings.
    if crate::scalars::parse_i64(s, true).is_some() || crate::scalars::parse_f64(s).is_some() {
        return false;
    }
    if is_unsafe_first(s.as_bytes()[0]) {
        return false;
    }
    if s.chars().any(char::is_control) {
        return false;
    }
    if s.ends_with(char::is_whitespace) {
        return false;
    }
    // A colon followed by space would end the key context; a '#' after a
    // space would start a comment. Flow indicators break flow collections.
    if s.contains(": ") || s.contains(" #") {
        return false;
    }
    !s.contains(|c| matches!(c, ',' | '[' | ']' | '{' | '}'))
}

/// True when single quotes cannot carry the string (escapes needed).
fn needs_double_quotes(s: &str) -> bool {
    s.chars().any(|c| c.is_control() || c == '\n')
}

/// Pick the emission style for a string value.
pub(crate) fn string_style(s: &str) -> ScalarStyle {
    if is_plain_value_safe(s) {
        ScalarStyle::Plain
    } else if needs_double_quotes(s) {
        ScalarStyle::DoubleQuoted
    } else {
        ScalarStyle::SingleQuoted
    }
}
