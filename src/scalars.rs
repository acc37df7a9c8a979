//! Plain-scalar resolution: null, booleans (strict and YAML 1.1 forms),
//! integers in several bases, and YAML 1.2 floats.
//!
//! Only *plain* (unquoted) scalars are resolved; quoted and block scalars
//! are always strings. The boolean rules implement the strict policy: under
//! [`Options::strict_booleans`](crate::options::Options) the historically
//! ambiguous YAML 1.1 literals are rejected outright rather than read as
//! booleans or silently passed through as strings.

use crate::error::Error;
use crate::location::Location;
use crate::options::Options;

/// Outcome of resolving one plain scalar.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Resolved {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str,
}

/// True for the YAML 1.1 boolean literals that a YAML 1.2 document must not
/// use unquoted: `y`, `n`, `yes`, `no`, `on`, `off` in any case variant.
///
/// `true`/`false` are deliberately not part of this set.
pub(crate) fn is_ambiguous_bool(t: &str) -> bool {
    t.eq_ignore_ascii_case("y")
        || t.eq_ignore_ascii_case("yes")
        || t.eq_ignore_ascii_case("n")
        || t.eq_ignore_ascii_case("no")
        || t.eq_ignore_ascii_case("on")
        || t.eq_ignore_ascii_case("off")
}

/// Parse the YAML 1.2 boolean literals, case-insensitively.
pub(crate) fn parse_bool_strict(t: &str) -> Option<bool> {
    if t.eq_ignore_ascii_case("true") {
        Some(true)
    } else if t.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a YAML 1.1 boolean (handles the "Norway problem" literal set).
///
/// Accepted TRUE literals (case-insensitive): `y`, `yes`, `true`, `on`.
/// Accepted FALSE literals (case-insensitive): `n`, `no`, `false`, `off`.
pub(crate) fn parse_yaml11_bool(t: &str) -> Option<bool> {
    if t.eq_ignore_ascii_case("true")
        || t.eq_ignore_ascii_case("yes")
        || t.eq_ignore_ascii_case("y")
        || t.eq_ignore_ascii_case("on")
    {
        Some(true)
    } else if t.eq_ignore_ascii_case("false")
        || t.eq_ignore_ascii_case("no")
        || t.eq_ignore_ascii_case("n")
        || t.eq_ignore_ascii_case("off")
    {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn is_null_literal(t: &str) -> bool {
    t.is_empty() || t == "~" || t == "null" || t == "Null" || t == "NULL"
}

fn accumulate_digits(digits: &str, radix: u32, neg: bool) -> Option<i128> {
    let mut val: i128 = 0;
    let mut saw = false;
    for b in digits.as_bytes() {
        let d = match *b {
            b'_' => continue,
            b'0'..=b'9' => (b - b'0') as u32,
            b'a'..=b'f' if radix > 10 => 10 + (b - b'a') as u32,
            b'A'..=b'F' if radix > 10 => 10 + (b - b'A') as u32,
            _ => return None,
        };
        if d >= radix {
            return None;
        }
        val = val.checked_mul(radix as i128)?;
        // Accumulate negative values as negative so i64::MIN stays reachable.
        val = if neg {
            val.checked_sub(d as i128)?
        } else {
            val.checked_add(d as i128)?
        };
        saw = true;
    }
    if saw { Some(val) } else { None }
}

/// Parse a YAML integer: optional sign, `0x`/`0o`/`0b` prefixes, `_` digit
/// separators, and (optionally) the deprecated `00`-prefixed octal form.
///
/// Returns `None` when the text is not an integer or does not fit `i64`.
pub(crate) fn parse_i64(t: &str, legacy_octal: bool) -> Option<i64> {
    let (neg, rest) = match t.strip_prefix('+') {
        Some(r) => (false, r),
        None => match t.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, t),
        },
    };

    let (radix, digits) = if let Some(r) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16u32, r)
    } else if let Some(r) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8u32, r)
    } else if let Some(r) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2u32, r)
    } else if legacy_octal && rest.starts_with("00") {
        (8u32, &rest[2..])
    } else {
        (10u32, rest)
    };

    let val = accumulate_digits(digits, radix, neg)?;
    i64::try_from(val).ok()
}

/// Parse a YAML 1.2 float, including the `.nan` / `+.inf` / `-.inf`
/// specials. Returns `None` when the text does not look like a number (so
/// that words `f64::from_str` would accept, like `inf` or `NaN`, stay
/// strings).
pub(crate) fn parse_f64(t: &str) -> Option<f64> {
    let lower = t.to_ascii_lowercase();
    match lower.as_str() {
        ".nan" | "+.nan" | "-.nan" => return Some(f64::NAN),
        ".inf" | "+.inf" => return Some(f64::INFINITY),
        "-.inf" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if !looks_numeric(t) {
        return None;
    }
    t.parse::<f64>().ok()
}

/// A conservative shape check before handing text to `f64::from_str`.
fn looks_numeric(t: &str) -> bool {
    let mut bytes = t.bytes();
    match bytes.next() {
        Some(b'0'..=b'9' | b'+' | b'-' | b'.') => {}
        _ => return false,
    }
    t.bytes().any(|b| b.is_ascii_digit())
        && t.bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'))
}

/// Resolve one plain, untagged scalar under the configured policy.
///
/// Resolution order: null, YAML 1.2 booleans, the ambiguous YAML 1.1
/// boolean set (error under the strict policy, boolean otherwise), integer,
/// float, string.
pub(crate) fn resolve_plain(
    text: &str,
    options: &Options,
    location: Location,
) -> Result<Resolved, Error> {
    if is_null_literal(text) {
        return Ok(Resolved::Null);
    }
    if let Some(b) = parse_bool_strict(text) {
        return Ok(Resolved::Bool(b));
    }
    if is_ambiguous_bool(text) {
        if options.strict_booleans {
            return Err(Error::UnsafeBoolean {
                token: text.to_string(),
                location,
            });
        }
        if let Some(b) = parse_yaml11_bool(text) {
            return Ok(Resolved::Bool(b));
        }
    }
    if let Some(i) = parse_i64(text, options.legacy_octal_numbers) {
        return Ok(Resolved::Int(i));
    }
    if let Some(f) = parse_f64(text) {
        return Ok(Resolved::Float(f));
    }
    Ok(Resolved::Str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Resolved {
        resolve_plain(text, &Options::default(), Location::UNKNOWN).unwrap()
    }

    #[test]
    fn null_literals() {
        assert_eq!(resolve(""), Resolved::Null);
        assert_eq!(resolve("~"), Resolved::Null);
        assert_eq!(resolve("null"), Resolved::Null);
        assert_eq!(resolve("NULL"), Resolved::Null);
    }

    #[test]
    fn strict_booleans_resolve_or_error() {
        assert_eq!(resolve("true"), Resolved::Bool(true));
        assert_eq!(resolve("True"), Resolved::Bool(true));
        assert_eq!(resolve("FALSE"), Resolved::Bool(false));
        let err = resolve_plain("no", &Options::default(), Location::UNKNOWN).unwrap_err();
        assert!(matches!(err, Error::UnsafeBoolean { .. }));
        let err = resolve_plain("Off", &Options::default(), Location::UNKNOWN).unwrap_err();
        assert!(matches!(err, Error::UnsafeBoolean { .. }));
    }

    #[test]
    fn non_strict_accepts_yaml11_forms() {
        let options = Options {
            strict_booleans: false,
            ..Options::default()
        };
        assert_eq!(
            resolve_plain("yes", &options, Location::UNKNOWN).unwrap(),
            Resolved::Bool(true)
        );
        assert_eq!(
            resolve_plain("N", &options, Location::UNKNOWN).unwrap(),
            Resolved::Bool(false)
        );
    }

    #[test]
    fn boolean_lookalikes_stay_strings() {
        assert_eq!(resolve("truex"), Resolved::Str);
        assert_eq!(resolve("noon"), Resolved::Str);
        assert_eq!(resolve("offline"), Resolved::Str);
    }

    #[test]
    fn integers_in_all_bases() {
        assert_eq!(parse_i64("42", false), Some(42));
        assert_eq!(parse_i64("-17", false), Some(-17));
        assert_eq!(parse_i64("+8", false), Some(8));
        assert_eq!(parse_i64("0x1a", false), Some(26));
        assert_eq!(parse_i64("0o17", false), Some(15));
        assert_eq!(parse_i64("0b101", false), Some(5));
        assert_eq!(parse_i64("1_000", false), Some(1000));
        assert_eq!(parse_i64("010", false), Some(10));
        assert_eq!(parse_i64("0010", true), Some(8));
        assert_eq!(parse_i64(&i64::MIN.to_string(), false), Some(i64::MIN));
        assert_eq!(parse_i64("99999999999999999999", false), None);
        assert_eq!(parse_i64("4.2", false), None);
        assert_eq!(parse_i64("", false), None);
        assert_eq!(parse_i64("0x", false), None);
    }

    #[test]
    fn floats_and_specials() {
        assert_eq!(parse_f64("4.2"), Some(4.2));
        assert_eq!(parse_f64("-1e3"), Some(-1000.0));
        assert!(parse_f64(".nan").unwrap().is_nan());
        assert_eq!(parse_f64("+.inf"), Some(f64::INFINITY));
        assert_eq!(parse_f64("-.inf"), Some(f64::NEG_INFINITY));
        // Words accepted by f64::from_str must not become floats.
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("4.2.1"), None);
    }

    #[test]
    fn version_like_strings_stay_strings() {
        assert_eq!(resolve("4.2.1"), Resolved::Str);
        assert_eq!(resolve("hello"), Resolved::Str);
    }
}
