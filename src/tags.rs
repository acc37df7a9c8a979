//! Core-schema tag names and normalization.
//!
//! The scanner reports tags in several spellings depending on how they were
//! written (`!!int`, the `tag:yaml.org,2002:int` long form, or a local
//! `!Name`). Everything in this crate works with the normalized shorthand.

pub(crate) const TAG_STR: &str = "!!str";
pub(crate) const TAG_INT: &str = "!!int";
pub(crate) const TAG_FLOAT: &str = "!!float";
pub(crate) const TAG_BOOL: &str = "!!bool";
pub(crate) const TAG_NULL: &str = "!!null";
pub(crate) const TAG_SEQ: &str = "!!seq";
pub(crate) const TAG_MAP: &str = "!!map";

const CORE_PREFIX: &str = "tag:yaml.org,2002:";

/// Normalize a tag string as reported by the scanner.
///
/// `tag:yaml.org,2002:int` becomes `!!int`; local tags (`!Rect`) and
/// anything else pass through unchanged.
pub(crate) fn normalize(tag: &str) -> String {
    if let Some(suffix) = tag.strip_prefix(CORE_PREFIX) {
        let suffix = suffix.strip_prefix('!').unwrap_or(suffix);
        format!("!!{suffix}")
    } else {
        tag.to_string()
    }
}

/// True if the (normalized) tag belongs to the YAML core schema handled by
/// the built-in construction rules rather than a registered converter.
pub(crate) fn is_core_tag(tag: &str) -> bool {
    matches!(
        tag,
        TAG_STR | TAG_INT | TAG_FLOAT | TAG_BOOL | TAG_NULL | TAG_SEQ | TAG_MAP
    )
}
